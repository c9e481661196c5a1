//! Compact tag sets attached to symbols.

/// A set of string tags.
///
/// Most symbols carry no tags and nearly all of the rest carry one, so the
/// set stores zero or one tag inline and only allocates a vector beyond that.
/// The representation is not observable: two sets with the same members are
/// equal regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct TagSet(Repr);

#[derive(Debug, Clone, Default)]
enum Repr {
	#[default]
	Empty,
	One(String),
	Many(Vec<String>),
}

impl TagSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `tag`. Returns `false` if it was already present.
	pub fn add(&mut self, tag: impl Into<String>) -> bool {
		let tag = tag.into();
		if self.has(&tag) {
			return false;
		}
		self.0 = match std::mem::take(&mut self.0) {
			Repr::Empty => Repr::One(tag),
			Repr::One(existing) => Repr::Many(vec![existing, tag]),
			Repr::Many(mut tags) => {
				tags.push(tag);
				Repr::Many(tags)
			}
		};
		true
	}

	pub fn has(&self, tag: &str) -> bool {
		match &self.0 {
			Repr::Empty => false,
			Repr::One(existing) => existing == tag,
			Repr::Many(tags) => tags.iter().any(|t| t == tag),
		}
	}

	/// Removes `tag`. Returns `false` if it was not present.
	pub fn remove(&mut self, tag: &str) -> bool {
		match &mut self.0 {
			Repr::Empty => false,
			Repr::One(existing) => {
				if existing != tag {
					return false;
				}
				self.0 = Repr::Empty;
				true
			}
			Repr::Many(tags) => {
				let Some(index) = tags.iter().position(|t| t == tag) else {
					return false;
				};
				tags.remove(index);
				if tags.len() == 1 {
					let last = tags.pop().unwrap_or_default();
					self.0 = Repr::One(last);
				}
				true
			}
		}
	}

	pub fn len(&self) -> usize {
		match &self.0 {
			Repr::Empty => 0,
			Repr::One(_) => 1,
			Repr::Many(tags) => tags.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self.0, Repr::Empty)
	}

	/// Tags in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		let slice: &[String] = match &self.0 {
			Repr::Empty => &[],
			Repr::One(tag) => std::slice::from_ref(tag),
			Repr::Many(tags) => tags,
		};
		slice.iter().map(String::as_str)
	}
}

impl PartialEq for TagSet {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|tag| other.has(tag))
	}
}

impl Eq for TagSet {}

impl<S: Into<String>> FromIterator<S> for TagSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut set = Self::new();
		for tag in iter {
			set.add(tag);
		}
		set
	}
}
