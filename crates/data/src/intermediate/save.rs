//! Writing an intermediate into a container.
//!
//! Saving happens in two phases. First every embeddable path is copied into
//! the target container and the field is rewritten to name the new entry.
//! Then the document is serialized from the rewritten model, so the document
//! never references a file outside the container it lives in.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};
use url::Url;
use wixir_container::PortableContainer;

use super::doc::IntermediateDoc;
use super::{DOCUMENT_STREAM, EMBED_PREFIX, Intermediate};
use crate::config::SaveOptions;
use crate::error::{IrError, Result};
use crate::field::{FieldValue, PathRef};

impl Intermediate {
	/// Saves into a new container file at `path`, replacing any existing file.
	pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
		self.save_with(path, &SaveOptions::default())
	}

	pub fn save_with(&mut self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
		let mut container = PortableContainer::create_file(path)?;
		self.save_to(&mut container, options)?;
		container.commit()?;
		Ok(())
	}

	/// Saves into `container` without committing it.
	///
	/// Embedded payloads are written under [`EMBED_PREFIX`] and the document
	/// replaces any existing [`DOCUMENT_STREAM`] entry. After this returns,
	/// every embedded path field in `self` names its entry in `container`.
	pub fn save_to(&mut self, container: &mut PortableContainer, options: &SaveOptions) -> Result<()> {
		container.set_compression(options.compression);

		let mut embedder = Embedder::new(container);
		for section in &mut self.sections {
			for symbol in section.symbols_mut() {
				for slot in symbol.fields_mut() {
					let Some(FieldValue::Path(path)) = slot else {
						continue;
					};
					if path.embed {
						*path = embedder.embed(path)?;
					}
				}
			}
		}
		let embedded = embedder.finish();

		let doc = IntermediateDoc::from_intermediate(self, container.uri());
		let mut stream = container.create_data_stream(DOCUMENT_STREAM)?;
		serde_json::to_writer(&mut stream, &doc).map_err(|source| IrError::Serialize {
			id: self.id.clone(),
			source,
		})?;
		drop(stream);

		debug!(
			id = %self.id,
			uri = %container.uri(),
			sections = self.sections.len(),
			definitions = doc.definitions.len(),
			embedded,
			"saved intermediate"
		);
		Ok(())
	}
}

/// Copies embeddable payloads into one target container during one save.
///
/// Payload entries the target held before this save are never replaced. New
/// payloads get names that avoid them, and payloads already stored in the
/// target keep their entry.
struct Embedder<'a> {
	target: &'a mut PortableContainer,
	/// Entry names present in the target before this save.
	existing: FxHashSet<String>,
	/// Entry names assigned by this save.
	claimed: FxHashSet<String>,
	/// `(base_uri, path)` of each payload already written, to its entry name.
	written: FxHashMap<(Option<Url>, String), String>,
}

impl<'a> Embedder<'a> {
	fn new(target: &'a mut PortableContainer) -> Self {
		let existing = target.entry_names().into_iter().collect();
		Self {
			target,
			existing,
			claimed: FxHashSet::default(),
			written: FxHashMap::default(),
		}
	}

	/// Embeds `path` and returns the rewritten reference.
	fn embed(&mut self, path: &PathRef) -> Result<PathRef> {
		let key = (path.base_uri.clone(), path.path.clone());
		if let Some(name) = self.written.get(&key) {
			trace!(path = %path.path, entry = %name, "payload already embedded");
			return Ok(self.rewritten(name.clone()));
		}

		let name = match &path.base_uri {
			None => {
				let name = self.fresh_name(&path.path)?;
				self.target.import_data_stream(&name, &path.path)?;
				name
			}
			Some(base_uri) if base_uri == self.target.uri() => self.embed_own(base_uri, &path.path)?,
			Some(base_uri) => {
				let name = self.fresh_name(&path.path)?;
				let mut source = PortableContainer::read_uri(base_uri)?;
				source.copy_data_stream(&path.path, self.target, &name)?;
				name
			}
		};
		debug!(
			path = %path.path,
			from = path.base_uri.as_ref().map(tracing::field::display),
			entry = %name,
			"embedded payload"
		);

		self.written.insert(key, name.clone());
		Ok(self.rewritten(name))
	}

	/// Embeds entry `entry` of the target itself.
	///
	/// When the target was created fresh over the same identity (saving back
	/// to the file a model was loaded from), the payload is read from the
	/// committed source before the target's commit replaces it.
	fn embed_own(&mut self, base_uri: &Url, entry: &str) -> Result<String> {
		let keep = entry.starts_with(EMBED_PREFIX) && !self.claimed.contains(entry);
		let name = if keep {
			self.claimed.insert(entry.to_owned());
			entry.to_owned()
		} else {
			self.fresh_name(entry)?
		};

		let held = self.existing.contains(entry);
		if keep && held {
			return Ok(name);
		}
		let bytes = if held {
			self.target.read_data(entry)?
		} else {
			PortableContainer::read_uri(base_uri)?.read_data(entry)?
		};
		self.target.write_data(&name, bytes)?;
		Ok(name)
	}

	/// A container-relative reference to entry `name` of the target.
	fn rewritten(&self, name: String) -> PathRef {
		PathRef::embedded_from(self.target.uri().clone(), name)
	}

	/// Picks `wix-ir/<file name>`, suffixed `-1`, `-2` and so on past names
	/// already held by the target or used by this save.
	fn fresh_name(&mut self, path: &str) -> Result<String> {
		let file_name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
		if file_name.is_empty() {
			return Err(IrError::InvalidEmbedPath { path: path.to_owned() });
		}
		let base = format!("{EMBED_PREFIX}{file_name}");
		let mut name = base.clone();
		let mut suffix = 0;
		while self.existing.contains(&name) || self.claimed.contains(&name) {
			suffix += 1;
			name = format!("{base}-{suffix}");
		}
		self.claimed.insert(name.clone());
		Ok(name)
	}

	/// Number of distinct payloads written.
	fn finish(self) -> usize {
		self.written.len()
	}
}
