//! The intermediate object: sections, localizations and their persistence.
//!
//! # Mental Model
//!
//! An [`Intermediate`] is the unit a compiler emits and a linker consumes. It
//! owns its sections in order, at most one [`Localization`] per culture, and
//! the linker's record of which sections belong to which library.
//!
//! Persistence goes through a [`PortableContainer`]: the model is written as a
//! single JSON document plus one entry per embedded file. See [`save`] and
//! [`load`] for the two directions.
//!
//! # Invariants
//!
//! - Section order is insertion order and survives a save/load round trip.
//! - Cultures are unique after normalization.
//! - A library placement always names a section id present in the intermediate.

mod doc;
mod load;
mod save;

use std::collections::BTreeMap;

use tracing::warn;
#[cfg(doc)]
use wixir_container::PortableContainer;

pub use doc::FORMAT_VERSION;
pub use load::PendingIntermediate;

use crate::error::{IrError, Result};
use crate::localization::{Localization, normalize_culture};
use crate::section::{LibraryPlacement, Section};

/// Container entry holding the JSON document.
pub const DOCUMENT_STREAM: &str = "wix-ir.json";

/// Prefix of container entries holding embedded files.
pub const EMBED_PREFIX: &str = "wix-ir/";

/// Compiled output of one compilation, or a library of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intermediate {
	id: String,
	level: Option<String>,
	sections: Vec<Section>,
	placements: Vec<LibraryPlacement>,
	localizations: BTreeMap<String, Localization>,
}

impl Default for Intermediate {
	fn default() -> Self {
		Self::new()
	}
}

impl Intermediate {
	/// Creates an empty intermediate with a fresh random id.
	pub fn new() -> Self {
		Self::with_id(uuid::Uuid::new_v4().simple().to_string())
	}

	pub fn with_id(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			level: None,
			sections: Vec::new(),
			placements: Vec::new(),
			localizations: BTreeMap::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Processing stages this intermediate has passed, separated by `;`.
	pub fn level(&self) -> Option<&str> {
		self.level.as_deref()
	}

	/// Records that this intermediate has passed processing stage `level`.
	pub fn update_level(&mut self, level: &str) {
		self.level = Some(match self.level.take() {
			Some(existing) if !existing.is_empty() => format!("{existing};{level}"),
			_ => level.to_owned(),
		});
	}

	/// Whether `level` is one of the recorded stages.
	///
	/// Stages are compared as whole `;`-separated tokens, so `"link"` does not
	/// match a recorded `"linker"`.
	pub fn has_level(&self, level: &str) -> bool {
		self.level
			.as_deref()
			.is_some_and(|recorded| recorded.split(';').any(|stage| stage == level))
	}

	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	pub fn sections_mut(&mut self) -> &mut [Section] {
		&mut self.sections
	}

	/// Appends `section` and returns a handle to it.
	pub fn add_section(&mut self, section: Section) -> &mut Section {
		self.sections.push(section);
		let last = self.sections.len() - 1;
		&mut self.sections[last]
	}

	/// Index of `section` in this intermediate, by identity.
	pub fn section_position(&self, section: &Section) -> Option<usize> {
		self.sections.iter().position(|s| std::ptr::eq(s, section))
	}

	/// Removes the section at `index` along with its library placement.
	pub fn take_section(&mut self, index: usize) -> Option<Section> {
		if index >= self.sections.len() {
			return None;
		}
		let removed = self.sections.remove(index);
		if let Some(id) = removed.id() {
			self.placements.retain(|p| p.section_id != id);
		}
		Some(removed)
	}

	/// Localizations ordered by culture.
	pub fn localizations(&self) -> impl Iterator<Item = &Localization> {
		self.localizations.values()
	}

	/// Looks a localization up by culture, case-insensitively.
	pub fn localization(&self, culture: &str) -> Option<&Localization> {
		self.localizations.get(&normalize_culture(culture))
	}

	/// Adds `localization`. Fails if its culture is already present.
	pub fn add_localization(&mut self, localization: Localization) -> Result<()> {
		let culture = localization.culture().to_owned();
		if self.localizations.contains_key(&culture) {
			return Err(IrError::DuplicateCulture { culture });
		}
		self.localizations.insert(culture, localization);
		Ok(())
	}

	pub fn remove_localization(&mut self, culture: &str) -> Option<Localization> {
		self.localizations.remove(&normalize_culture(culture))
	}

	/// Places every identified section into library `library_id`.
	///
	/// Replaces any earlier placement. Sections without an id cannot be
	/// referenced by a placement and are skipped. Returns the number placed.
	pub fn assign_to_library(&mut self, library_id: &str) -> usize {
		self.placements.clear();
		for section in &self.sections {
			match section.id() {
				Some(id) => self.placements.push(LibraryPlacement {
					section_id: id.to_owned(),
					library_id: library_id.to_owned(),
				}),
				None => warn!(
					intermediate = %self.id,
					kind = %section.kind(),
					library = library_id,
					"section without an id cannot be placed in a library"
				),
			}
		}
		self.placements.len()
	}

	/// Library the linker placed `section` into, if any.
	pub fn library_of(&self, section: &Section) -> Option<&str> {
		let id = section.id()?;
		self.placements
			.iter()
			.find(|p| p.section_id == id)
			.map(|p| p.library_id.as_str())
	}

	pub fn placements(&self) -> &[LibraryPlacement] {
		&self.placements
	}
}

#[cfg(test)]
mod tests;
