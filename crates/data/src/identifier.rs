use serde::{Deserialize, Serialize};

/// Visibility of a symbol identifier. Interpreted by the linker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessScope {
	#[default]
	Global,
	Library,
	File,
	Section,
	Virtual,
	Override,
}

/// A symbol's identifier and its visibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
	pub access: AccessScope,
	pub id: String,
}

impl Identifier {
	pub fn new(access: AccessScope, id: impl Into<String>) -> Self {
		Self { access, id: id.into() }
	}

	pub fn global(id: impl Into<String>) -> Self {
		Self::new(AccessScope::Global, id)
	}
}
