//! Symbol definitions: the schema that gives a symbol's fields meaning.

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;

/// Where a symbol definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionOrigin {
	/// Always resolvable without registration.
	BuiltIn,
	/// Supplied by an extension; documents using it carry a copy of it.
	MustBeFromExtension,
}

/// One named, typed column of a symbol definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDefinition {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: FieldKind,
}

impl FieldDefinition {
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self { name: name.into(), kind }
	}
}

/// Schema for a symbol type.
///
/// The number of fields fixes the arity of every symbol of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolDefinition {
	name: String,
	fields: Vec<FieldDefinition>,
	origin: DefinitionOrigin,
	revision: u32,
}

impl SymbolDefinition {
	/// Creates an extension definition at revision 0.
	pub fn custom(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
		Self::custom_revision(name, fields, 0)
	}

	/// Creates an extension definition at `revision`.
	///
	/// A registry keeps the highest revision it has seen for a name.
	pub fn custom_revision(name: impl Into<String>, fields: Vec<FieldDefinition>, revision: u32) -> Self {
		Self {
			name: name.into(),
			fields,
			origin: DefinitionOrigin::MustBeFromExtension,
			revision,
		}
	}

	pub(crate) fn builtin(name: &str, fields: &[(&str, FieldKind)]) -> Self {
		Self {
			name: name.to_owned(),
			fields: fields
				.iter()
				.map(|(name, kind)| FieldDefinition::new(*name, *kind))
				.collect(),
			origin: DefinitionOrigin::BuiltIn,
			revision: 0,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn fields(&self) -> &[FieldDefinition] {
		&self.fields
	}

	/// Field kinds in column order.
	pub fn field_kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
		self.fields.iter().map(|f| f.kind)
	}

	pub fn arity(&self) -> usize {
		self.fields.len()
	}

	pub fn origin(&self) -> DefinitionOrigin {
		self.origin
	}

	pub fn is_extension(&self) -> bool {
		self.origin == DefinitionOrigin::MustBeFromExtension
	}

	pub fn revision(&self) -> u32 {
		self.revision
	}

	/// Column index of the field called `name`.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|f| f.name == name)
	}
}
