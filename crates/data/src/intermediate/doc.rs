//! JSON document model stored as `wix-ir.json`.
//!
//! The document mirrors the in-memory model closely. Field values are written
//! by their runtime variant and read back guided by the symbol definition's
//! field kinds, since JSON alone cannot tell a 32-bit number from a 64-bit one
//! or a path from a string.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use url::Url;

use super::Intermediate;
use crate::definition::{FieldDefinition, SymbolDefinition};
use crate::field::{FieldKind, FieldValue, PathRef};
use crate::identifier::Identifier;
use crate::localization::{BindVariable, Localization, LocalizedControl};
use crate::source::SourceLocation;
use crate::symbol::Symbol;

/// Format version written into every document.
pub const FORMAT_VERSION: &str = "4.0.0.0";

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IntermediateDoc {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub version: String,
	#[serde(default)]
	pub sections: Vec<SectionDoc>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub definitions: Vec<DefinitionDoc>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub localizations: Vec<LocalizationDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SectionDoc {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub compilation_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub library_id: Option<String>,
	#[serde(default)]
	pub symbols: Vec<SymbolDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SymbolDoc {
	#[serde(rename = "type")]
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Identifier>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_location: Option<SourceLocation>,
	#[serde(default)]
	pub fields: Vec<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<TagsDoc>,
}

/// Tags are written as a bare string when there is exactly one.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum TagsDoc {
	One(String),
	Many(Vec<String>),
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DefinitionDoc {
	pub name: String,
	#[serde(default, skip_serializing_if = "is_zero")]
	pub revision: u32,
	pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocalizationDoc {
	pub culture: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub codepage: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub summary_codepage: Option<u32>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub variables: Vec<BindVariable>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub controls: Vec<LocalizedControl>,
}

/// Object form of a path field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PathDoc {
	path: String,
	#[serde(default)]
	embed: bool,
	#[serde(default)]
	base_uri: Option<String>,
}

fn is_zero(n: &u32) -> bool {
	*n == 0
}

/// Whether `found` is exactly the current format version.
///
/// Both sides are compared as four dotted integers; anything unparsable is a
/// mismatch.
pub(crate) fn version_matches(found: &str) -> bool {
	match (parse_version(found), parse_version(FORMAT_VERSION)) {
		(Some(found), Some(current)) => found == current,
		_ => false,
	}
}

fn parse_version(s: &str) -> Option<[u32; 4]> {
	let mut parts = s.trim().split('.');
	let mut version = [0; 4];
	for slot in &mut version {
		*slot = parts.next()?.parse().ok()?;
	}
	parts.next().is_none().then_some(version)
}

impl IntermediateDoc {
	/// Builds the document for `intermediate`, which is being written into the
	/// container at `container_uri`.
	pub(crate) fn from_intermediate(intermediate: &Intermediate, container_uri: &Url) -> Self {
		let mut used: BTreeMap<&str, &Arc<SymbolDefinition>> = BTreeMap::new();

		let sections = intermediate
			.sections
			.iter()
			.map(|section| SectionDoc {
				kind: section.kind().as_str().to_owned(),
				id: section.id().map(str::to_owned),
				compilation_id: section.compilation_id().map(str::to_owned),
				library_id: intermediate.library_of(section).map(str::to_owned),
				symbols: section
					.symbols()
					.iter()
					.map(|symbol| {
						if symbol.definition().is_extension() {
							used.entry(symbol.name()).or_insert(symbol.definition());
						}
						SymbolDoc::from_symbol(symbol, container_uri)
					})
					.collect(),
			})
			.collect();

		// BTreeMap iteration keeps definitions sorted by name.
		let definitions = used
			.into_values()
			.map(|def| DefinitionDoc {
				name: def.name().to_owned(),
				revision: def.revision(),
				fields: def.fields().to_vec(),
			})
			.collect();

		let localizations = intermediate
			.localizations
			.values()
			.map(|loc| LocalizationDoc {
				culture: loc.culture().to_owned(),
				codepage: loc.codepage(),
				summary_codepage: loc.summary_info_codepage(),
				variables: loc.variables().values().cloned().collect(),
				controls: loc.controls().values().cloned().collect(),
			})
			.collect();

		Self {
			id: Some(intermediate.id.clone()),
			level: intermediate.level.clone(),
			version: FORMAT_VERSION.to_owned(),
			sections,
			definitions,
			localizations,
		}
	}
}

impl SymbolDoc {
	fn from_symbol(symbol: &Symbol, container_uri: &Url) -> Self {
		let tags = match symbol.tags().len() {
			0 => None,
			1 => symbol.tags().iter().next().map(|t| TagsDoc::One(t.to_owned())),
			_ => Some(TagsDoc::Many(symbol.tags().iter().map(str::to_owned).collect())),
		};
		Self {
			name: symbol.name().to_owned(),
			id: symbol.id().cloned(),
			source_location: symbol.source_location().cloned(),
			fields: symbol
				.fields()
				.iter()
				.map(|slot| field_to_json(slot.as_ref(), container_uri))
				.collect(),
			tags,
		}
	}
}

impl TagsDoc {
	pub(crate) fn into_vec(self) -> Vec<String> {
		match self {
			Self::One(tag) => vec![tag],
			Self::Many(tags) => tags,
		}
	}
}

impl DefinitionDoc {
	pub(crate) fn to_definition(&self) -> SymbolDefinition {
		SymbolDefinition::custom_revision(self.name.clone(), self.fields.clone(), self.revision)
	}
}

impl LocalizationDoc {
	pub(crate) fn into_localization(self) -> Localization {
		let mut loc = Localization::new(&self.culture);
		if let Some(codepage) = self.codepage {
			loc = loc.with_codepage(codepage);
		}
		if let Some(codepage) = self.summary_codepage {
			loc = loc.with_summary_info_codepage(codepage);
		}
		let loc = self.variables.into_iter().fold(loc, Localization::with_variable);
		self.controls.into_iter().fold(loc, Localization::with_control)
	}
}

/// Serializes one field slot.
///
/// An embedded path that lives in the container being written omits its base
/// URI; loading restores it from the container's identity.
fn field_to_json(value: Option<&FieldValue>, container_uri: &Url) -> Value {
	match value {
		None => Value::Null,
		Some(FieldValue::Bool(b)) => Value::Bool(*b),
		Some(FieldValue::Int32(n)) => Value::Number(Number::from(*n)),
		Some(FieldValue::Int64(n)) => Value::Number(Number::from(*n)),
		Some(FieldValue::Str(s)) => Value::String(s.clone()),
		Some(FieldValue::Path(path)) => {
			let mut object = serde_json::Map::new();
			object.insert("path".to_owned(), Value::String(path.path.clone()));
			if path.embed {
				object.insert("embed".to_owned(), Value::Bool(true));
			}
			if let Some(uri) = path.base_uri.as_ref().filter(|uri| !(path.embed && *uri == container_uri)) {
				object.insert("baseUri".to_owned(), Value::String(uri.to_string()));
			}
			Value::Object(object)
		}
	}
}

/// Deserializes one field slot guided by its declared kind.
///
/// Integers take the width [`FieldKind::normalize`] gives them, so a loaded
/// value matches what was set before saving. Strings always stay strings;
/// paths are written as objects. Embedded paths without an explicit base URI
/// are attributed to the container the document was loaded from.
pub(crate) fn field_from_json(kind: FieldKind, value: Value, container_uri: &Url) -> Result<Option<FieldValue>, String> {
	let field = match value {
		Value::Null => return Ok(None),
		Value::Bool(b) => FieldValue::Bool(b),
		Value::Number(n) => {
			let n = n.as_i64().ok_or_else(|| format!("field value {n} is not an integer"))?;
			kind.normalize(FieldValue::Int64(n))
		}
		Value::String(s) => FieldValue::Str(s),
		Value::Object(_) => {
			let doc: PathDoc = serde_json::from_value(value).map_err(|e| format!("invalid path field: {e}"))?;
			let base_uri = match doc.base_uri {
				Some(raw) => Some(Url::parse(&raw).map_err(|e| format!("invalid base uri {raw:?}: {e}"))?),
				None if doc.embed => Some(container_uri.clone()),
				None => None,
			};
			FieldValue::Path(PathRef {
				path: doc.path,
				embed: doc.embed,
				base_uri,
			})
		}
		Value::Array(_) => return Err("field value cannot be an array".to_owned()),
	};
	Ok(Some(field))
}
