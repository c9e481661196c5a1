//! Field values and the coercions between them.
//!
//! A symbol's fields are stored untyped relative to the accessor that later
//! reads them: a `Number` field may hold `Str("42")` if that is what the
//! producer wrote. Accessors convert on read and fail loudly when no lossless
//! conversion exists.
//!
//! | stored \ read | bool | i32 | i64 | string |
//! |---------------|------|-----|-----|--------|
//! | `Bool`        | yes  | 0/1 | 0/1 | `true`/`false` |
//! | `Int32`       | != 0 | yes | yes | decimal |
//! | `Int64`       | != 0 | range-checked | yes | decimal |
//! | `Str`         | yes/no/true/false or integer | parsed | parsed | yes |
//! | `Path`        | error | error | error | the path |

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FieldError;

/// Declared kind of a field in a symbol definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
	Bool,
	/// 32-bit integer.
	Number,
	/// 64-bit integer.
	LargeNumber,
	String,
	Path,
}

impl FieldKind {
	/// Settles the integer width a value is stored with in a field of this kind.
	///
	/// `LargeNumber` fields hold integers as `Int64`; every other kind holds
	/// them as `Int32` when they fit. Saved documents carry no width, so this
	/// is also the width a loaded value comes back with.
	pub fn normalize(self, value: FieldValue) -> FieldValue {
		match (self, value) {
			(Self::LargeNumber, FieldValue::Int32(n)) => FieldValue::Int64(i64::from(n)),
			(Self::LargeNumber, value) => value,
			(_, FieldValue::Int64(n)) => i32::try_from(n).map_or(FieldValue::Int64(n), FieldValue::Int32),
			(_, value) => value,
		}
	}
}

/// Reference to an external file, optionally embedded into the container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathRef {
	pub path: String,
	/// The file's bytes are copied into the container on save.
	pub embed: bool,
	/// The path names an entry inside this other container instead of a local file.
	pub base_uri: Option<Url>,
}

impl PathRef {
	/// A plain path that stays outside the container.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			embed: false,
			base_uri: None,
		}
	}

	/// A local file to embed on save.
	pub fn embedded(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			embed: true,
			base_uri: None,
		}
	}

	/// An entry of the container at `base_uri` to copy on save.
	pub fn embedded_from(base_uri: Url, path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			embed: true,
			base_uri: Some(base_uri),
		}
	}
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
	Bool(bool),
	Int32(i32),
	Int64(i64),
	Str(String),
	Path(PathRef),
}

impl FieldValue {
	/// Short name of the stored variant, used in diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int32(_) => "number",
			Self::Int64(_) => "large number",
			Self::Str(_) => "string",
			Self::Path(_) => "path",
		}
	}

	pub fn as_bool(&self) -> Result<bool, FieldError> {
		match self {
			Self::Bool(b) => Ok(*b),
			Self::Int32(n) => Ok(*n != 0),
			Self::Int64(n) => Ok(*n != 0),
			Self::Str(s) => parse_bool(s).ok_or_else(|| self.coercion("bool")),
			Self::Path(_) => Err(self.coercion("bool")),
		}
	}

	pub fn as_i32(&self) -> Result<i32, FieldError> {
		match self {
			Self::Bool(b) => Ok(i32::from(*b)),
			Self::Int32(n) => Ok(*n),
			Self::Int64(n) => i32::try_from(*n).map_err(|_| self.coercion("number")),
			Self::Str(s) => s.trim().parse().map_err(|_| self.coercion("number")),
			Self::Path(_) => Err(self.coercion("number")),
		}
	}

	pub fn as_i64(&self) -> Result<i64, FieldError> {
		match self {
			Self::Bool(b) => Ok(i64::from(*b)),
			Self::Int32(n) => Ok(i64::from(*n)),
			Self::Int64(n) => Ok(*n),
			Self::Str(s) => s.trim().parse().map_err(|_| self.coercion("large number")),
			Self::Path(_) => Err(self.coercion("large number")),
		}
	}

	/// Every kind has a string form; paths yield their path text.
	pub fn as_string(&self) -> Cow<'_, str> {
		match self {
			Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
			Self::Int32(n) => Cow::Owned(n.to_string()),
			Self::Int64(n) => Cow::Owned(n.to_string()),
			Self::Str(s) => Cow::Borrowed(s),
			Self::Path(p) => Cow::Borrowed(&p.path),
		}
	}

	/// Returns the stored path.
	///
	/// Fails with [`FieldError::NotAPath`] for any other kind; there is no
	/// conversion into a path.
	pub fn as_path(&self) -> Result<&PathRef, FieldError> {
		match self {
			Self::Path(p) => Ok(p),
			other => Err(FieldError::NotAPath(other.kind_name())),
		}
	}

	fn coercion(&self, to: &'static str) -> FieldError {
		FieldError::Coercion {
			from: self.kind_name(),
			to,
			value: self.as_string().into_owned(),
		}
	}
}

fn parse_bool(s: &str) -> Option<bool> {
	let s = s.trim();
	if s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true") {
		Some(true)
	} else if s.eq_ignore_ascii_case("no") || s.eq_ignore_ascii_case("false") {
		Some(false)
	} else {
		s.parse::<i64>().ok().map(|n| n != 0)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for FieldValue {
	fn from(value: i32) -> Self {
		Self::Int32(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Int64(value)
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}

impl From<PathRef> for FieldValue {
	fn from(value: PathRef) -> Self {
		Self::Path(value)
	}
}
