//! Error types for the intermediate object model.

use thiserror::Error;
use url::Url;
use wixir_container::ContainerError;

/// A field value could not be read as the requested kind.
///
/// Raised when a value is accessed, never while loading: fields are stored as
/// they were written and only interpreted by the accessor that reads them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	/// The stored value has no lossless conversion to the requested kind.
	#[error("cannot convert {from} value {value:?} to {to}")]
	Coercion {
		from: &'static str,
		to: &'static str,
		value: String,
	},

	/// A path accessor was used on a field that does not hold a path.
	///
	/// Path-ness is decided by the field's definition, so this indicates a
	/// caller bug rather than bad data.
	#[error("field holds a {0} value, not a path")]
	NotAPath(&'static str),
}

/// Errors raised while building, saving or loading intermediates.
#[derive(Debug, Error)]
pub enum IrError {
	#[error(transparent)]
	Container(#[from] ContainerError),

	/// The document's format version differs from [`crate::FORMAT_VERSION`].
	#[error("{uri} has format version {found:?}, expected {expected}")]
	VersionMismatch {
		uri: Url,
		found: String,
		expected: &'static str,
	},

	/// A symbol names a type with no registered definition.
	#[error("{uri} references unknown symbol type '{name}'")]
	UnknownSymbolType { uri: Url, name: String },

	/// The document is not valid JSON for the intermediate schema.
	#[error("{uri} contains a malformed document: {source}")]
	InvalidDocument {
		uri: Url,
		#[source]
		source: serde_json::Error,
	},

	/// The document parsed but holds a value the model cannot represent.
	#[error("{uri} contains a malformed document: {reason}")]
	Malformed { uri: Url, reason: String },

	/// Two localizations share a culture.
	#[error("duplicate localization for culture '{culture}'")]
	DuplicateCulture { culture: String },

	/// An embedded path has no file name to name its container entry after.
	#[error("embedded path {path:?} has no file name")]
	InvalidEmbedPath { path: String },

	/// A field index is outside the symbol's arity.
	#[error("field index {index} out of range for {symbol} symbol with {arity} fields")]
	FieldIndexOutOfRange {
		symbol: String,
		index: usize,
		arity: usize,
	},

	#[error(transparent)]
	Field(#[from] FieldError),

	#[error("invalid configuration: {0}")]
	Config(#[from] toml::de::Error),

	#[error("failed to serialize intermediate {id}: {source}")]
	Serialize {
		id: String,
		#[source]
		source: serde_json::Error,
	},
}

/// Result type for intermediate operations.
pub type Result<T> = std::result::Result<T, IrError>;
