//! Error types for container operations.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;
use zip::result::ZipError;

/// Errors raised while opening, reading or rewriting a container.
#[derive(Debug, Error)]
pub enum ContainerError {
	/// The bytes behind the container are not a valid archive.
	#[error("{uri} is not a valid intermediate container: {source}")]
	CorruptFileFormat {
		uri: Url,
		#[source]
		source: ZipError,
	},

	/// A named entry does not exist in the container.
	#[error("entry '{name}' not found in {uri}")]
	EntryNotFound { uri: Url, name: String },

	/// No host module registered the requested embedded container.
	#[error("embedded container not found: {module}#{name}")]
	ResourceNotFound { module: String, name: String },

	/// An entry exists but its contents are not UTF-8 text.
	#[error("entry '{name}' in {uri} is not valid UTF-8")]
	InvalidText { uri: Url, name: String },

	/// The container was opened without write access.
	#[error("container {0} is not writable")]
	ReadOnly(Url),

	/// The URI scheme cannot be resolved to a byte source.
	#[error("unsupported container uri: {0}")]
	UnsupportedUri(String),

	/// Writing the rebuilt archive failed.
	#[error("failed to write archive {uri}: {source}")]
	Archive {
		uri: Url,
		#[source]
		source: ZipError,
	},

	/// I/O failure on the container's own byte source.
	#[error("I/O error on {uri}: {source}")]
	Io {
		uri: Url,
		#[source]
		source: std::io::Error,
	},

	/// I/O failure on a local file imported into or extracted from the container.
	#[error("I/O error on {path}: {source}")]
	LocalFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

impl ContainerError {
	pub(crate) fn io(uri: &Url, source: std::io::Error) -> Self {
		Self::Io { uri: uri.clone(), source }
	}

	pub(crate) fn local(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::LocalFile {
			path: path.into(),
			source,
		}
	}

	/// Classifies an error from opening an archive.
	///
	/// Plain I/O stays I/O; everything else the zip reader rejects means the
	/// bytes are not an archive we can use.
	pub(crate) fn open(uri: &Url, source: ZipError) -> Self {
		match source {
			ZipError::Io(e) if e.kind() != std::io::ErrorKind::UnexpectedEof => Self::io(uri, e),
			other => Self::CorruptFileFormat {
				uri: uri.clone(),
				source: other,
			},
		}
	}

	/// Classifies an error from reading a single entry.
	pub(crate) fn entry(uri: &Url, name: &str, source: ZipError) -> Self {
		match source {
			ZipError::FileNotFound => Self::EntryNotFound {
				uri: uri.clone(),
				name: name.to_owned(),
			},
			ZipError::Io(e) => Self::io(uri, e),
			other => Self::CorruptFileFormat {
				uri: uri.clone(),
				source: other,
			},
		}
	}

	pub(crate) fn write(uri: &Url, source: ZipError) -> Self {
		match source {
			ZipError::Io(e) => Self::io(uri, e),
			other => Self::Archive {
				uri: uri.clone(),
				source: other,
			},
		}
	}
}
