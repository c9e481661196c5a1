//! Container identity URIs.
//!
//! Three schemes identify where a container's bytes live:
//!
//! * `file:` - a container file on local disk
//! * `embeddedresource:<module>#<name>` - a blob registered by a host module
//! * `memory:<uuid>` - an in-memory buffer; not resolvable from another container

use std::path::Path;

use url::Url;

use crate::error::{ContainerError, Result};

/// Scheme for containers registered through [`crate::EmbeddedContainer`].
pub const EMBEDDED_SCHEME: &str = "embeddedresource";

/// Scheme for anonymous in-memory containers.
pub const MEMORY_SCHEME: &str = "memory";

/// Returns the `file:` URI for `path`, made absolute against the working directory.
pub fn file_uri(path: &Path) -> Result<Url> {
	let absolute = std::path::absolute(path).map_err(|e| ContainerError::local(path, e))?;
	Url::from_file_path(&absolute).map_err(|()| ContainerError::UnsupportedUri(absolute.display().to_string()))
}

/// Returns the URI addressing an embedded container.
///
/// Module and resource names are expected to be URI-safe (no spaces or `#`).
pub fn embedded_uri(module: &str, name: &str) -> Result<Url> {
	let raw = format!("{EMBEDDED_SCHEME}:{module}#{name}");
	Url::parse(&raw).map_err(|_| ContainerError::UnsupportedUri(raw))
}

/// Splits an embedded container URI into `(module, name)`.
pub fn parse_embedded(uri: &Url) -> Option<(&str, &str)> {
	if uri.scheme() != EMBEDDED_SCHEME {
		return None;
	}
	let name = uri.fragment().filter(|f| !f.is_empty())?;
	Some((uri.path(), name))
}

pub(crate) fn memory_uri() -> Result<Url> {
	let raw = format!("{MEMORY_SCHEME}:{}", uuid::Uuid::new_v4().simple());
	Url::parse(&raw).map_err(|_| ContainerError::UnsupportedUri(raw))
}
