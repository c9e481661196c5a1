#![cfg_attr(test, allow(unused_crate_dependencies))]

//! Portable container for intermediate objects.
//!
//! # Purpose
//!
//! An intermediate object travels as a zip-compatible archive: one structured
//! document plus any number of embedded binary payload streams. This crate owns
//! the archive side of that exchange. It knows nothing about symbols or
//! sections; it only creates, reads, replaces and copies named streams.
//!
//! # Mental Model
//!
//! A [`PortableContainer`] is opened over exactly one byte source (a file on
//! disk, an in-memory buffer, or a static blob registered by a host module) and
//! is identified by a [`Url`]. Writes are staged in the container and become
//! visible in the underlying bytes on [`PortableContainer::commit`], which
//! rebuilds the archive. File-backed commits go through a temporary file in the
//! same directory and are renamed into place.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`PortableContainer`] | Archive handle with create/read/import/extract operations. |
//! | [`DataStream`] | Writable stream for a single entry, staged when dropped. |
//! | [`EmbeddedContainer`] | Static container bytes registered via `inventory`. |
//! | [`ContainerError`] | Typed failures; corruption is distinct from I/O. |
//!
//! # Concurrency
//!
//! A container is `!Sync` in spirit: entry creation and deletion mutate the
//! staged state through `&mut self`. Callers that share a container identity
//! across threads must serialize access per [`Url`].

mod container;
mod error;
mod resource;
mod source;
mod stream;
pub mod uri;

pub use container::{Compression, OpenMode, PortableContainer};
pub use error::{ContainerError, Result};
#[doc(hidden)]
pub use inventory;
pub use resource::{EmbeddedContainer, all_embedded, find_embedded};
pub use stream::DataStream;
pub use url::Url;

#[cfg(test)]
mod tests;
