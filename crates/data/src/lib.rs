#![cfg_attr(test, allow(unused_crate_dependencies))]

//! Intermediate object model for installer compilation.
//!
//! # Purpose
//!
//! A compiler turns source into [`Intermediate`] values: ordered [`Section`]s
//! of typed [`Symbol`]s plus per-culture [`Localization`]s. A linker later
//! reads them back, possibly many at once. This crate owns that model and its
//! portable serialization into a [`wixir_container::PortableContainer`].
//!
//! # Mental Model
//!
//! - A [`SymbolDefinition`] is a schema: a name and an ordered list of typed
//!   fields. Built-in definitions always resolve; extensions register theirs
//!   through a [`SymbolDefinitionCreator`].
//! - A [`Symbol`] is one record of a definition. Its field array has exactly
//!   the definition's arity and each slot may be unset.
//! - Saving embeds referenced files into the container and writes one JSON
//!   document. Loading reverses that, resolving every symbol type against the
//!   caller's registry.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Intermediate`] | Top-level value; save and load entry points. |
//! | [`PendingIntermediate`] | Parsed document awaiting symbol resolution. |
//! | [`SymbolDefinitionRegistry`] | Default definition lookup with revisions. |
//! | [`FieldValue`] | Field storage with checked coercions. |
//! | [`IrError`] | Every failure surfaced by this crate. |

pub mod builtin;
mod config;
mod definition;
mod error;
mod field;
mod identifier;
mod intermediate;
mod localization;
mod registry;
mod section;
mod source;
mod symbol;
mod tags;

pub use config::{IrConfig, LoadOptions, SKIP_VERSION_CHECK_ENV, SaveOptions};
pub use definition::{DefinitionOrigin, FieldDefinition, SymbolDefinition};
pub use error::{FieldError, IrError, Result};
pub use field::{FieldKind, FieldValue, PathRef};
pub use identifier::{AccessScope, Identifier};
pub use intermediate::{DOCUMENT_STREAM, EMBED_PREFIX, FORMAT_VERSION, Intermediate, PendingIntermediate};
pub use localization::{BindVariable, Localization, LocalizedControl, normalize_culture};
pub use registry::{RegisterOutcome, SymbolDefinitionCreator, SymbolDefinitionRegistry};
pub use section::{LibraryPlacement, Section, SectionBuilder, SectionKind, UnknownSectionKind};
pub use source::{ParseSourceLocationError, SourceLocation};
pub use symbol::Symbol;
pub use tags::TagSet;
pub use wixir_container::{Compression, PortableContainer};
