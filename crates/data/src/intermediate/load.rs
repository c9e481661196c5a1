//! Reading intermediates back from containers.
//!
//! # Mental Model
//!
//! Loading is split into two steps that [`PendingIntermediate`] exposes
//! directly: opening parses and version-checks the document, and finalizing
//! resolves every symbol against a registry. Between the two, the document's
//! own extension definitions can be registered.
//!
//! A single load runs both steps back to back. A batch load opens and
//! registers every document before finalizing any of them, so a symbol in one
//! container can use a definition that only travels with another.

use std::path::Path;

use tracing::{debug, trace, warn};
use url::Url;
use wixir_container::PortableContainer;

use super::doc::{self, FORMAT_VERSION, IntermediateDoc, SymbolDoc, TagsDoc};
use super::{DOCUMENT_STREAM, Intermediate};
use crate::config::LoadOptions;
use crate::error::{IrError, Result};
use crate::registry::SymbolDefinitionCreator;
use crate::section::{LibraryPlacement, SectionBuilder, SectionKind};
use crate::symbol::Symbol;

/// A parsed, version-checked document whose symbols are not yet resolved.
#[derive(Debug)]
pub struct PendingIntermediate {
	uri: Url,
	doc: IntermediateDoc,
}

impl PendingIntermediate {
	/// Reads and parses the document stored in `container`.
	pub fn open(container: &mut PortableContainer, options: &LoadOptions) -> Result<Self> {
		let uri = container.uri().clone();
		let json = container.get_data(DOCUMENT_STREAM)?;
		let doc: IntermediateDoc = serde_json::from_str(&json).map_err(|source| IrError::InvalidDocument {
			uri: uri.clone(),
			source,
		})?;

		if !doc::version_matches(&doc.version) {
			if !options.skip_version_check {
				return Err(IrError::VersionMismatch {
					uri,
					found: doc.version,
					expected: FORMAT_VERSION,
				});
			}
			warn!(%uri, found = %doc.version, expected = FORMAT_VERSION, "loading document with a different format version");
		}

		trace!(%uri, sections = doc.sections.len(), definitions = doc.definitions.len(), "opened intermediate document");
		Ok(Self { uri, doc })
	}

	/// Identity of the container the document came from.
	pub fn uri(&self) -> &Url {
		&self.uri
	}

	/// Registers the extension definitions this document carries.
	pub fn register_definitions(&self, registry: &mut dyn SymbolDefinitionCreator) {
		for def in &self.doc.definitions {
			registry.add_custom_definition(def.to_definition());
		}
	}

	/// Resolves every symbol against `registry` and builds the intermediate.
	pub fn finalize(self, registry: &dyn SymbolDefinitionCreator) -> Result<Intermediate> {
		let Self { uri, doc } = self;

		let mut intermediate = match doc.id {
			Some(id) => Intermediate::with_id(id),
			None => Intermediate::new(),
		};
		intermediate.level = doc.level;

		for section_doc in doc.sections {
			let kind = section_doc.kind.parse::<SectionKind>().map_err(|e| IrError::Malformed {
				uri: uri.clone(),
				reason: e.to_string(),
			})?;

			let mut builder = SectionBuilder::new(kind);
			if let Some(id) = &section_doc.id {
				builder = builder.id(id.clone());
			}
			if let Some(compilation_id) = section_doc.compilation_id {
				builder = builder.compilation_id(compilation_id);
			}
			for symbol_doc in section_doc.symbols {
				builder = builder.symbol(resolve_symbol(&uri, symbol_doc, registry)?);
			}

			match (section_doc.id, section_doc.library_id) {
				(Some(section_id), Some(library_id)) => {
					intermediate.placements.push(LibraryPlacement { section_id, library_id });
				}
				(None, Some(library_id)) => {
					warn!(%uri, library = %library_id, "ignoring library placement of a section without an id");
				}
				(_, None) => {}
			}
			intermediate.sections.push(builder.build());
		}

		for localization in doc.localizations {
			intermediate.add_localization(localization.into_localization())?;
		}

		debug!(%uri, id = %intermediate.id, sections = intermediate.sections.len(), "loaded intermediate");
		Ok(intermediate)
	}
}

fn resolve_symbol(uri: &Url, stored: SymbolDoc, registry: &dyn SymbolDefinitionCreator) -> Result<Symbol> {
	let definition = registry.try_get_by_name(&stored.name).ok_or_else(|| IrError::UnknownSymbolType {
		uri: uri.clone(),
		name: stored.name.clone(),
	})?;

	if stored.fields.len() > definition.arity() {
		trace!(
			%uri,
			symbol = %stored.name,
			stored = stored.fields.len(),
			arity = definition.arity(),
			"dropping fields beyond the definition"
		);
	}

	let mut symbol = Symbol::new(definition.clone());
	symbol.set_id(stored.id);
	symbol.set_source_location(stored.source_location);
	for (index, (value, field)) in stored.fields.into_iter().zip(definition.fields()).enumerate() {
		let value = doc::field_from_json(field.kind, value, uri).map_err(|reason| IrError::Malformed {
			uri: uri.clone(),
			reason: format!("{}.{}: {reason}", stored.name, field.name),
		})?;
		if let Some(value) = value {
			symbol.set(index, value)?;
		}
	}
	for tag in stored.tags.map(TagsDoc::into_vec).unwrap_or_default() {
		symbol.add_tag(tag);
	}
	Ok(symbol)
}

impl Intermediate {
	/// Loads the intermediate stored in the container file at `path`.
	pub fn load(
		path: impl AsRef<Path>,
		registry: &mut dyn SymbolDefinitionCreator,
		options: &LoadOptions,
	) -> Result<Self> {
		let mut container = PortableContainer::read(path)?;
		Self::load_from(&mut container, registry, options)
	}

	/// Loads the intermediate stored in an already open container.
	pub fn load_from(
		container: &mut PortableContainer,
		registry: &mut dyn SymbolDefinitionCreator,
		options: &LoadOptions,
	) -> Result<Self> {
		let pending = PendingIntermediate::open(container, options)?;
		pending.register_definitions(registry);
		pending.finalize(registry)
	}

	/// Loads the intermediate registered by module `module` as `name`.
	pub fn load_embedded(
		module: &str,
		name: &str,
		registry: &mut dyn SymbolDefinitionCreator,
		options: &LoadOptions,
	) -> Result<Self> {
		let mut container = PortableContainer::read_embedded(module, name)?;
		Self::load_from(&mut container, registry, options)
	}

	/// Loads several container files sharing one registry.
	///
	/// Every document is opened and its definitions registered before any is
	/// finalized. Results are in input order.
	pub fn load_batch<P: AsRef<Path>>(
		paths: impl IntoIterator<Item = P>,
		registry: &mut dyn SymbolDefinitionCreator,
		options: &LoadOptions,
	) -> Result<Vec<Self>> {
		let mut containers = paths
			.into_iter()
			.map(PortableContainer::read)
			.collect::<std::result::Result<Vec<_>, _>>()?;
		Self::load_batch_from(&mut containers, registry, options)
	}

	/// Batch variant of [`load_from`](Self::load_from) over open containers.
	pub fn load_batch_from(
		containers: &mut [PortableContainer],
		registry: &mut dyn SymbolDefinitionCreator,
		options: &LoadOptions,
	) -> Result<Vec<Self>> {
		let pending = containers
			.iter_mut()
			.map(|container| PendingIntermediate::open(container, options))
			.collect::<Result<Vec<_>>>()?;

		for document in &pending {
			document.register_definitions(registry);
		}
		debug!(documents = pending.len(), "registered batch definitions");

		pending.into_iter().map(|document| document.finalize(registry)).collect()
	}
}
