//! Symbol definition lookup and extension registration.
//!
//! # Mental Model
//!
//! Built-in definitions are always resolvable. Extension definitions must be
//! registered before any document that uses them is finalized; documents also
//! carry copies of the extension definitions they use, which loading registers
//! on the caller's behalf.
//!
//! # Invariants
//!
//! - Built-in names cannot be shadowed by a custom definition.
//! - For a given name, the registry holds the highest revision it has seen;
//!   equal or lower revisions are ignored. This keeps a host's newer schema in
//!   place when an older document arrives with its own copy.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::builtin;
use crate::definition::SymbolDefinition;

/// Result of registering a custom definition.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RegisterOutcome {
	/// Name was new; definition inserted.
	InsertedNew,
	/// Name existed at an equal or higher revision, or is built in.
	KeptExisting,
	/// Name existed at a lower revision; definition replaced.
	ReplacedExisting,
}

/// Resolves symbol type names to definitions.
///
/// Loading takes this by reference so callers decide which extensions are
/// visible to a given load.
pub trait SymbolDefinitionCreator {
	/// Looks up a definition by symbol type name.
	fn try_get_by_name(&self, name: &str) -> Option<Arc<SymbolDefinition>>;

	/// Registers an extension definition.
	fn add_custom_definition(&mut self, definition: SymbolDefinition) -> RegisterOutcome;
}

/// Default [`SymbolDefinitionCreator`]: built-ins plus a table of custom definitions.
#[derive(Debug, Clone, Default)]
pub struct SymbolDefinitionRegistry {
	custom: FxHashMap<String, Arc<SymbolDefinition>>,
}

impl SymbolDefinitionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registered custom definitions, sorted by name.
	pub fn custom_definitions(&self) -> Vec<Arc<SymbolDefinition>> {
		let mut defs: Vec<_> = self.custom.values().cloned().collect();
		defs.sort_by(|a, b| a.name().cmp(b.name()));
		defs
	}
}

impl SymbolDefinitionCreator for SymbolDefinitionRegistry {
	fn try_get_by_name(&self, name: &str) -> Option<Arc<SymbolDefinition>> {
		builtin::by_name(name).or_else(|| self.custom.get(name)).cloned()
	}

	fn add_custom_definition(&mut self, definition: SymbolDefinition) -> RegisterOutcome {
		if builtin::by_name(definition.name()).is_some() {
			trace!(name = definition.name(), "ignoring custom definition shadowing a built-in");
			return RegisterOutcome::KeptExisting;
		}

		let outcome = match self.custom.get(definition.name()) {
			None => RegisterOutcome::InsertedNew,
			Some(existing) if definition.revision() > existing.revision() => RegisterOutcome::ReplacedExisting,
			Some(_) => return RegisterOutcome::KeptExisting,
		};
		debug!(
			name = definition.name(),
			revision = definition.revision(),
			fields = definition.arity(),
			?outcome,
			"registered symbol definition"
		);
		self.custom.insert(definition.name().to_owned(), Arc::new(definition));
		outcome
	}
}

#[cfg(test)]
mod tests;
