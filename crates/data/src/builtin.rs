//! Built-in symbol definitions for the core installer tables.

use std::sync::{Arc, LazyLock};

use rustc_hash::FxHashMap;

use crate::definition::SymbolDefinition;
use crate::field::FieldKind as K;

static BUILTINS: LazyLock<Vec<Arc<SymbolDefinition>>> = LazyLock::new(|| {
	let mut defs = vec![
		SymbolDefinition::builtin("Binary", &[("Data", K::Path)]),
		SymbolDefinition::builtin(
			"Component",
			&[
				("ComponentId", K::String),
				("DirectoryRef", K::String),
				("Condition", K::String),
				("KeyPath", K::String),
				("KeyPathType", K::Number),
				("Location", K::Number),
				("DisableRegistryReflection", K::Bool),
				("NeverOverwrite", K::Bool),
				("Permanent", K::Bool),
				("Shared", K::Bool),
				("Transitive", K::Bool),
				("UninstallWhenSuperseded", K::Bool),
				("Win64", K::Bool),
			],
		),
		SymbolDefinition::builtin(
			"CustomAction",
			&[
				("ExecutionType", K::Number),
				("Source", K::String),
				("SourceType", K::Number),
				("Target", K::String),
				("TargetType", K::Number),
				("Async", K::Bool),
				("Hidden", K::Bool),
				("IgnoreResult", K::Bool),
				("Impersonate", K::Bool),
				("Win64", K::Bool),
			],
		),
		SymbolDefinition::builtin(
			"Directory",
			&[
				("ParentDirectoryRef", K::String),
				("Name", K::String),
				("ShortName", K::String),
				("SourceName", K::String),
				("SourceShortName", K::String),
				("ComponentGuidGenerationSeed", K::String),
			],
		),
		SymbolDefinition::builtin(
			"Feature",
			&[
				("ParentFeatureRef", K::String),
				("Title", K::String),
				("Description", K::String),
				("Display", K::Number),
				("Level", K::Number),
				("DirectoryRef", K::String),
				("InstallDefault", K::Number),
				("AllowAdvertise", K::Bool),
				("AllowAbsent", K::Bool),
			],
		),
		SymbolDefinition::builtin(
			"File",
			&[
				("ComponentRef", K::String),
				("Name", K::String),
				("ShortName", K::String),
				("FileSize", K::LargeNumber),
				("Version", K::String),
				("Language", K::String),
				("Attributes", K::Number),
				("DirectoryRef", K::String),
				("DiskId", K::Number),
				("Source", K::Path),
				("Sequence", K::Number),
			],
		),
		SymbolDefinition::builtin(
			"Media",
			&[
				("DiskId", K::Number),
				("LastSequence", K::Number),
				("DiskPrompt", K::String),
				("Cabinet", K::String),
				("VolumeLabel", K::String),
				("Source", K::String),
			],
		),
		SymbolDefinition::builtin("Property", &[("Value", K::String)]),
		SymbolDefinition::builtin(
			"Registry",
			&[
				("Root", K::Number),
				("Key", K::String),
				("Name", K::String),
				("Value", K::String),
				("ValueType", K::Number),
				("ValueAction", K::Number),
				("ComponentRef", K::String),
			],
		),
		SymbolDefinition::builtin("WixLibrary", &[("LibraryId", K::String), ("Culture", K::String)]),
	];
	defs.sort_by(|a, b| a.name().cmp(b.name()));
	defs.into_iter().map(Arc::new).collect()
});

static BY_NAME: LazyLock<FxHashMap<&'static str, Arc<SymbolDefinition>>> =
	LazyLock::new(|| BUILTINS.iter().map(|def| (def.name(), Arc::clone(def))).collect());

/// Looks up a built-in definition by symbol type name.
pub fn by_name(name: &str) -> Option<&'static Arc<SymbolDefinition>> {
	BY_NAME.get(name)
}

/// All built-in definitions, sorted by name.
pub fn all() -> &'static [Arc<SymbolDefinition>] {
	&BUILTINS
}
