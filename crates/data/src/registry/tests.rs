use super::{RegisterOutcome, SymbolDefinitionCreator, SymbolDefinitionRegistry};
use crate::definition::{DefinitionOrigin, FieldDefinition, SymbolDefinition};
use crate::field::FieldKind;

fn frob(revision: u32, arity: usize) -> SymbolDefinition {
	let fields = (0..arity)
		.map(|i| FieldDefinition::new(format!("F{i}"), FieldKind::String))
		.collect();
	SymbolDefinition::custom_revision("Acme.Frob", fields, revision)
}

#[test]
fn test_builtins_resolve_without_registration() {
	let registry = SymbolDefinitionRegistry::new();
	let file = registry.try_get_by_name("File").expect("File is built in");
	assert_eq!(file.origin(), DefinitionOrigin::BuiltIn);
	assert_eq!(file.field_index("Source"), Some(9));
	assert_eq!(file.fields()[9].kind, FieldKind::Path);
	assert!(registry.try_get_by_name("Acme.Frob").is_none());
}

#[test]
fn test_builtins_are_sorted_and_unique() {
	let names: Vec<_> = crate::builtin::all().iter().map(|d| d.name()).collect();
	let mut sorted = names.clone();
	sorted.sort();
	sorted.dedup();
	assert_eq!(names, sorted);
}

#[test]
fn test_custom_definition_registration() {
	let mut registry = SymbolDefinitionRegistry::new();
	assert_eq!(registry.add_custom_definition(frob(0, 2)), RegisterOutcome::InsertedNew);
	let def = registry.try_get_by_name("Acme.Frob").unwrap();
	assert!(def.is_extension());
	assert_eq!(def.arity(), 2);
}

#[test]
fn test_higher_revision_replaces_lower_is_ignored() {
	let mut registry = SymbolDefinitionRegistry::new();
	registry.add_custom_definition(frob(1, 4));

	assert_eq!(registry.add_custom_definition(frob(0, 2)), RegisterOutcome::KeptExisting);
	assert_eq!(registry.add_custom_definition(frob(1, 3)), RegisterOutcome::KeptExisting);
	assert_eq!(registry.try_get_by_name("Acme.Frob").unwrap().arity(), 4);

	assert_eq!(registry.add_custom_definition(frob(2, 5)), RegisterOutcome::ReplacedExisting);
	assert_eq!(registry.try_get_by_name("Acme.Frob").unwrap().arity(), 5);
	assert_eq!(registry.custom_definitions().len(), 1);
}

#[test]
fn test_custom_cannot_shadow_builtin() {
	let mut registry = SymbolDefinitionRegistry::new();
	let fake = SymbolDefinition::custom_revision("Property", vec![], 99);
	assert_eq!(registry.add_custom_definition(fake), RegisterOutcome::KeptExisting);
	assert_eq!(registry.try_get_by_name("Property").unwrap().arity(), 1);
}
