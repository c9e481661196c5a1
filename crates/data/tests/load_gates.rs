#![allow(unused_crate_dependencies)]

//! Failure modes and compatibility rules applied while loading.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wixir_container::ContainerError;
use wixir_data::{
	DOCUMENT_STREAM, FORMAT_VERSION, FieldDefinition, FieldKind, FieldValue, Intermediate, IrError, LoadOptions,
	PortableContainer, SaveOptions, Section, SectionKind, Symbol, SymbolDefinition, SymbolDefinitionCreator,
	SymbolDefinitionRegistry,
};

fn container_with(doc: Value) -> PortableContainer {
	let mut container = PortableContainer::create().unwrap();
	container.write_data(DOCUMENT_STREAM, doc.to_string()).unwrap();
	container
}

fn frob_symbol_doc(label: &str) -> Value {
	json!({ "type": "Acme.Frob", "fields": [label] })
}

fn frob_definition_doc() -> Value {
	json!({ "name": "Acme.Frob", "fields": [{ "name": "Label", "type": "string" }] })
}

fn frob(arity: usize, revision: u32) -> SymbolDefinition {
	let fields = (0..arity)
		.map(|i| FieldDefinition::new(format!("F{i}"), FieldKind::String))
		.collect();
	SymbolDefinition::custom_revision("Acme.Frob", fields, revision)
}

#[test]
fn test_version_mismatch_is_fatal_unless_relaxed() {
	let doc = json!({ "id": "old", "version": "3.9.9.9", "sections": [] });

	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container_with(doc.clone()), &mut registry, &LoadOptions::default())
		.unwrap_err();
	match err {
		IrError::VersionMismatch { found, expected, .. } => {
			assert_eq!(found, "3.9.9.9");
			assert_eq!(expected, FORMAT_VERSION);
		}
		other => panic!("expected version mismatch, got {other}"),
	}

	let loaded = Intermediate::load_from(&mut container_with(doc), &mut registry, &LoadOptions::relaxed()).unwrap();
	assert_eq!(loaded.id(), "old");
}

#[test]
fn test_missing_version_is_a_mismatch() {
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(
		&mut container_with(json!({ "id": "x", "sections": [] })),
		&mut registry,
		&LoadOptions::default(),
	)
	.unwrap_err();
	assert!(matches!(err, IrError::VersionMismatch { .. }));
}

#[test]
fn test_unknown_symbol_type_until_registered() {
	let doc = json!({
		"id": "frobs",
		"version": FORMAT_VERSION,
		"sections": [{ "type": "fragment", "id": "f", "symbols": [frob_symbol_doc("x")] }],
	});

	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container_with(doc.clone()), &mut registry, &LoadOptions::default())
		.unwrap_err();
	assert!(matches!(&err, IrError::UnknownSymbolType { name, .. } if name == "Acme.Frob"), "{err}");

	registry.add_custom_definition(frob(1, 0));
	let loaded = Intermediate::load_from(&mut container_with(doc), &mut registry, &LoadOptions::default()).unwrap();
	let symbol = &loaded.sections()[0].symbols()[0];
	assert_eq!(symbol.name(), "Acme.Frob");
	assert_eq!(symbol.field(0).unwrap(), Some(&FieldValue::from("x")));
}

#[test]
fn test_batch_load_shares_definitions_across_documents() {
	let declaring = json!({
		"id": "x",
		"version": FORMAT_VERSION,
		"sections": [{ "type": "fragment", "id": "fx", "symbols": [frob_symbol_doc("from x")] }],
		"definitions": [frob_definition_doc()],
	});
	let using = json!({
		"id": "y",
		"version": FORMAT_VERSION,
		"sections": [{ "type": "fragment", "id": "fy", "symbols": [frob_symbol_doc("from y")] }],
	});

	// The user comes first, so a single pass would fail on it.
	let mut containers = [container_with(using.clone()), container_with(declaring)];
	let mut registry = SymbolDefinitionRegistry::new();
	let loaded = Intermediate::load_batch_from(&mut containers, &mut registry, &LoadOptions::default()).unwrap();
	let ids: Vec<_> = loaded.iter().map(Intermediate::id).collect();
	assert_eq!(ids, vec!["y", "x"]);
	assert_eq!(
		loaded[0].sections()[0].symbols()[0].field(0).unwrap(),
		Some(&FieldValue::from("from y"))
	);

	let mut alone = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container_with(using), &mut alone, &LoadOptions::default()).unwrap_err();
	assert!(matches!(err, IrError::UnknownSymbolType { .. }));
}

#[test]
fn test_batch_load_from_files() {
	let dir = tempfile::tempdir().unwrap();
	let mut producer = SymbolDefinitionRegistry::new();
	producer.add_custom_definition(frob(1, 0));
	let definition = producer.try_get_by_name("Acme.Frob").unwrap();

	let mut paths = Vec::new();
	for name in ["a", "b"] {
		let mut ir = Intermediate::with_id(name);
		ir.add_section(
			Section::builder(SectionKind::Fragment)
				.id(name)
				.symbol(Symbol::new(definition.clone()).with(0, name).unwrap())
				.build(),
		);
		let path = dir.path().join(format!("{name}.wixipl"));
		ir.save(&path).unwrap();
		paths.push(path);
	}

	let mut registry = SymbolDefinitionRegistry::new();
	let loaded = Intermediate::load_batch(&paths, &mut registry, &LoadOptions::default()).unwrap();
	assert_eq!(loaded.len(), 2);
	assert_eq!(registry.custom_definitions().len(), 1);
}

#[test]
fn test_newer_definition_leaves_extra_fields_unset() {
	let mut old = SymbolDefinitionRegistry::new();
	old.add_custom_definition(frob(2, 0));
	let mut ir = Intermediate::with_id("old");
	ir.add_section(
		Section::builder(SectionKind::Fragment)
			.id("f")
			.symbol(
				Symbol::new(old.try_get_by_name("Acme.Frob").unwrap())
					.with(0, "a")
					.unwrap()
					.with(1, "b")
					.unwrap(),
			)
			.build(),
	);
	let mut container = PortableContainer::create().unwrap();
	ir.save_to(&mut container, &SaveOptions::default()).unwrap();

	let mut host = SymbolDefinitionRegistry::new();
	host.add_custom_definition(frob(4, 1));
	let loaded = Intermediate::load_from(&mut container, &mut host, &LoadOptions::default()).unwrap();

	let symbol = &loaded.sections()[0].symbols()[0];
	assert_eq!(symbol.arity(), 4);
	assert_eq!(symbol.field(0).unwrap(), Some(&FieldValue::from("a")));
	assert_eq!(symbol.field(1).unwrap(), Some(&FieldValue::from("b")));
	assert_eq!(symbol.field(2).unwrap(), None);
	assert_eq!(symbol.field(3).unwrap(), None);
	assert_eq!(host.try_get_by_name("Acme.Frob").unwrap().revision(), 1);
}

#[test]
fn test_fields_beyond_definition_are_dropped() {
	let doc = json!({
		"version": FORMAT_VERSION,
		"sections": [{ "type": "fragment", "symbols": [{ "type": "Property", "fields": ["v", "extra", 3] }] }],
	});
	let mut registry = SymbolDefinitionRegistry::new();
	let loaded = Intermediate::load_from(&mut container_with(doc), &mut registry, &LoadOptions::default()).unwrap();

	let symbol = &loaded.sections()[0].symbols()[0];
	assert_eq!(symbol.arity(), 1);
	assert_eq!(symbol.as_nullable_string(0).unwrap().as_deref(), Some("v"));
	assert!(!loaded.id().is_empty(), "missing id gets a fresh one");
}

#[test]
fn test_duplicate_culture_is_rejected() {
	let doc = json!({
		"id": "loc",
		"version": FORMAT_VERSION,
		"sections": [],
		"localizations": [{ "culture": "en-US" }, { "culture": "EN-us" }],
	});
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container_with(doc), &mut registry, &LoadOptions::default()).unwrap_err();
	assert!(matches!(err, IrError::DuplicateCulture { culture } if culture == "en-us"));
}

#[test]
fn test_unknown_section_type_is_malformed() {
	let doc = json!({
		"id": "bad",
		"version": FORMAT_VERSION,
		"sections": [{ "type": "unknown", "symbols": [] }],
	});
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container_with(doc), &mut registry, &LoadOptions::default()).unwrap_err();
	assert!(matches!(err, IrError::Malformed { .. }), "{err}");
}

#[test]
fn test_structurally_invalid_document() {
	let mut container = PortableContainer::create().unwrap();
	container.write_data(DOCUMENT_STREAM, "{ not json").unwrap();
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container, &mut registry, &LoadOptions::default()).unwrap_err();
	assert!(matches!(err, IrError::InvalidDocument { .. }), "{err}");
}

#[test]
fn test_container_without_document() {
	let mut container = PortableContainer::create().unwrap();
	container.write_data("other.txt", "x").unwrap();
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_from(&mut container, &mut registry, &LoadOptions::default()).unwrap_err();
	assert!(
		matches!(err, IrError::Container(ContainerError::EntryNotFound { ref name, .. }) if name == DOCUMENT_STREAM),
		"{err}"
	);
}

#[test]
fn test_not_an_archive() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("garbage.wixipl");
	std::fs::write(&path, b"definitely not a zip archive").unwrap();
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load(&path, &mut registry, &LoadOptions::default()).unwrap_err();
	assert!(
		matches!(err, IrError::Container(ContainerError::CorruptFileFormat { .. })),
		"{err}"
	);
}

#[test]
fn test_missing_embedded_resource() {
	let mut registry = SymbolDefinitionRegistry::new();
	let err = Intermediate::load_embedded("wixir-data-tests", "absent.wixipl", &mut registry, &LoadOptions::default())
		.unwrap_err();
	assert!(
		matches!(err, IrError::Container(ContainerError::ResourceNotFound { .. })),
		"{err}"
	);
}
