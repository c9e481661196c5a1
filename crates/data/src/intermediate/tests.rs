use pretty_assertions::assert_eq;

use super::Intermediate;
use crate::error::IrError;
use crate::localization::{BindVariable, Localization};
use crate::section::{Section, SectionKind};

#[test]
fn test_new_ids_are_unique() {
	assert_ne!(Intermediate::new().id(), Intermediate::new().id());
	assert_eq!(Intermediate::with_id("fixed").id(), "fixed");
}

#[test]
fn test_update_level_appends_with_separator() {
	let mut ir = Intermediate::new();
	assert_eq!(ir.level(), None);
	ir.update_level("compile");
	ir.update_level("link");
	assert_eq!(ir.level(), Some("compile;link"));
}

#[test]
fn test_has_level_matches_whole_stages_only() {
	let mut ir = Intermediate::new();
	assert!(!ir.has_level("link"));
	ir.update_level("linker");
	ir.update_level("AB");
	assert!(ir.has_level("linker"));
	assert!(ir.has_level("AB"));
	assert!(!ir.has_level("link"));
	assert!(!ir.has_level("A"));
}

#[test]
fn test_localization_cultures_are_normalized_and_unique() {
	let mut ir = Intermediate::new();
	ir.add_localization(Localization::new("en-US").with_variable(BindVariable::new("Title", "Setup")))
		.unwrap();

	let found = ir.localization("EN-us").expect("lookup ignores case");
	assert_eq!(found.culture(), "en-us");
	assert_eq!(found.variable("Title").and_then(|v| v.value.as_deref()), Some("Setup"));

	let err = ir.add_localization(Localization::new("en-us")).unwrap_err();
	assert!(matches!(err, IrError::DuplicateCulture { culture } if culture == "en-us"));

	assert!(ir.remove_localization("En-Us").is_some());
	assert_eq!(ir.localizations().count(), 0);
}

#[test]
fn test_assign_to_library_skips_unnamed_sections() {
	let mut ir = Intermediate::new();
	ir.add_section(Section::builder(SectionKind::Fragment).id("a").build());
	ir.add_section(Section::builder(SectionKind::Fragment).build());
	ir.add_section(Section::builder(SectionKind::Module).id("b").build());

	assert_eq!(ir.assign_to_library("lib"), 2);
	assert_eq!(ir.library_of(&ir.sections()[0]), Some("lib"));
	assert_eq!(ir.library_of(&ir.sections()[1]), None);
	assert_eq!(ir.library_of(&ir.sections()[2]), Some("lib"));

	assert_eq!(ir.assign_to_library("other"), 2);
	assert!(ir.placements().iter().all(|p| p.library_id == "other"));
}

#[test]
fn test_take_section_drops_its_placement() {
	let mut ir = Intermediate::new();
	ir.add_section(Section::builder(SectionKind::Fragment).id("a").build());
	ir.add_section(Section::builder(SectionKind::Fragment).id("b").build());
	ir.assign_to_library("lib");

	let first = ir.section_position(&ir.sections()[0]).expect("section found by identity");
	let removed = ir.take_section(first).expect("section removed");
	assert_eq!(removed.id(), Some("a"));
	assert_eq!(ir.placements().len(), 1);
	assert_eq!(ir.placements()[0].section_id, "b");

	let outsider = Section::builder(SectionKind::Fragment).id("b").build();
	assert_eq!(ir.section_position(&outsider), None);
	assert!(ir.take_section(1).is_none());
}
