//! Per-culture localization tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::SourceLocation;

/// Normalizes a culture name for use as a lookup key.
pub fn normalize_culture(culture: &str) -> String {
	culture.to_ascii_lowercase()
}

/// A localized string variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindVariable {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub overridable: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_location: Option<SourceLocation>,
}

impl BindVariable {
	pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			value: Some(value.into()),
			default_value: None,
			overridable: false,
			source_location: None,
		}
	}
}

/// Localized metrics and text for a dialog or one of its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedControl {
	pub dialog: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub control: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<i32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<i32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<i32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<i32>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub right_to_left: bool,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub right_aligned: bool,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub left_scroll: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

impl LocalizedControl {
	/// Lookup key: `dialog` for the dialog itself, `dialog/control` for a control.
	pub fn key(&self) -> String {
		match &self.control {
			Some(control) => format!("{}/{control}", self.dialog),
			None => self.dialog.clone(),
		}
	}
}

/// Localized strings and control metrics for one culture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
	culture: String,
	codepage: Option<u32>,
	summary_info_codepage: Option<u32>,
	variables: BTreeMap<String, BindVariable>,
	controls: BTreeMap<String, LocalizedControl>,
}

impl Localization {
	/// Creates an empty localization. An empty culture is culture-neutral.
	pub fn new(culture: &str) -> Self {
		Self {
			culture: normalize_culture(culture),
			codepage: None,
			summary_info_codepage: None,
			variables: BTreeMap::new(),
			controls: BTreeMap::new(),
		}
	}

	pub fn with_codepage(mut self, codepage: u32) -> Self {
		self.codepage = Some(codepage);
		self
	}

	pub fn with_summary_info_codepage(mut self, codepage: u32) -> Self {
		self.summary_info_codepage = Some(codepage);
		self
	}

	/// Adds a variable, replacing one with the same id.
	pub fn with_variable(mut self, variable: BindVariable) -> Self {
		self.variables.insert(variable.id.clone(), variable);
		self
	}

	/// Adds a control, replacing one with the same key.
	pub fn with_control(mut self, control: LocalizedControl) -> Self {
		self.controls.insert(control.key(), control);
		self
	}

	/// Normalized (lowercase) culture name.
	pub fn culture(&self) -> &str {
		&self.culture
	}

	pub fn codepage(&self) -> Option<u32> {
		self.codepage
	}

	pub fn summary_info_codepage(&self) -> Option<u32> {
		self.summary_info_codepage
	}

	pub fn variables(&self) -> &BTreeMap<String, BindVariable> {
		&self.variables
	}

	pub fn variable(&self, id: &str) -> Option<&BindVariable> {
		self.variables.get(id)
	}

	pub fn controls(&self) -> &BTreeMap<String, LocalizedControl> {
		&self.controls
	}

	pub fn control(&self, dialog: &str, control: Option<&str>) -> Option<&LocalizedControl> {
		match control {
			Some(control) => self.controls.get(&format!("{dialog}/{control}")),
			None => self.controls.get(dialog),
		}
	}
}
