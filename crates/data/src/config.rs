//! Save and load options.
//!
//! Options can be built in code or read from a TOML table:
//!
//! ```toml
//! [load]
//! skip-version-check = true
//!
//! [save]
//! compression = "stored"
//! ```

use serde::Deserialize;
use wixir_container::Compression;

use crate::error::Result;

/// Setting this to `1` or `true` relaxes the format version gate.
pub const SKIP_VERSION_CHECK_ENV: &str = "WIXIR_SKIP_VERSION_CHECK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LoadOptions {
	/// Accept documents whose format version differs from the current one.
	pub skip_version_check: bool,
}

impl LoadOptions {
	/// Options that tolerate format version skew.
	pub fn relaxed() -> Self {
		Self { skip_version_check: true }
	}

	/// Reads [`SKIP_VERSION_CHECK_ENV`] from the environment.
	pub fn from_env() -> Self {
		Self::from_env_value(std::env::var(SKIP_VERSION_CHECK_ENV).ok().as_deref())
	}

	fn from_env_value(value: Option<&str>) -> Self {
		let skip_version_check = value.is_some_and(|v| {
			let v = v.trim();
			v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
		});
		Self { skip_version_check }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SaveOptions {
	/// Compression for entries written by this save.
	pub compression: Compression,
}

/// Combined options, as read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IrConfig {
	pub load: LoadOptions,
	pub save: SaveOptions,
}

impl IrConfig {
	pub fn from_toml_str(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}
}
