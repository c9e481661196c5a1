//! Containers compiled into a host module.
//!
//! Extensions ship prebuilt libraries inside their own binary. They register the
//! bytes once with [`embed_container!`](crate::embed_container) and the loader
//! resolves them by module and resource name, the same way it would open a
//! container file.

/// A static container blob contributed by a host module.
#[derive(Debug)]
pub struct EmbeddedContainer {
	/// Name of the registering module, usually `env!("CARGO_PKG_NAME")`.
	pub module: &'static str,
	/// Resource name within the module.
	pub name: &'static str,
	/// Raw archive bytes.
	pub bytes: &'static [u8],
}

inventory::collect!(EmbeddedContainer);

/// Finds an embedded container by module and resource name.
pub fn find_embedded(module: &str, name: &str) -> Option<&'static EmbeddedContainer> {
	inventory::iter::<EmbeddedContainer>
		.into_iter()
		.find(|res| res.module == module && res.name == name)
}

/// Returns every registered embedded container, sorted by module then name.
pub fn all_embedded() -> Vec<&'static EmbeddedContainer> {
	let mut all: Vec<_> = inventory::iter::<EmbeddedContainer>.into_iter().collect();
	all.sort_by_key(|res| (res.module, res.name));
	all
}

/// Registers static container bytes under the calling crate's name.
///
/// ```ignore
/// wixir_container::embed_container!("acme.wixlib", include_bytes!("../lib/acme.wixlib"));
/// ```
#[macro_export]
macro_rules! embed_container {
	($module:expr, $name:expr, $bytes:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::EmbeddedContainer {
				module: $module,
				name: $name,
				bytes: $bytes,
			}
		}
	};
	($name:expr, $bytes:expr $(,)?) => {
		$crate::embed_container!(env!("CARGO_PKG_NAME"), $name, $bytes);
	};
}
