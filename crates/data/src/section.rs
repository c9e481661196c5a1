//! Sections: named, typed groups of symbols.
//!
//! The compiler produces sections through [`SectionBuilder`]. Library
//! membership is decided later by the linker and recorded as a separate
//! [`LibraryPlacement`] held by the owning [`crate::Intermediate`], so a
//! built section never changes identity after construction.

use std::fmt;
use std::str::FromStr;

use crate::symbol::Symbol;

/// Kind of compilation unit a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
	Bundle,
	Fragment,
	Module,
	Package,
	PatchCreation,
	Patch,
}

impl SectionKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Bundle => "bundle",
			Self::Fragment => "fragment",
			Self::Module => "module",
			Self::Package => "package",
			Self::PatchCreation => "patchCreation",
			Self::Patch => "patch",
		}
	}
}

impl fmt::Display for SectionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error parsing a section kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section type {0:?}")]
pub struct UnknownSectionKind(pub String);

impl FromStr for SectionKind {
	type Err = UnknownSectionKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"bundle" => Self::Bundle,
			"fragment" => Self::Fragment,
			"module" => Self::Module,
			"package" => Self::Package,
			"patchCreation" => Self::PatchCreation,
			"patch" => Self::Patch,
			other => return Err(UnknownSectionKind(other.to_owned())),
		})
	}
}

/// Compiler-side construction of a [`Section`].
#[derive(Debug, Clone)]
pub struct SectionBuilder {
	id: Option<String>,
	kind: SectionKind,
	compilation_id: Option<String>,
	symbols: Vec<Symbol>,
}

impl SectionBuilder {
	pub fn new(kind: SectionKind) -> Self {
		Self {
			id: None,
			kind,
			compilation_id: None,
			symbols: Vec::new(),
		}
	}

	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Stamps the compilation that produced this section.
	pub fn compilation_id(mut self, compilation_id: impl Into<String>) -> Self {
		self.compilation_id = Some(compilation_id.into());
		self
	}

	pub fn symbol(mut self, symbol: Symbol) -> Self {
		self.symbols.push(symbol);
		self
	}

	pub fn symbols(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
		self.symbols.extend(symbols);
		self
	}

	pub fn build(self) -> Section {
		Section {
			id: self.id,
			kind: self.kind,
			compilation_id: self.compilation_id,
			symbols: self.symbols,
		}
	}
}

/// A named group of symbols within an intermediate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
	id: Option<String>,
	kind: SectionKind,
	compilation_id: Option<String>,
	symbols: Vec<Symbol>,
}

impl Section {
	pub fn builder(kind: SectionKind) -> SectionBuilder {
		SectionBuilder::new(kind)
	}

	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn kind(&self) -> SectionKind {
		self.kind
	}

	pub fn compilation_id(&self) -> Option<&str> {
		self.compilation_id.as_deref()
	}

	/// Symbols in insertion order, which is also serialization order.
	pub fn symbols(&self) -> &[Symbol] {
		&self.symbols
	}

	pub fn symbols_mut(&mut self) -> &mut [Symbol] {
		&mut self.symbols
	}

	/// Appends `symbol` and returns a handle to it.
	pub fn add_symbol(&mut self, symbol: Symbol) -> &mut Symbol {
		self.symbols.push(symbol);
		let last = self.symbols.len() - 1;
		&mut self.symbols[last]
	}

	/// Index of `symbol` in this section, by identity.
	///
	/// An equal symbol at a different address is not found. Pair with
	/// [`take_symbol`](Self::take_symbol) to remove it.
	pub fn position_of(&self, symbol: &Symbol) -> Option<usize> {
		self.symbols.iter().position(|s| std::ptr::eq(s, symbol))
	}

	/// Removes and returns the symbol at `index`.
	pub fn take_symbol(&mut self, index: usize) -> Option<Symbol> {
		(index < self.symbols.len()).then(|| self.symbols.remove(index))
	}
}

/// Linker-owned record that a section belongs to a library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryPlacement {
	pub section_id: String,
	pub library_id: String,
}
