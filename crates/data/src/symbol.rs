//! Typed, field-structured compiled records.

use std::sync::Arc;

use crate::definition::SymbolDefinition;
use crate::error::{IrError, Result};
use crate::field::{FieldValue, PathRef};
use crate::identifier::Identifier;
use crate::source::SourceLocation;
use crate::tags::TagSet;

/// One record of a symbol type.
///
/// The field array is sized from the definition at construction and never
/// changes length. All field access is index-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
	definition: Arc<SymbolDefinition>,
	fields: Box<[Option<FieldValue>]>,
	id: Option<Identifier>,
	source_location: Option<SourceLocation>,
	tags: TagSet,
}

impl Symbol {
	/// Creates a symbol with every field unset.
	pub fn new(definition: Arc<SymbolDefinition>) -> Self {
		let fields = vec![None; definition.arity()].into_boxed_slice();
		Self {
			definition,
			fields,
			id: None,
			source_location: None,
			tags: TagSet::new(),
		}
	}

	pub fn with_id(mut self, id: Identifier) -> Self {
		self.id = Some(id);
		self
	}

	pub fn with_source_location(mut self, location: SourceLocation) -> Self {
		self.source_location = Some(location);
		self
	}

	/// Sets field `index` and returns the symbol, for building literals.
	pub fn with(mut self, index: usize, value: impl Into<FieldValue>) -> Result<Self> {
		self.set(index, value)?;
		Ok(self)
	}

	pub fn definition(&self) -> &Arc<SymbolDefinition> {
		&self.definition
	}

	/// Symbol type name.
	pub fn name(&self) -> &str {
		self.definition.name()
	}

	pub fn arity(&self) -> usize {
		self.fields.len()
	}

	pub fn id(&self) -> Option<&Identifier> {
		self.id.as_ref()
	}

	pub fn set_id(&mut self, id: Option<Identifier>) {
		self.id = id;
	}

	pub fn source_location(&self) -> Option<&SourceLocation> {
		self.source_location.as_ref()
	}

	pub fn set_source_location(&mut self, location: Option<SourceLocation>) {
		self.source_location = location;
	}

	pub fn field(&self, index: usize) -> Result<Option<&FieldValue>> {
		self.fields
			.get(index)
			.map(Option::as_ref)
			.ok_or_else(|| self.out_of_range(index))
	}

	/// Looks a field up by its definition name.
	pub fn field_by_name(&self, name: &str) -> Option<&FieldValue> {
		let index = self.definition.field_index(name)?;
		self.fields.get(index)?.as_ref()
	}

	/// Stores `value` in field `index`, with integers normalized to the
	/// field's declared width (see [`FieldKind::normalize`](crate::field::FieldKind::normalize)).
	pub fn set(&mut self, index: usize, value: impl Into<FieldValue>) -> Result<()> {
		let kind = self.definition.fields().get(index).map(|field| field.kind);
		let slot = self.slot(index)?;
		let value = value.into();
		*slot = Some(match kind {
			Some(kind) => kind.normalize(value),
			None => value,
		});
		Ok(())
	}

	/// Unsets field `index`, returning the previous value.
	pub fn clear(&mut self, index: usize) -> Result<Option<FieldValue>> {
		Ok(self.slot(index)?.take())
	}

	/// All field slots in definition order.
	pub fn fields(&self) -> &[Option<FieldValue>] {
		&self.fields
	}

	pub(crate) fn fields_mut(&mut self) -> &mut [Option<FieldValue>] {
		&mut self.fields
	}

	pub fn as_nullable_bool(&self, index: usize) -> Result<Option<bool>> {
		Ok(self.field(index)?.map(FieldValue::as_bool).transpose()?)
	}

	pub fn as_nullable_i32(&self, index: usize) -> Result<Option<i32>> {
		Ok(self.field(index)?.map(FieldValue::as_i32).transpose()?)
	}

	pub fn as_nullable_i64(&self, index: usize) -> Result<Option<i64>> {
		Ok(self.field(index)?.map(FieldValue::as_i64).transpose()?)
	}

	pub fn as_nullable_string(&self, index: usize) -> Result<Option<String>> {
		Ok(self.field(index)?.map(|v| v.as_string().into_owned()))
	}

	pub fn as_nullable_path(&self, index: usize) -> Result<Option<&PathRef>> {
		Ok(self.field(index)?.map(FieldValue::as_path).transpose()?)
	}

	pub fn tags(&self) -> &TagSet {
		&self.tags
	}

	pub fn tags_mut(&mut self) -> &mut TagSet {
		&mut self.tags
	}

	pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
		self.tags.add(tag)
	}

	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.has(tag)
	}

	pub fn remove_tag(&mut self, tag: &str) -> bool {
		self.tags.remove(tag)
	}

	fn slot(&mut self, index: usize) -> Result<&mut Option<FieldValue>> {
		if index >= self.fields.len() {
			return Err(self.out_of_range(index));
		}
		Ok(&mut self.fields[index])
	}

	fn out_of_range(&self, index: usize) -> IrError {
		IrError::FieldIndexOutOfRange {
			symbol: self.name().to_owned(),
			index,
			arity: self.fields.len(),
		}
	}
}
