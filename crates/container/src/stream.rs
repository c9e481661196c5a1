use std::io::{self, Write};

use crate::container::PortableContainer;

/// Writable stream for one container entry.
///
/// Bytes are buffered and staged into the owning container when the stream is
/// dropped. The entry already exists (empty) from the moment the stream is
/// created, so a stream dropped without writes still replaces the old entry.
pub struct DataStream<'a> {
	container: &'a mut PortableContainer,
	name: String,
	buffer: Vec<u8>,
}

impl<'a> DataStream<'a> {
	pub(crate) fn new(container: &'a mut PortableContainer, name: String) -> Self {
		Self {
			container,
			name,
			buffer: Vec::new(),
		}
	}

	/// Name of the entry being written.
	pub fn name(&self) -> &str {
		&self.name
	}
}

impl Write for DataStream<'_> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl Drop for DataStream<'_> {
	fn drop(&mut self) {
		let bytes = std::mem::take(&mut self.buffer);
		self.container.stage_bytes(std::mem::take(&mut self.name), bytes);
	}
}
