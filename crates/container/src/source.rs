use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Byte source an archive is read from.
pub(crate) enum Source {
	File(File),
	Memory(Cursor<Vec<u8>>),
	Static(Cursor<&'static [u8]>),
}

impl Read for Source {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		match self {
			Self::File(f) => f.read(buf),
			Self::Memory(c) => c.read(buf),
			Self::Static(c) => c.read(buf),
		}
	}
}

impl Seek for Source {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		match self {
			Self::File(f) => f.seek(pos),
			Self::Memory(c) => c.seek(pos),
			Self::Static(c) => c.seek(pos),
		}
	}
}
