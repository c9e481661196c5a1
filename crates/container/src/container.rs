use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ContainerError, Result};
use crate::resource::find_embedded;
use crate::source::Source;
use crate::stream::DataStream;
use crate::uri::{self, EMBEDDED_SCHEME};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Compression applied to entries written by a commit.
///
/// Entries carried over unchanged from the previous archive keep their original
/// compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
	/// Store entries without compression.
	Stored,
	/// Deflate entries.
	#[default]
	Deflated,
}

impl Compression {
	fn method(self) -> CompressionMethod {
		match self {
			Self::Stored => CompressionMethod::Stored,
			Self::Deflated => CompressionMethod::Deflated,
		}
	}
}

/// Access mode a container was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
	/// Entries can be read but not written.
	Read,
	/// An existing archive is read and incrementally updated.
	Update,
	/// A fresh archive is being built.
	Create,
}

impl OpenMode {
	pub const fn is_writable(self) -> bool {
		!matches!(self, Self::Read)
	}
}

/// Where committed archive bytes go.
enum Backing {
	File(PathBuf),
	Memory,
	Static,
}

/// Entry contents waiting for the next commit.
enum Staged {
	Bytes(Vec<u8>),
	Import(PathBuf),
}

/// A random-access archive of named streams.
///
/// Staged writes shadow archived entries of the same name until
/// [`commit`](Self::commit) rebuilds the archive. Dropping a container does not
/// commit.
pub struct PortableContainer {
	uri: Url,
	mode: OpenMode,
	backing: Backing,
	archive: Option<ZipArchive<Source>>,
	staged: BTreeMap<String, Staged>,
	removed: BTreeSet<String>,
	compression: Compression,
	dirty: bool,
}

impl PortableContainer {
	/// Creates an empty in-memory container.
	pub fn create() -> Result<Self> {
		Ok(Self::fresh(uri::memory_uri()?, Backing::Memory))
	}

	/// Creates an empty container that commits to `path`.
	///
	/// Any existing file at `path` is replaced on the first commit; missing
	/// parent directories are created now.
	pub fn create_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let uri = uri::file_uri(path)?;
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| ContainerError::local(parent, e))?;
		}
		debug!(%uri, "creating container");
		Ok(Self::fresh(uri, Backing::File(path.to_path_buf())))
	}

	/// Opens `bytes` for update under the identity `uri`.
	///
	/// Empty input starts a fresh archive.
	pub fn create_from_bytes(uri: Url, bytes: Vec<u8>) -> Result<Self> {
		if bytes.is_empty() {
			return Ok(Self::fresh(uri, Backing::Memory));
		}
		Self::open(uri, Backing::Memory, Source::Memory(Cursor::new(bytes)), OpenMode::Update)
	}

	/// Opens the container file at `path` for reading.
	pub fn read(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let uri = uri::file_uri(path)?;
		let file = File::open(path).map_err(|e| ContainerError::io(&uri, e))?;
		Self::open(uri, Backing::File(path.to_path_buf()), Source::File(file), OpenMode::Read)
	}

	/// Opens in-memory archive bytes for reading under the identity `uri`.
	pub fn read_bytes(uri: Url, bytes: Vec<u8>) -> Result<Self> {
		Self::open(uri, Backing::Memory, Source::Memory(Cursor::new(bytes)), OpenMode::Read)
	}

	/// Opens a container registered by a host module.
	pub fn read_embedded(module: &str, name: &str) -> Result<Self> {
		let resource = find_embedded(module, name).ok_or_else(|| ContainerError::ResourceNotFound {
			module: module.to_owned(),
			name: name.to_owned(),
		})?;
		let uri = uri::embedded_uri(module, name)?;
		Self::open(uri, Backing::Static, Source::Static(Cursor::new(resource.bytes)), OpenMode::Read)
	}

	/// Opens the container identified by `uri` for reading.
	pub fn read_uri(uri: &Url) -> Result<Self> {
		match uri.scheme() {
			"file" => {
				let path = uri.to_file_path().map_err(|()| ContainerError::UnsupportedUri(uri.to_string()))?;
				Self::read(path)
			}
			EMBEDDED_SCHEME => {
				let (module, name) =
					uri::parse_embedded(uri).ok_or_else(|| ContainerError::UnsupportedUri(uri.to_string()))?;
				Self::read_embedded(module, name)
			}
			_ => Err(ContainerError::UnsupportedUri(uri.to_string())),
		}
	}

	fn fresh(uri: Url, backing: Backing) -> Self {
		Self {
			uri,
			mode: OpenMode::Create,
			backing,
			archive: None,
			staged: BTreeMap::new(),
			removed: BTreeSet::new(),
			compression: Compression::default(),
			dirty: true,
		}
	}

	fn open(uri: Url, backing: Backing, source: Source, mode: OpenMode) -> Result<Self> {
		let archive = open_archive(&uri, source)?;
		trace!(%uri, entries = archive.len(), "opened container");
		Ok(Self {
			uri,
			mode,
			backing,
			archive: Some(archive),
			staged: BTreeMap::new(),
			removed: BTreeSet::new(),
			compression: Compression::default(),
			dirty: false,
		})
	}

	/// Identity of this container.
	pub fn uri(&self) -> &Url {
		&self.uri
	}

	pub fn mode(&self) -> OpenMode {
		self.mode
	}

	pub fn is_writable(&self) -> bool {
		self.mode.is_writable()
	}

	pub fn compression(&self) -> Compression {
		self.compression
	}

	pub fn set_compression(&mut self, compression: Compression) {
		self.compression = compression;
	}

	/// Switches between read-only and writable access over the same bytes.
	///
	/// Pending writes are committed before a writable container is reopened.
	/// The container keeps its [`uri`](Self::uri).
	pub fn reopen(&mut self, writable: bool) -> Result<()> {
		if writable && matches!(self.backing, Backing::Static) {
			return Err(ContainerError::ReadOnly(self.uri.clone()));
		}
		if self.mode.is_writable() && self.dirty {
			self.commit()?;
		}
		if let Backing::File(path) = &self.backing {
			self.archive = None;
			let file = File::open(path).map_err(|e| ContainerError::io(&self.uri, e))?;
			self.archive = Some(open_archive(&self.uri, Source::File(file))?);
		}
		self.mode = if writable { OpenMode::Update } else { OpenMode::Read };
		trace!(uri = %self.uri, mode = ?self.mode, "reopened container");
		Ok(())
	}

	/// Returns a writable stream for `name`, replacing any existing entry.
	pub fn create_data_stream(&mut self, name: &str) -> Result<DataStream<'_>> {
		self.ensure_writable()?;
		self.drop_entry(name);
		self.stage_bytes(name.to_owned(), Vec::new());
		Ok(DataStream::new(self, name.to_owned()))
	}

	/// Writes `bytes` as entry `name`, replacing any existing entry.
	pub fn write_data(&mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Result<()> {
		self.ensure_writable()?;
		self.drop_entry(name);
		self.stage_bytes(name.to_owned(), bytes.into());
		Ok(())
	}

	/// Stages the local file at `local_path` as entry `name`.
	///
	/// The file is streamed into the archive at commit time rather than read
	/// into memory now, so it must still exist when the container commits.
	pub fn import_data_stream(&mut self, name: &str, local_path: impl AsRef<Path>) -> Result<()> {
		self.ensure_writable()?;
		let path = local_path.as_ref();
		let meta = fs::metadata(path).map_err(|e| ContainerError::local(path, e))?;
		if !meta.is_file() {
			return Err(ContainerError::local(
				path,
				io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
			));
		}
		self.drop_entry(name);
		self.staged.insert(name.to_owned(), Staged::Import(path.to_path_buf()));
		self.dirty = true;
		trace!(uri = %self.uri, name, path = %path.display(), "staged import");
		Ok(())
	}

	/// Removes entry `name`. Returns whether it existed.
	pub fn remove_entry(&mut self, name: &str) -> Result<bool> {
		self.ensure_writable()?;
		Ok(self.drop_entry(name))
	}

	pub fn has_entry(&self, name: &str) -> bool {
		self.staged.contains_key(name) || (!self.removed.contains(name) && self.archived(name))
	}

	/// Names of all visible entries, sorted.
	pub fn entry_names(&self) -> Vec<String> {
		let mut names: BTreeSet<String> = self.staged.keys().cloned().collect();
		if let Some(archive) = &self.archive {
			names.extend(
				archive
					.file_names()
					.filter(|name| !self.removed.contains(*name))
					.map(str::to_owned),
			);
		}
		names.into_iter().collect()
	}

	/// Reads entry `name` fully.
	pub fn read_data(&mut self, name: &str) -> Result<Vec<u8>> {
		self.with_entry(name, |reader| {
			let mut bytes = Vec::new();
			reader.read_to_end(&mut bytes)?;
			Ok(bytes)
		})
	}

	/// Reads entry `name` as UTF-8 text, discarding a leading byte-order mark.
	pub fn get_data(&mut self, name: &str) -> Result<String> {
		let bytes = self.read_data(name)?;
		let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
		String::from_utf8(body.to_vec()).map_err(|_| ContainerError::InvalidText {
			uri: self.uri.clone(),
			name: name.to_owned(),
		})
	}

	/// Streams entry `name` to the local file `dest`. Returns the bytes written.
	pub fn extract_data_stream(&mut self, name: &str, dest: impl AsRef<Path>) -> Result<u64> {
		let dest = dest.as_ref();
		if !self.has_entry(name) {
			return Err(ContainerError::EntryNotFound {
				uri: self.uri.clone(),
				name: name.to_owned(),
			});
		}
		if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| ContainerError::local(parent, e))?;
		}
		let mut out = File::create(dest).map_err(|e| ContainerError::local(dest, e))?;
		let written = self.with_entry(name, |reader| io::copy(reader, &mut out))?;
		debug!(uri = %self.uri, name, dest = %dest.display(), written, "extracted entry");
		Ok(written)
	}

	/// Copies entry `name` verbatim into `target` as `target_name`.
	pub fn copy_data_stream(&mut self, name: &str, target: &mut PortableContainer, target_name: &str) -> Result<()> {
		let bytes = self.read_data(name)?;
		target.write_data(target_name, bytes)
	}

	/// Rebuilds the archive with all staged changes applied.
	pub fn commit(&mut self) -> Result<()> {
		self.ensure_writable()?;
		if !self.dirty {
			return Ok(());
		}

		let target = match &self.backing {
			Backing::File(path) => Some(path.clone()),
			Backing::Memory => None,
			Backing::Static => return Err(ContainerError::ReadOnly(self.uri.clone())),
		};

		match target {
			Some(path) => {
				let dir = path
					.parent()
					.filter(|p| !p.as_os_str().is_empty())
					.unwrap_or_else(|| Path::new("."));
				let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ContainerError::local(dir, e))?;
				self.write_archive(temp.as_file_mut())?;
				// Release the old handle before the rename replaces the file.
				self.archive = None;
				temp.persist(&path).map_err(|e| ContainerError::local(&path, e.error))?;
				let file = File::open(&path).map_err(|e| ContainerError::io(&self.uri, e))?;
				self.archive = Some(open_archive(&self.uri, Source::File(file))?);
			}
			None => {
				let mut cursor = Cursor::new(Vec::new());
				self.write_archive(&mut cursor)?;
				self.archive = Some(open_archive(&self.uri, Source::Memory(cursor))?);
			}
		}

		self.staged.clear();
		self.removed.clear();
		self.dirty = false;
		if self.mode == OpenMode::Create {
			self.mode = OpenMode::Update;
		}
		debug!(uri = %self.uri, "committed container");
		Ok(())
	}

	/// Commits pending changes and returns the archive bytes.
	pub fn into_bytes(mut self) -> Result<Vec<u8>> {
		if self.mode.is_writable() {
			self.commit()?;
		}
		let uri = self.uri;
		match self.archive.map(ZipArchive::into_inner) {
			Some(Source::Memory(cursor)) => Ok(cursor.into_inner()),
			Some(Source::Static(cursor)) => Ok(cursor.into_inner().to_vec()),
			Some(Source::File(mut file)) => {
				let mut bytes = Vec::new();
				file.seek(SeekFrom::Start(0)).map_err(|e| ContainerError::io(&uri, e))?;
				file.read_to_end(&mut bytes).map_err(|e| ContainerError::io(&uri, e))?;
				Ok(bytes)
			}
			None => Ok(Vec::new()),
		}
	}

	pub(crate) fn stage_bytes(&mut self, name: String, bytes: Vec<u8>) {
		trace!(uri = %self.uri, name = %name, len = bytes.len(), "staged entry");
		self.staged.insert(name, Staged::Bytes(bytes));
		self.dirty = true;
	}

	fn ensure_writable(&self) -> Result<()> {
		if self.mode.is_writable() {
			Ok(())
		} else {
			Err(ContainerError::ReadOnly(self.uri.clone()))
		}
	}

	fn archived(&self, name: &str) -> bool {
		self.archive.as_ref().is_some_and(|a| a.index_for_name(name).is_some())
	}

	fn drop_entry(&mut self, name: &str) -> bool {
		let staged = self.staged.remove(name).is_some();
		let archived = !self.removed.contains(name) && self.archived(name);
		if archived {
			self.removed.insert(name.to_owned());
		}
		if staged || archived {
			self.dirty = true;
		}
		staged || archived
	}

	fn with_entry<T>(&mut self, name: &str, f: impl FnOnce(&mut dyn Read) -> io::Result<T>) -> Result<T> {
		let uri = &self.uri;
		if let Some(staged) = self.staged.get(name) {
			return match staged {
				Staged::Bytes(bytes) => f(&mut bytes.as_slice()).map_err(|e| ContainerError::io(uri, e)),
				Staged::Import(path) => {
					let mut file = File::open(path).map_err(|e| ContainerError::local(path, e))?;
					f(&mut file).map_err(|e| ContainerError::io(uri, e))
				}
			};
		}

		let not_found = || ContainerError::EntryNotFound {
			uri: uri.clone(),
			name: name.to_owned(),
		};
		if self.removed.contains(name) {
			return Err(not_found());
		}
		let archive = self.archive.as_mut().ok_or_else(not_found)?;
		let mut entry = archive.by_name(name).map_err(|e| ContainerError::entry(uri, name, e))?;
		f(&mut entry).map_err(|e| ContainerError::io(uri, e))
	}

	fn write_archive<W: Write + Seek>(&mut self, sink: W) -> Result<()> {
		let uri = &self.uri;
		let mut writer = ZipWriter::new(sink);
		let options = SimpleFileOptions::default().compression_method(self.compression.method());

		if let Some(archive) = self.archive.as_mut() {
			for index in 0..archive.len() {
				let entry = archive.by_index_raw(index).map_err(|e| ContainerError::open(uri, e))?;
				if self.staged.contains_key(entry.name()) || self.removed.contains(entry.name()) {
					trace!(%uri, name = entry.name(), "dropping replaced entry");
					continue;
				}
				writer.raw_copy_file(entry).map_err(|e| ContainerError::write(uri, e))?;
			}
		}

		for (name, staged) in &self.staged {
			writer
				.start_file(name.as_str(), options)
				.map_err(|e| ContainerError::write(uri, e))?;
			match staged {
				Staged::Bytes(bytes) => writer.write_all(bytes).map_err(|e| ContainerError::io(uri, e))?,
				Staged::Import(path) => {
					let mut file = File::open(path).map_err(|e| ContainerError::local(path, e))?;
					io::copy(&mut file, &mut writer).map_err(|e| ContainerError::io(uri, e))?;
				}
			}
		}

		writer.finish().map_err(|e| ContainerError::write(uri, e))?;
		Ok(())
	}
}

impl std::fmt::Debug for PortableContainer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PortableContainer")
			.field("uri", &self.uri.as_str())
			.field("mode", &self.mode)
			.field("staged", &self.staged.len())
			.field("removed", &self.removed.len())
			.finish()
	}
}

fn open_archive(uri: &Url, source: Source) -> Result<ZipArchive<Source>> {
	ZipArchive::new(source).map_err(|e| ContainerError::open(uri, e))
}
