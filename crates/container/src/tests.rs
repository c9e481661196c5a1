use std::io::Write;

use pretty_assertions::assert_eq;

use crate::{ContainerError, OpenMode, PortableContainer};

crate::embed_container!("wixir-container-tests", "hello.wixipl", include_bytes!("../tests/fixtures/hello.zip"));

fn committed(entries: &[(&str, &[u8])]) -> Vec<u8> {
	let mut container = PortableContainer::create().expect("create");
	for (name, bytes) in entries {
		container.write_data(name, bytes.to_vec()).expect("write");
	}
	container.into_bytes().expect("commit")
}

#[test]
fn test_create_write_and_read_back() {
	let bytes = committed(&[("a.txt", b"alpha"), ("dir/b.bin", &[0, 1, 2, 3])]);

	let uri = crate::Url::parse("memory:roundtrip").unwrap();
	let mut container = PortableContainer::read_bytes(uri, bytes).expect("read");
	assert_eq!(container.mode(), OpenMode::Read);
	assert_eq!(container.entry_names(), vec!["a.txt".to_owned(), "dir/b.bin".to_owned()]);
	assert_eq!(container.get_data("a.txt").unwrap(), "alpha");
	assert_eq!(container.read_data("dir/b.bin").unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_data_stream_overwrites_existing_entry() {
	let bytes = committed(&[("doc.json", b"old contents")]);
	let uri = crate::Url::parse("memory:overwrite").unwrap();
	let mut container = PortableContainer::create_from_bytes(uri, bytes).expect("open");
	assert_eq!(container.mode(), OpenMode::Update);

	{
		let mut stream = container.create_data_stream("doc.json").expect("stream");
		stream.write_all(b"new").unwrap();
	}
	assert_eq!(container.get_data("doc.json").unwrap(), "new");

	container.commit().expect("commit");
	assert_eq!(container.entry_names(), vec!["doc.json".to_owned()]);
	assert_eq!(container.get_data("doc.json").unwrap(), "new");
}

#[test]
fn test_empty_stream_still_replaces_entry() {
	let mut container = PortableContainer::create().unwrap();
	container.write_data("x", b"payload".to_vec()).unwrap();
	drop(container.create_data_stream("x").unwrap());
	assert_eq!(container.read_data("x").unwrap(), Vec::<u8>::new());
}

#[test]
fn test_get_data_strips_byte_order_mark() {
	let mut container = PortableContainer::create().unwrap();
	container.write_data("bom.json", b"\xEF\xBB\xBF{}".to_vec()).unwrap();
	assert_eq!(container.get_data("bom.json").unwrap(), "{}");
}

#[test]
fn test_get_data_rejects_invalid_utf8() {
	let mut container = PortableContainer::create().unwrap();
	container.write_data("bad", vec![0xFF, 0xFE, 0x00]).unwrap();
	assert!(matches!(container.get_data("bad"), Err(ContainerError::InvalidText { .. })));
}

#[test]
fn test_garbage_bytes_are_corrupt_not_io() {
	let uri = crate::Url::parse("memory:garbage").unwrap();
	let err = PortableContainer::read_bytes(uri, b"definitely not a zip archive".to_vec()).unwrap_err();
	assert!(matches!(err, ContainerError::CorruptFileFormat { .. }), "got {err:?}");
}

#[test]
fn test_missing_entry_is_not_found() {
	let bytes = committed(&[("present", b"1")]);
	let uri = crate::Url::parse("memory:missing").unwrap();
	let mut container = PortableContainer::read_bytes(uri, bytes).unwrap();
	let err = container.read_data("absent").unwrap_err();
	assert!(matches!(err, ContainerError::EntryNotFound { ref name, .. } if name == "absent"));
}

#[test]
fn test_read_only_container_rejects_writes() {
	let bytes = committed(&[("a", b"1")]);
	let uri = crate::Url::parse("memory:ro").unwrap();
	let mut container = PortableContainer::read_bytes(uri, bytes).unwrap();
	assert!(matches!(container.write_data("b", b"2".to_vec()), Err(ContainerError::ReadOnly(_))));
	assert!(matches!(container.create_data_stream("b"), Err(ContainerError::ReadOnly(_))));
	assert!(matches!(container.commit(), Err(ContainerError::ReadOnly(_))));
}

#[test]
fn test_remove_entry_hides_archived_entry() {
	let bytes = committed(&[("keep", b"1"), ("drop", b"2")]);
	let uri = crate::Url::parse("memory:remove").unwrap();
	let mut container = PortableContainer::create_from_bytes(uri, bytes).unwrap();

	assert!(container.remove_entry("drop").unwrap());
	assert!(!container.remove_entry("drop").unwrap());
	assert!(!container.has_entry("drop"));
	assert!(matches!(container.read_data("drop"), Err(ContainerError::EntryNotFound { .. })));

	let bytes = container.into_bytes().unwrap();
	let uri = crate::Url::parse("memory:remove").unwrap();
	let container = PortableContainer::read_bytes(uri, bytes).unwrap();
	assert_eq!(container.entry_names(), vec!["keep".to_owned()]);
}

#[test]
fn test_file_backed_commit_and_reopen() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nested").join("out.wixipl");

	let mut container = PortableContainer::create_file(&path).unwrap();
	container.write_data("first", b"1".to_vec()).unwrap();
	container.commit().unwrap();
	assert!(path.is_file());
	let uri = container.uri().clone();

	let mut reader = PortableContainer::read(&path).unwrap();
	assert_eq!(reader.uri(), &uri);
	assert!(!reader.is_writable());

	reader.reopen(true).unwrap();
	assert_eq!(reader.uri(), &uri);
	reader.write_data("second", b"2".to_vec()).unwrap();
	reader.reopen(false).unwrap();
	assert!(!reader.is_writable());
	assert_eq!(reader.entry_names(), vec!["first".to_owned(), "second".to_owned()]);
	assert_eq!(reader.get_data("first").unwrap(), "1");
}

#[test]
fn test_import_and_extract_local_files() {
	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join("payload.bin");
	std::fs::write(&source, b"imported bytes").unwrap();

	let mut container = PortableContainer::create().unwrap();
	container.import_data_stream("wix-ir/payload.bin", &source).unwrap();
	let bytes = container.into_bytes().unwrap();

	let uri = crate::Url::parse("memory:import").unwrap();
	let mut container = PortableContainer::read_bytes(uri, bytes).unwrap();
	let dest = dir.path().join("out").join("payload.bin");
	let written = container.extract_data_stream("wix-ir/payload.bin", &dest).unwrap();
	assert_eq!(written, 14);
	assert_eq!(std::fs::read(&dest).unwrap(), b"imported bytes");
}

#[test]
fn test_import_missing_file_fails_early() {
	let dir = tempfile::tempdir().unwrap();
	let mut container = PortableContainer::create().unwrap();
	let err = container.import_data_stream("x", dir.path().join("nope")).unwrap_err();
	assert!(matches!(err, ContainerError::LocalFile { .. }));
}

#[test]
fn test_copy_between_containers() {
	let bytes = committed(&[("wix-ir/a.txt", b"from source")]);
	let uri = crate::Url::parse("memory:src").unwrap();
	let mut source = PortableContainer::read_bytes(uri, bytes).unwrap();
	let mut target = PortableContainer::create().unwrap();

	source.copy_data_stream("wix-ir/a.txt", &mut target, "wix-ir/a.txt-1").unwrap();
	assert_eq!(target.read_data("wix-ir/a.txt-1").unwrap(), b"from source");
}

#[test]
fn test_embedded_container_resolves_by_uri() {
	let uri = crate::uri::embedded_uri("wixir-container-tests", "hello.wixipl").unwrap();
	assert_eq!(uri.as_str(), "embeddedresource:wixir-container-tests#hello.wixipl");

	let mut container = PortableContainer::read_uri(&uri).unwrap();
	assert_eq!(container.uri(), &uri);
	assert_eq!(container.get_data("hello.txt").unwrap(), "hello\n");
	assert!(matches!(container.reopen(true), Err(ContainerError::ReadOnly(_))));
}

#[test]
fn test_unknown_embedded_resource() {
	let err = PortableContainer::read_embedded("nobody", "nothing").unwrap_err();
	assert!(matches!(err, ContainerError::ResourceNotFound { .. }));
}

#[test]
fn test_unsupported_uri_scheme() {
	let uri = crate::Url::parse("https://example.com/lib.wixlib").unwrap();
	assert!(matches!(PortableContainer::read_uri(&uri), Err(ContainerError::UnsupportedUri(_))));
}
