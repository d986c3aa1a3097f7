use super::*;
use crate::ports::search::Position;
use std::fs;
use tempfile::tempdir;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

#[test]
fn test_read_document_with_and_without_scheme() {
    let rt = create_runtime();
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, "hello world\n").unwrap();

    let docs = FsDocumentStore::new();
    let plain = rt
        .block_on(docs.read_document(path.to_str().unwrap()))
        .unwrap();
    assert_eq!(plain, "hello world\n");

    let uri = format!("file://{}", path.display());
    let schemed = rt.block_on(docs.read_document(&uri)).unwrap();
    assert_eq!(schemed, "hello world\n");
}

#[test]
fn test_apply_edit_replaces_range() {
    let rt = create_runtime();
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.py");
    fs::write(&path, "eval(data)\nprint(x)\n").unwrap();

    let docs = FsDocumentStore::new();
    rt.block_on(docs.apply_edit(path.to_str().unwrap(), range(0, 0, 0, 10), "safe(data)"))
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "safe(data)\nprint(x)\n");
}

#[test]
fn test_apply_edit_rejects_stale_range() {
    let rt = create_runtime();
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.py");
    fs::write(&path, "short\n").unwrap();

    let docs = FsDocumentStore::new();

    let err = rt
        .block_on(docs.apply_edit(path.to_str().unwrap(), range(9, 0, 9, 4), "x"))
        .unwrap_err();
    assert!(matches!(err, EditError::Conflict { .. }));

    let err = rt
        .block_on(docs.apply_edit(path.to_str().unwrap(), range(0, 0, 0, 99), "x"))
        .unwrap_err();
    assert!(matches!(err, EditError::Conflict { .. }));

    // Content untouched after rejected edits.
    assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
}

#[test]
fn test_apply_edit_temp_path_is_unique_per_file() {
    let rt = create_runtime();
    let dir = tempdir().unwrap();
    let py = dir.path().join("a.py");
    let rs = dir.path().join("a.rs");
    // Same stem, so an extension-replacing temp path would collide here.
    let stale = dir.path().join("a.searchlink.tmp");
    fs::write(&py, "eval(x)\n").unwrap();
    fs::write(&rs, "eval!(x)\n").unwrap();
    fs::write(&stale, "unrelated\n").unwrap();

    let docs = FsDocumentStore::new();
    rt.block_on(docs.apply_edit(py.to_str().unwrap(), range(0, 0, 0, 4), "safe"))
        .unwrap();
    rt.block_on(docs.apply_edit(rs.to_str().unwrap(), range(0, 0, 0, 4), "safe"))
        .unwrap();

    assert_eq!(fs::read_to_string(&py).unwrap(), "safe(x)\n");
    assert_eq!(fs::read_to_string(&rs).unwrap(), "safe!(x)\n");
    assert_eq!(fs::read_to_string(&stale).unwrap(), "unrelated\n");
}

#[test]
fn test_apply_edit_missing_file_is_io_error() {
    let rt = create_runtime();
    let docs = FsDocumentStore::new();
    let err = rt
        .block_on(docs.apply_edit("/nonexistent/doc.py", range(0, 0, 0, 1), "x"))
        .unwrap_err();
    assert!(matches!(err, EditError::Io(_)));
}
