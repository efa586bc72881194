// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn setup() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    (dir, store)
}

fn stored(store: &Store, name: &str, bytes: &[u8]) -> PackageId {
    let incoming = store.receive(name, bytes).unwrap();
    store.accept(incoming).unwrap()
}

#[test]
fn receive_records_filename_and_hash() {
    let (_dir, store) = setup();
    let incoming = store.receive("dir/pkg_1.0.tar.gz", b"contents").unwrap();
    assert_eq!(incoming.id, PackageId::of_bytes(b"contents"));
    assert_eq!(incoming.filename, "pkg_1.0.tar.gz");
    assert_eq!(store.filename(&incoming.id).unwrap().as_deref(), Some("pkg_1.0.tar.gz"));
    assert!(!store.has_source(&incoming.id));
}

#[test]
fn accept_moves_upload_into_source() {
    let (_dir, store) = setup();
    let id = stored(&store, "pkg.tar.gz", b"contents");
    assert!(store.has_source(&id));
    assert_eq!(std::fs::read(store.source_file(&id).unwrap()).unwrap(), b"contents");
    assert_eq!(std::fs::read_dir(store.layout().incoming()).unwrap().count(), 0);
}

#[test]
fn discard_removes_scratch_file_only() {
    let (_dir, store) = setup();
    let incoming = store.receive("pkg.tar.gz", b"contents").unwrap();
    let id = store.discard(incoming);
    assert!(!store.has_source(&id));
    assert!(store.filename(&id).unwrap().is_some());
    assert_eq!(std::fs::read_dir(store.layout().incoming()).unwrap().count(), 0);
}

#[test]
fn absent_entries_read_as_none() {
    let (_dir, store) = setup();
    let id = PackageId::of_bytes(b"never");
    assert!(store.info(&id).unwrap().is_none());
    assert!(store.filename(&id).unwrap().is_none());
    assert!(store.source_info(&id).unwrap().is_none());
    assert!(store.log(&JobId::from(id.clone()), None).unwrap().is_none());
    assert!(store.source_file(&id).is_none());
    assert!(store.binary_file(&id).is_none());
    assert!(store.queue_log(None).unwrap().is_none());
}

#[test]
fn info_round_trips_with_unknown_fields() {
    let (_dir, store) = setup();
    let id = PackageId::of_bytes(b"pkg");
    let raw = format!(
        r#"{{"id":"{id}","hash":"{id}","filename_binary":"pkg_1.0.zip","r_version":"4.4.0"}}"#
    );
    std::fs::write(store.layout().info_path(&id), raw).unwrap();

    let info = store.info(&id).unwrap().unwrap();
    assert_eq!(info.filename_binary.as_deref(), Some("pkg_1.0.zip"));
    assert_eq!(info.extra.get("r_version").unwrap(), "4.4.0");

    store.write_info(&id, &info).unwrap();
    assert_eq!(store.info(&id).unwrap().unwrap(), info);
}

#[test]
fn malformed_info_is_an_error() {
    let (_dir, store) = setup();
    let id = PackageId::of_bytes(b"pkg");
    std::fs::write(store.layout().info_path(&id), "not json").unwrap();
    assert!(matches!(store.info(&id), Err(StoreError::MalformedInfo { .. })));
}

#[test]
fn source_info_reports_hash_and_name() {
    let (_dir, store) = setup();
    let id = stored(&store, "pkg_2.0.tar.gz", b"two");
    let info = store.source_info(&id).unwrap().unwrap();
    assert_eq!(info.hash_source, id.to_string());
    assert_eq!(info.filename_source, "pkg_2.0.tar.gz");
}

#[yare::parameterized(
    whole       = { None,     "a\nb\nc\n" },
    last_two    = { Some(2),  "b\nc\n" },
    more_than   = { Some(10), "a\nb\nc\n" },
    zero        = { Some(0),  "" },
)]
fn log_tail(n: Option<usize>, expected: &str) {
    let (_dir, store) = setup();
    let job = JobId::from(PackageId::of_bytes(b"pkg"));
    std::fs::write(store.layout().log_path(&job), "a\nb\nc\n").unwrap();
    assert_eq!(store.log(&job, n).unwrap().unwrap(), expected);
}

#[test]
fn log_tail_keeps_unterminated_last_line() {
    assert_eq!(tail_lines("a\nb\nc", Some(2)), "b\nc");
}

#[test]
fn purge_clears_info_and_log() {
    let (_dir, store) = setup();
    let id = stored(&store, "pkg.tar.gz", b"pkg");
    let job = JobId::from(id.clone());
    store.write_info(&id, &InfoRecord::failure(&id, None)).unwrap();
    std::fs::write(store.layout().log_path(&job), "old log").unwrap();

    store.purge(&id).unwrap();
    assert!(!store.has_info(&id));
    assert!(store.log(&job, None).unwrap().is_none());
    assert!(store.has_source(&id));
    // purging again is a no-op
    store.purge(&id).unwrap();
}

#[test]
fn list_sources_by_id_and_by_name() {
    let (_dir, store) = setup();
    let a = stored(&store, "a_1.0.tar.gz", b"a");
    let b = stored(&store, "b_1.0.tar.gz", b"b");

    let mut ids = vec![a.to_string(), b.to_string()];
    ids.sort();
    assert_eq!(store.list(PackageKind::Source, false).unwrap(), ids);

    let mut names = store.list(PackageKind::Source, true).unwrap();
    names.sort();
    assert_eq!(names, vec!["a_1.0.tar.gz", "b_1.0.tar.gz"]);
}

#[test]
fn list_binaries_translates_through_info() {
    let (_dir, store) = setup();
    let id = stored(&store, "a_1.0.tar.gz", b"a");
    std::fs::write(store.layout().binary_path(&id), b"bin").unwrap();

    assert!(matches!(
        store.list(PackageKind::Binary, true),
        Err(StoreError::MissingBinaryName(_))
    ));

    let mut info = InfoRecord::failure(&id, None);
    info.filename_binary = Some("a_1.0.zip".to_string());
    store.write_info(&id, &info).unwrap();
    assert_eq!(store.list(PackageKind::Binary, true).unwrap(), vec!["a_1.0.zip"]);
}

#[test]
fn list_library_ignores_translate() {
    let (_dir, store) = setup();
    std::fs::create_dir(store.layout().lib().join("Rcpp")).unwrap();
    assert_eq!(store.list(PackageKind::Library, true).unwrap(), vec!["Rcpp"]);
}

#[test]
fn artifact_file_never_serves_library() {
    let (_dir, store) = setup();
    let id = stored(&store, "a.tar.gz", b"a");
    assert!(store.artifact_file(&id, PackageKind::Source).is_some());
    assert!(store.artifact_file(&id, PackageKind::Binary).is_none());
    assert!(store.artifact_file(&id, PackageKind::Library).is_none());
}

#[test]
fn reset_empties_every_directory() {
    let (_dir, store) = setup();
    let id = stored(&store, "a.tar.gz", b"a");
    std::fs::write(store.layout().binary_path(&id), b"bin").unwrap();
    std::fs::write(store.layout().queue_log_path(), "line\n").unwrap();
    std::fs::create_dir(store.layout().lib().join("Rcpp")).unwrap();

    store.reset().unwrap();

    for dir in store.layout().managed_dirs() {
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0, "{} not empty", dir.display());
    }
}
