// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use br_core::SpecialJob;

fn layout() -> Layout {
    Layout::new("/srv/buildr")
}

#[yare::parameterized(
    source  = { PackageKind::Source,  "/srv/buildr/source" },
    binary  = { PackageKind::Binary,  "/srv/buildr/binary" },
    library = { PackageKind::Library, "/srv/buildr/lib" },
)]
fn kind_dirs(kind: PackageKind, expected: &str) {
    assert_eq!(layout().kind_dir(kind), PathBuf::from(expected));
}

#[test]
fn package_paths_are_keyed_by_id() {
    let id = PackageId::of_bytes(b"pkg");
    let l = layout();
    assert_eq!(l.source_path(&id), l.source().join(id.as_str()));
    assert_eq!(l.binary_path(&id), l.binary().join(id.as_str()));
    assert_eq!(l.info_path(&id), l.info().join(id.as_str()));
    assert_eq!(l.filename_path(&id), l.filename().join(id.as_str()));
    assert_eq!(l.log_path(&JobId::from(id.clone())), l.log().join(id.as_str()));
}

#[test]
fn special_job_logs_use_their_name() {
    let l = layout();
    assert_eq!(l.log_path(&JobId::from(SpecialJob::Upgrade)), l.log().join("upgrade"));
}

#[test]
fn batch_log_name_is_bounded() {
    let ids: Vec<PackageId> = (0..20u8).map(|i| PackageId::of_bytes(&[i])).collect();
    let job = JobId::batch(ids).unwrap();
    let path = layout().log_path(&job);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("batch-"));
    assert_eq!(name.len(), "batch-".len() + 64);
    assert_eq!(path, layout().log_path(&job));
}

#[test]
fn queue_log_lives_in_log_dir() {
    assert_eq!(layout().queue_log_path(), PathBuf::from("/srv/buildr/log/queue"));
}

#[test]
fn ensure_creates_every_directory() {
    let dir = tempfile::tempdir().unwrap();
    let l = Layout::new(dir.path());
    l.ensure().unwrap();
    for d in l.managed_dirs() {
        assert!(d.is_dir(), "{} should exist", d.display());
    }
    // idempotent
    l.ensure().unwrap();
}

#[yare::parameterized(
    plain       = { "pkg_1.0.tar.gz",        "pkg_1.0.tar.gz" },
    nested      = { "a/b/pkg_1.0.tar.gz",    "pkg_1.0.tar.gz" },
    windows     = { "C:\\tmp\\pkg.zip",      "pkg.zip" },
    spaces      = { "my pkg.tar.gz",         "my_pkg.tar.gz" },
    dotdot      = { "..",                    "upload" },
    hidden      = { ".hidden",               "hidden" },
    empty       = { "",                      "upload" },
)]
fn sanitize(input: &str, expected: &str) {
    assert_eq!(sanitize_filename(input), expected);
}
