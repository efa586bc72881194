// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use tempfile::TempDir;

fn ids() -> (PackageId, PackageId, PackageId) {
    (PackageId::of_bytes(b"a"), PackageId::of_bytes(b"b"), PackageId::of_bytes(b"c"))
}

fn marker(id: &PackageId) -> String {
    format!("{}{}\n", BATCH_MARKER, id)
}

fn text(section: &[u8]) -> &str {
    std::str::from_utf8(section).unwrap()
}

#[test]
fn splits_at_markers() {
    let (a, b, _) = ids();
    let log = format!("{}building a\n{}building b\n", marker(&a), marker(&b));

    let sections = split_log(log.as_bytes(), &[a.clone(), b.clone()]);

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].0, a);
    assert_eq!(text(&sections[0].1), format!("{}building a\n", marker(&a)));
    assert_eq!(sections[1].0, b);
    assert_eq!(text(&sections[1].1), format!("{}building b\n", marker(&b)));
}

#[test]
fn preamble_goes_to_first_member() {
    let (a, b, _) = ids();
    let log = format!("loading toolchain\n{}building b\n", marker(&b));

    let sections = split_log(log.as_bytes(), &[a.clone(), b.clone()]);

    assert_eq!(sections[0].0, a);
    assert_eq!(text(&sections[0].1), "loading toolchain\n");
    assert_eq!(sections[1].0, b);
}

#[test]
fn log_without_markers_belongs_to_first_member() {
    let (a, b, _) = ids();
    let sections = split_log(b"error: no toolchain\n", &[a.clone(), b]);
    assert_eq!(sections, vec![(a, b"error: no toolchain\n".to_vec())]);
}

#[test]
fn marker_for_non_member_is_text() {
    let (a, b, c) = ids();
    let log = format!("{}x\n{}y\n", marker(&a), marker(&c));

    let sections = split_log(log.as_bytes(), &[a.clone(), b]);

    assert_eq!(sections.len(), 1);
    assert_eq!(text(&sections[0].1), log);
}

#[test]
fn repeated_marker_appends_to_first_section() {
    let (a, b, _) = ids();
    let log = format!("{}one\n{}two\n{}three\n", marker(&a), marker(&b), marker(&a));

    let sections = split_log(log.as_bytes(), &[a.clone(), b.clone()]);

    assert_eq!(sections.len(), 2);
    assert_eq!(text(&sections[0].1), format!("{}one\n{}three\n", marker(&a), marker(&a)));
    assert_eq!(text(&sections[1].1), format!("{}two\n", marker(&b)));
}

#[test]
fn marker_tolerates_crlf_and_trailing_space() {
    let (a, b, _) = ids();
    let log = format!("{}{} \r\nbuilding b\r\n", BATCH_MARKER, b);
    let sections = split_log(log.as_bytes(), &[a, b.clone()]);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].0, b);
}

#[test]
fn marker_must_start_the_line() {
    let (a, b, _) = ids();
    let log = format!("echo {}", marker(&b));
    let sections = split_log(log.as_bytes(), &[a.clone(), b]);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].0, a);
}

#[test]
fn empty_log_has_no_sections() {
    let (a, _, _) = ids();
    assert!(split_log(b"", &[a]).is_empty());
    assert!(split_log(b"text\n", &[]).is_empty());
}

#[test]
fn write_split_logs_creates_member_files() {
    let dir = TempDir::new().unwrap();
    let (a, b, c) = ids();
    let combined = dir.path().join("batch");
    std::fs::write(&combined, format!("{}ok a\n{}ok b\n", marker(&a), marker(&b))).unwrap();

    let written = write_split_logs(&combined, dir.path(), &[a.clone(), b.clone(), c.clone()]).unwrap();

    assert_eq!(written, vec![a.clone(), b.clone()]);
    assert!(std::fs::read_to_string(dir.path().join(a.as_str())).unwrap().ends_with("ok a\n"));
    assert!(std::fs::read_to_string(dir.path().join(b.as_str())).unwrap().ends_with("ok b\n"));
    assert!(!dir.path().join(c.as_str()).exists());
}

#[test]
fn write_split_logs_missing_combined_log_is_error() {
    let dir = TempDir::new().unwrap();
    let (a, _, _) = ids();
    assert!(write_split_logs(&dir.path().join("missing"), dir.path(), &[a]).is_err());
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(marker(&PackageId::of_bytes(b"a"))),
        Just(marker(&PackageId::of_bytes(b"b"))),
        Just(marker(&PackageId::of_bytes(b"c"))),
        "[a-z *:]{0,20}\n",
        "[a-z]{0,5}",
    ]
}

proptest! {
    #[test]
    fn sections_reassemble_to_the_log(lines in prop::collection::vec(line_strategy(), 0..20)) {
        let (a, b, _) = ids();
        let log = lines.concat();
        let sections = split_log(log.as_bytes(), &[a.clone(), b.clone()]);

        // Sections are contiguous slices in order unless a marker reopens
        // an earlier section.
        let repeated = [&a, &b].iter().any(|id| log.matches(&marker(id)).count() > 1);
        let reopens_preamble = !log.starts_with(&marker(&a))
            && !log.starts_with(&marker(&b))
            && log.contains(&marker(&a));
        if !repeated && !reopens_preamble {
            let joined: Vec<u8> = sections.iter().flat_map(|(_, s)| s.iter().copied()).collect();
            prop_assert_eq!(joined, log.as_bytes().to_vec());
        }

        let total: usize = sections.iter().map(|(_, s)| s.len()).sum();
        prop_assert_eq!(total, log.len());
        for (id, _) in &sections {
            prop_assert!(*id == a || *id == b);
        }
    }
}
