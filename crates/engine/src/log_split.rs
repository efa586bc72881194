// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Splitting a combined batch log into per-package logs.
//!
//! The toolchain prints a marker line before building each member of a
//! batch:
//!
//! ```text
//! *** buildr: <package id>
//! ```
//!
//! Everything up to the next marker belongs to that package.

use std::path::Path;
use std::sync::LazyLock;

use br_core::PackageId;
use regex::bytes::Regex;

/// Prefix of the marker line that starts a package's section.
pub const BATCH_MARKER: &str = "*** buildr: ";

#[allow(clippy::expect_used)]
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*\* buildr:\s*([0-9a-f]{64})\s*$").expect("constant regex pattern is valid")
});

/// Split `log` into sections for `members`.
///
/// Output bytes before the first marker go to the first member. A marker
/// naming a package outside `members` is kept as ordinary text, and
/// repeated markers for the same package append to its first section.
/// Members without a section are absent from the result. Every byte of
/// `log` lands in exactly one section.
pub fn split_log(log: &[u8], members: &[PackageId]) -> Vec<(PackageId, Vec<u8>)> {
    let mut sections: Vec<(PackageId, Vec<u8>)> = Vec::new();
    let Some(first) = members.first() else {
        return sections;
    };
    let mut current = 0;

    for line in log.split_inclusive(|b| *b == b'\n') {
        if let Some(id) = marker_member(line, members) {
            current = match sections.iter().position(|(member, _)| *member == id) {
                Some(index) => index,
                None => {
                    sections.push((id, Vec::new()));
                    sections.len() - 1
                }
            };
        } else if sections.is_empty() {
            sections.push((first.clone(), Vec::new()));
        }
        sections[current].1.extend_from_slice(line);
    }
    sections
}

fn marker_member(line: &[u8], members: &[PackageId]) -> Option<PackageId> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let captures = MARKER_RE.captures(line)?;
    let id = std::str::from_utf8(captures.get(1)?.as_bytes()).ok()?;
    members.iter().find(|member| member.as_str() == id).cloned()
}

/// Split the combined log at `combined` and write each section to
/// `log_dir/<id>`. Returns the ids written.
pub fn write_split_logs(
    combined: &Path,
    log_dir: &Path,
    members: &[PackageId],
) -> std::io::Result<Vec<PackageId>> {
    let log = std::fs::read(combined)?;
    let mut written = Vec::new();
    for (id, section) in split_log(&log, members) {
        std::fs::write(log_dir.join(id.as_str()), section)?;
        written.push(id);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "log_split_tests.rs"]
mod tests;
