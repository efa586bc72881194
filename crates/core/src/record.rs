// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable JSON records kept alongside stored packages.

use crate::id::PackageId;
use serde::{Deserialize, Serialize};

/// Info record stored under `info/<id>`.
///
/// Written by the engine when a build fails, or by the toolchain itself with
/// richer detail. Fields the engine does not know about are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoRecord {
    pub id: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_binary: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl InfoRecord {
    /// Minimal record marking a failed build of `id`.
    pub fn failure(id: &PackageId, filename_source: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            hash: id.to_string(),
            filename_source,
            filename_binary: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Original upload details for a stored source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub hash_source: String,
    pub filename_source: String,
}
