// SPDX-License-Identifier: GPL-3.0-only
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One installed payload, as persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledMod {
    /// Catalog identifier; not unique across the ledger
    pub id: i64,

    pub name: String,

    /// Preview image shown in the installed list
    #[serde(default)]
    pub image_url: String,

    /// Where the payload was placed
    pub path: PathBuf,

    #[serde(rename = "installed")]
    pub installed_at: DateTime<Utc>,
}

impl InstalledMod {
    pub fn new(id: i64, name: String, image_url: String, path: PathBuf) -> Self {
        Self {
            id,
            name,
            image_url,
            path,
            installed_at: Utc::now(),
        }
    }
}
