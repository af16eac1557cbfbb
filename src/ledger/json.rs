// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ledger::{InstalledMod, Ledger, LedgerError};
use crate::utils::is_within_base;

pub const LEDGER_FILE_NAME: &str = "installed_mods.json";

/// Ledger stored as a pretty-printed JSON array in `<dir>/installed_mods.json`.
///
/// Every mutation reads the whole file and rewrites it through a sibling
/// temporary file that is renamed into place.
#[derive(Debug, Default, Clone)]
pub struct JsonLedger;

impl JsonLedger {
    pub fn new() -> Self {
        Self
    }

    pub fn ledger_path(dir: &Path) -> PathBuf {
        dir.join(LEDGER_FILE_NAME)
    }

    async fn read(&self, path: &Path) -> Result<Vec<InstalledMod>, LedgerError> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| LedgerError::ReadFailed { path: path.to_path_buf(), source })?;

        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Option<Vec<InstalledMod>> = serde_json::from_slice(&contents)
            .map_err(|source| LedgerError::ParseFailed { path: path.to_path_buf(), source })?;

        Ok(records.unwrap_or_default())
    }

    async fn write(&self, path: &Path, records: &[InstalledMod]) -> Result<(), LedgerError> {
        let write_failed = |source: std::io::Error| LedgerError::WriteFailed { path: path.to_path_buf(), source };

        let contents = serde_json::to_vec_pretty(records).map_err(|e| write_failed(e.into()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| LEDGER_FILE_NAME.to_string());
        let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        tokio::fs::write(&temp_path, &contents).await.map_err(write_failed)?;
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_failed(e));
        }

        debug!(path = %path.display(), records = records.len(), "Wrote ledger");
        Ok(())
    }
}

#[async_trait]
impl Ledger for JsonLedger {
    async fn append(&self, record: InstalledMod, dir: &Path) -> Result<(), LedgerError> {
        let path = Self::ledger_path(dir);

        let mut records = match self.read(&path).await {
            Ok(records) => records,
            Err(e) if e.is_missing() => Vec::new(),
            Err(e) => return Err(e),
        };

        info!(mod_id = record.id, name = %record.name, path = %record.path.display(), "Recording installed mod");
        records.push(record);
        self.write(&path, &records).await
    }

    async fn remove(&self, id: i64, dir: &Path) -> Result<Vec<InstalledMod>, LedgerError> {
        let path = Self::ledger_path(dir);
        let records = self.read(&path).await?;

        let (removed, kept): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.id == id);

        for record in &removed {
            let payload = if record.path.is_absolute() {
                record.path.clone()
            } else {
                dir.join(&record.path)
            };

            if !is_within_base(&payload, dir) {
                warn!(mod_id = id, path = %payload.display(), "Refusing to delete file outside the game directory");
                continue;
            }

            match tokio::fs::remove_file(&payload).await {
                Ok(()) => info!(mod_id = id, path = %payload.display(), "Deleted mod payload"),
                Err(e) => warn!(error = %e, mod_id = id, path = %payload.display(), "Failed to delete mod payload"),
            }
        }

        self.write(&path, &kept).await?;
        Ok(removed)
    }

    async fn list(&self, dir: &Path) -> Result<Vec<InstalledMod>, LedgerError> {
        self.read(&Self::ledger_path(dir)).await
    }
}
