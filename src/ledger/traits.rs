// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::Path;

use crate::ledger::{InstalledMod, LedgerError};

/// Persistent record of installed payloads, one ledger per target directory.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append a record; a ledger that does not exist yet starts out empty
    async fn append(&self, record: InstalledMod, dir: &Path) -> Result<(), LedgerError>;

    /// Drop every record with `id`, delete their payload files and return them
    async fn remove(&self, id: i64, dir: &Path) -> Result<Vec<InstalledMod>, LedgerError>;

    /// All records in insertion order
    async fn list(&self, dir: &Path) -> Result<Vec<InstalledMod>, LedgerError>;
}
