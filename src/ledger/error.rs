// SPDX-License-Identifier: GPL-3.0-only
use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("Failed to read ledger '{}': {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("Failed to parse ledger '{}': {source}", path.display())]
    ParseFailed { path: PathBuf, source: serde_json::Error },

    #[error("Failed to write ledger '{}': {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
}

impl LedgerError {
    /// The ledger file has not been written yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::ReadFailed { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
