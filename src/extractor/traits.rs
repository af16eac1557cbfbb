// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::PathBuf;

use crate::mod_installer::InstallError;

/// Unpacks one container format into a directory.
///
/// Implementations process entries in archive order. A failure to open the
/// container, read an entry or write a file aborts the whole extraction with
/// [`InstallError::ExtractionFailed`] naming the failing path; partial output is
/// left behind for the caller's scratch directory to discard.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, archive_path: PathBuf, dest: PathBuf) -> Result<(), InstallError>;
}
