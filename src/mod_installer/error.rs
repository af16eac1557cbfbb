// SPDX-License-Identifier: GPL-3.0-only
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum InstallError {
    #[error("Unsupported archive format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract '{}': {source}", path.display())]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("No .vpk file found in '{}'", path.display())]
    PayloadNotFound { path: PathBuf },

    #[error("All 99 name variants of '{prefix}NN{suffix}' are already taken")]
    TooManyVariants { prefix: String, suffix: String },

    #[error("Failed to create directory '{}': {source}", path.display())]
    DirectoryCreateFailed { path: PathBuf, source: io::Error },

    #[error("Failed to read directory '{}': {source}", path.display())]
    DirectoryReadFailed { path: PathBuf, source: io::Error },

    #[error("Failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    CopyFailed { from: PathBuf, to: PathBuf, source: io::Error },

    #[error("Mod installed to '{}' but archive '{}' could not be removed: {source}", installed.display(), archive.display())]
    ArchiveRemovalFailed { archive: PathBuf, installed: PathBuf, source: io::Error },
}

impl InstallError {
    pub(crate) fn extraction(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ExtractionFailed { path: path.into(), source }
    }

    /// Warning-class errors leave a completed install behind.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::ArchiveRemovalFailed { .. })
    }

    /// Where the payload ended up, if the install got that far.
    pub fn installed_path(&self) -> Option<&Path> {
        match self {
            Self::ArchiveRemovalFailed { installed, .. } => Some(installed),
            _ => None,
        }
    }
}
