// SPDX-License-Identifier: GPL-3.0-only
mod entry;
pub mod rar;
pub mod sevenz;
pub mod traits;
pub mod zip;

use std::fmt;
use std::path::Path;
use tracing::debug;

pub use rar::RarExtractor;
pub use sevenz::SevenZipExtractor;
pub use traits::Extractor;
pub use self::zip::ZipExtractor;

use crate::mod_installer::InstallError;

/// Container formats accepted for mod archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Rar,
    SevenZip,
}

impl ArchiveFormat {
    /// Identify the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, InstallError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "zip" => Ok(Self::Zip),
            "rar" => Ok(Self::Rar),
            "7z" => Ok(Self::SevenZip),
            _ => Err(InstallError::UnsupportedFormat { extension }),
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => write!(f, "zip"),
            Self::Rar => write!(f, "rar"),
            Self::SevenZip => write!(f, "7z"),
        }
    }
}

/// Unpack `archive_path` into `dest`, picking the decoder by extension.
pub async fn extract_archive(archive_path: &Path, dest: &Path) -> Result<(), InstallError> {
    let format = ArchiveFormat::from_path(archive_path)?;
    debug!(archive = %archive_path.display(), format = %format, "Detected archive format");
    let (archive_path, dest) = (archive_path.to_path_buf(), dest.to_path_buf());

    match format {
        ArchiveFormat::Zip => ZipExtractor::new().extract(archive_path, dest).await,
        ArchiveFormat::Rar => RarExtractor::new().extract(archive_path, dest).await,
        ArchiveFormat::SevenZip => SevenZipExtractor::new().extract(archive_path, dest).await,
    }
}
