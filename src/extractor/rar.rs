// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use unrar::Archive;

use crate::extractor::entry::{create_entry_dir, decoder_error, entry_destination};
use crate::extractor::traits::Extractor;
use crate::mod_installer::InstallError;

/// RAR4/RAR5 extraction through the bundled unrar library.
pub struct RarExtractor;

impl RarExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(archive_path: &Path, dest: &Path) -> Result<(), InstallError> {
        let mut archive = Archive::new(archive_path)
            .open_for_processing()
            .map_err(|e| InstallError::extraction(archive_path, decoder_error(e)))?;

        while let Some(header) = archive
            .read_header()
            .map_err(|e| InstallError::extraction(archive_path, decoder_error(e)))?
        {
            let name = header.entry().filename.to_string_lossy().into_owned();
            let is_dir = header.entry().is_directory();

            archive = match entry_destination(dest, &name) {
                Some(outpath) if is_dir => {
                    create_entry_dir(&outpath)?;
                    header
                        .skip()
                        .map_err(|e| InstallError::extraction(archive_path, decoder_error(e)))?
                }
                Some(outpath) => {
                    if let Some(parent) = outpath.parent() {
                        create_entry_dir(parent)?;
                    }
                    // unrar streams the entry straight into the target file
                    let next = header
                        .extract_to(&outpath)
                        .map_err(|e| InstallError::extraction(&outpath, decoder_error(e)))?;
                    debug!(path = %outpath.display(), "Extracted entry");
                    next
                }
                None => header
                    .skip()
                    .map_err(|e| InstallError::extraction(archive_path, decoder_error(e)))?,
            };
        }

        Ok(())
    }
}

#[async_trait]
impl Extractor for RarExtractor {
    async fn extract(&self, archive_path: PathBuf, dest: PathBuf) -> Result<(), InstallError> {
        info!(archive = %archive_path.display(), dest = %dest.display(), "Extracting RAR archive");

        let (archive, target) = (archive_path.clone(), dest.clone());
        tokio::task::spawn_blocking(move || Self::extract_blocking(&archive, &target))
            .await
            .map_err(|e| InstallError::extraction(&archive_path, std::io::Error::other(e)))??;

        info!(archive = %archive_path.display(), dest = %dest.display(), "RAR extraction completed");
        Ok(())
    }
}

impl Default for RarExtractor {
    fn default() -> Self {
        Self::new()
    }
}
