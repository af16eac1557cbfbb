// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipArchive;

use crate::extractor::entry::{create_entry_dir, entry_destination, write_entry_file};
use crate::extractor::traits::Extractor;
use crate::mod_installer::InstallError;

pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(archive_path: &Path, dest: &Path) -> Result<(), InstallError> {
        let file = File::open(archive_path)
            .map_err(|e| InstallError::extraction(archive_path, e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| InstallError::extraction(archive_path, e.into()))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| InstallError::extraction(archive_path, e.into()))?;

            let name = entry.name().to_string();
            let Some(outpath) = entry_destination(dest, &name) else {
                continue;
            };

            if entry.is_dir() {
                create_entry_dir(&outpath)?;
            } else {
                write_entry_file(&outpath, &mut entry)?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Extractor for ZipExtractor {
    async fn extract(&self, archive_path: PathBuf, dest: PathBuf) -> Result<(), InstallError> {
        info!(archive = %archive_path.display(), dest = %dest.display(), "Extracting ZIP archive");

        let (archive, target) = (archive_path.clone(), dest.clone());
        tokio::task::spawn_blocking(move || Self::extract_blocking(&archive, &target))
            .await
            .map_err(|e| InstallError::extraction(&archive_path, std::io::Error::other(e)))??;

        info!(archive = %archive_path.display(), dest = %dest.display(), "ZIP extraction completed");
        Ok(())
    }
}

impl Default for ZipExtractor {
    fn default() -> Self {
        Self::new()
    }
}
