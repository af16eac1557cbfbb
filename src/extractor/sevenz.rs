// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use sevenz_rust2::Password;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::extractor::entry::{create_entry_dir, decoder_error, entry_destination, write_entry_file};
use crate::extractor::traits::Extractor;
use crate::mod_installer::InstallError;

pub struct SevenZipExtractor;

impl SevenZipExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(archive_path: &Path, dest: &Path) -> Result<(), InstallError> {
        let file = File::open(archive_path).map_err(|e| InstallError::extraction(archive_path, e))?;

        // The decoder drives iteration, so write failures are parked here and
        // the callback aborts with a placeholder error.
        let mut write_failure: Option<InstallError> = None;

        let decoded = sevenz_rust2::decompress_with_extract_fn_and_password(
            file,
            dest,
            Password::empty(),
            |entry, reader, _| {
                let Some(outpath) = entry_destination(dest, entry.name()) else {
                    // Entries of a solid block share one stream; drain the skipped one.
                    io::copy(reader, &mut io::sink())?;
                    return Ok(true);
                };

                let written = if entry.is_directory() {
                    create_entry_dir(&outpath)
                } else {
                    write_entry_file(&outpath, reader).map(|_| ())
                };

                match written {
                    Ok(()) => Ok(true),
                    Err(e) => {
                        write_failure = Some(e);
                        Err(sevenz_rust2::Error::Other("extraction aborted".into()))
                    }
                }
            },
        );

        match (write_failure, decoded) {
            (Some(e), _) => Err(e),
            (None, Err(e)) => Err(InstallError::extraction(archive_path, decoder_error(e))),
            (None, Ok(())) => Ok(()),
        }
    }
}

#[async_trait]
impl Extractor for SevenZipExtractor {
    async fn extract(&self, archive_path: PathBuf, dest: PathBuf) -> Result<(), InstallError> {
        info!(archive = %archive_path.display(), dest = %dest.display(), "Extracting 7z archive");

        let (archive, target) = (archive_path.clone(), dest.clone());
        tokio::task::spawn_blocking(move || Self::extract_blocking(&archive, &target))
            .await
            .map_err(|e| InstallError::extraction(&archive_path, std::io::Error::other(e)))??;

        info!(archive = %archive_path.display(), dest = %dest.display(), "7z extraction completed");
        Ok(())
    }
}

impl Default for SevenZipExtractor {
    fn default() -> Self {
        Self::new()
    }
}
