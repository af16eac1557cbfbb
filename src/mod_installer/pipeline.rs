// SPDX-License-Identifier: GPL-3.0-only
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::extractor::extract_archive;
use crate::mod_installer::locator::find_payload;
use crate::mod_installer::naming::resolve_destination_name;
use crate::mod_installer::scratch::ScratchDir;
use crate::mod_installer::InstallError;

/// Location of the content directory the game loads addons from.
pub fn addons_dir(target_root: &Path) -> PathBuf {
    target_root.join("game").join("citadel").join("addons")
}

/// Install the payload of one archive into `target_root`'s addons directory.
///
/// Extracts into a scratch directory, picks the `.vpk` payload, gives it a
/// collision-free name, copies it into place and deletes the archive. Returns
/// the final payload path.
///
/// No step is retried. If the archive cannot be deleted after the payload is in
/// place the error is [`InstallError::ArchiveRemovalFailed`], which still carries
/// the installed path. Concurrent calls for the same `target_root` must be
/// serialized by the caller.
pub async fn install_from_archive(archive_path: &Path, target_root: &Path) -> Result<PathBuf, InstallError> {
    info!(archive = %archive_path.display(), root = %target_root.display(), "Installing mod archive");

    let scratch = ScratchDir::create()?;
    extract_archive(archive_path, scratch.path()).await?;

    let payload = locate_payload(scratch.path()).await.map_err(|e| match e {
        InstallError::PayloadNotFound { .. } => InstallError::PayloadNotFound {
            path: archive_path.to_path_buf(),
        },
        other => other,
    })?;

    let addons = addons_dir(target_root);
    tokio::fs::create_dir_all(&addons)
        .await
        .map_err(|source| InstallError::DirectoryCreateFailed { path: addons.clone(), source })?;

    let existing = list_file_names(&addons).await?;
    let proposed = payload
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let final_name = resolve_destination_name(existing.iter().map(String::as_str), &proposed)?;
    let destination = addons.join(&final_name);

    tokio::fs::copy(&payload, &destination)
        .await
        .map_err(|source| InstallError::CopyFailed {
            from: payload.clone(),
            to: destination.clone(),
            source,
        })?;
    info!(source = %payload.display(), dest = %destination.display(), "Copied payload into addons");

    drop(scratch);
    remove_archive(archive_path, &destination).await?;

    Ok(destination)
}

async fn locate_payload(dir: &Path) -> Result<PathBuf, InstallError> {
    let dir_owned = dir.to_path_buf();
    tokio::task::spawn_blocking(move || find_payload(&dir_owned))
        .await
        .map_err(|e| InstallError::DirectoryReadFailed {
            path: dir.to_path_buf(),
            source: io::Error::other(e),
        })?
}

async fn list_file_names(dir: &Path) -> Result<Vec<String>, InstallError> {
    let read_failed = |source: io::Error| InstallError::DirectoryReadFailed { path: dir.to_path_buf(), source };

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_failed)?;
    while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(names)
}

async fn remove_archive(archive_path: &Path, installed: &Path) -> Result<(), InstallError> {
    match tokio::fs::remove_file(archive_path).await {
        Ok(()) => {
            info!(archive = %archive_path.display(), "Deleted installed archive");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(archive = %archive_path.display(), "Archive already gone");
            Ok(())
        }
        Err(source) => Err(InstallError::ArchiveRemovalFailed {
            archive: archive_path.to_path_buf(),
            installed: installed.to_path_buf(),
            source,
        }),
    }
}
