// SPDX-License-Identifier: GPL-3.0-only
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::mod_installer::InstallError;

/// Extension of the game's content packages.
pub const PAYLOAD_EXTENSION: &str = "vpk";

/// Whether a file name carries the payload extension, ignoring case.
pub fn is_payload_name(name: &OsStr) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PAYLOAD_EXTENSION))
}

/// Find the payload file inside an unpacked tree.
///
/// Siblings are visited in file-name order and the walk is depth-first, so when
/// an archive ships several `.vpk` files the one with the smallest path
/// (compared component by component) wins on every platform. The walk stops at
/// the first match.
pub fn find_payload(dir: &Path) -> Result<PathBuf, InstallError> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| InstallError::DirectoryReadFailed {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;

        if entry.file_type().is_file() && is_payload_name(entry.file_name()) {
            debug!(path = %entry.path().display(), "Found payload file");
            return Ok(entry.into_path());
        }
    }

    Err(InstallError::PayloadNotFound { path: dir.to_path_buf() })
}
