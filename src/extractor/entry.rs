// SPDX-License-Identifier: GPL-3.0-only
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::mod_installer::InstallError;
use crate::utils::resolve_entry_path;

/// Resolve an entry name inside `dest`, logging and skipping unsafe names.
pub(crate) fn entry_destination(dest: &Path, entry_name: &str) -> Option<PathBuf> {
    let resolved = resolve_entry_path(dest, entry_name);
    if resolved.is_none() {
        warn!(entry = %entry_name, "Skipping archive entry with unsafe path");
    }
    resolved
}

pub(crate) fn create_entry_dir(path: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(path).map_err(|e| InstallError::extraction(path, e))
}

/// Create ancestors, then stream `reader` into a freshly truncated file.
///
/// Repeated entries overwrite each other, so the last one in archive order wins.
pub(crate) fn write_entry_file(path: &Path, reader: &mut dyn Read) -> Result<u64, InstallError> {
    if let Some(parent) = path.parent() {
        create_entry_dir(parent)?;
    }

    let mut out = File::create(path).map_err(|e| InstallError::extraction(path, e))?;
    let written = io::copy(reader, &mut out).map_err(|e| InstallError::extraction(path, e))?;
    debug!(path = %path.display(), bytes = written, "Extracted entry");
    Ok(written)
}

/// Wrap a decoder library error as an I/O error.
pub(crate) fn decoder_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}
