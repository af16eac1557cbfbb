// SPDX-License-Identifier: GPL-3.0-only
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::mod_installer::InstallError;

const SCRATCH_PREFIX: &str = "mod_extract_";

/// Process-private extraction directory, removed exactly once when dropped.
///
/// Removal happens on every exit path of the owning scope, early `?` returns
/// and unwinding included. Removal failures are logged, never returned, so they
/// cannot mask the error that ended the install.
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh scratch directory in the system temp location.
    pub fn create() -> Result<Self, InstallError> {
        Self::create_in(std::env::temp_dir())
    }

    pub fn create_in(parent: impl AsRef<Path>) -> Result<Self, InstallError> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)
            .map_err(|source| InstallError::DirectoryCreateFailed {
                path: parent.to_path_buf(),
                source,
            })?;

        debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        match dir.close() {
            Ok(()) => debug!(path = %self.path.display(), "Removed scratch directory"),
            Err(e) => warn!(error = %e, path = %self.path.display(), "Failed to remove scratch directory"),
        }
    }
}
