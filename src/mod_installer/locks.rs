// SPDX-License-Identifier: GPL-3.0-only
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

use crate::utils::normalize_path;

/// One async mutex per target directory.
///
/// Installs and ledger mutations for the same directory hold its guard so the
/// existing-name scan and the ledger read-modify-write never interleave.
/// Different directories proceed independently.
#[derive(Default)]
pub struct DirLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl DirLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, dir: &Path) -> OwnedMutexGuard<()> {
        let key = normalize_path(dir);
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(locks.entry(key).or_default())
        };
        lock.lock_owned().await
    }
}
