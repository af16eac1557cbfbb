// SPDX-License-Identifier: GPL-3.0-only
//! Patches the game's `gameinfo.gi` so content under `citadel/addons` is
//! mounted ahead of the stock packages.

use anyhow::Context;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

static SEARCH_PATHS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)SearchPaths\s*\{.*?\}").expect("search paths pattern is valid"));

const PATCHED_BLOCK: &str = "SearchPaths
\t\t{
\t\t\tMod\t\t\tcitadel
\t\t\tWrite\t\tcitadel
\t\t\tGame\t\tcitadel/addons
\t\t\tGame\t\tcitadel
\t\t\tGame\t\tcore
\t\t}";

/// Replace the first `SearchPaths { ... }` block; `None` when there is none
pub fn patch_search_paths(text: &str) -> Option<String> {
    let block = SEARCH_PATHS_BLOCK.find(text)?;
    let mut patched = String::with_capacity(text.len() + PATCHED_BLOCK.len());
    patched.push_str(&text[..block.start()]);
    patched.push_str(PATCHED_BLOCK);
    patched.push_str(&text[block.end()..]);
    Some(patched)
}

/// Patch `path` in place, returning whether its contents changed
pub async fn patch_gameinfo_file(path: &Path) -> anyhow::Result<bool> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    let patched = patch_search_paths(&text)
        .ok_or_else(|| anyhow::anyhow!("No SearchPaths block in '{}'", path.display()))?;
    if patched == text {
        info!(path = %path.display(), "gameinfo.gi already mounts addons");
        return Ok(false);
    }

    tokio::fs::write(path, patched)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    info!(path = %path.display(), "Patched gameinfo.gi search paths");
    Ok(true)
}
