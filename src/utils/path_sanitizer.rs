// SPDX-License-Identifier: GPL-3.0-only
use std::path::{Component, Path, PathBuf};

/// Resolve an archive entry name against an extraction root.
///
/// Entry names come straight from the archive and are untrusted. Returns `None`
/// for names that are absolute, carry a drive/UNC prefix, or climb above the
/// root through `..` components. Both `/` and `\` are accepted as separators
/// because RAR and 7z archives built on Windows use the latter.
pub fn resolve_entry_path(root: &Path, entry_name: &str) -> Option<PathBuf> {
    let unified = entry_name.replace('\\', "/");
    let mut relative = PathBuf::new();

    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        return None;
    }

    Some(root.join(relative))
}

/// Normalize a path lexically for comparison
///
/// Removes `.` components and folds `..` into its parent without touching the
/// filesystem, so it works for paths that no longer exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}

/// Whether `path` lies inside `base` after lexical normalization of both.
pub fn is_within_base(path: &Path, base: &Path) -> bool {
    let path = normalize_path(path);
    let base = normalize_path(base);
    path != base && path.starts_with(&base)
}
