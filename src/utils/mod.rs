// SPDX-License-Identifier: GPL-3.0-only
pub mod path_sanitizer;

pub use path_sanitizer::{is_within_base, normalize_path, resolve_entry_path};
