// SPDX-License-Identifier: GPL-3.0-only
//! Collision-free names for payload files in the addons directory.
//!
//! The game mounts content packages by file name, so payloads follow the
//! `<prefix><NN><suffix><ext>` convention (`pak01_dir.vpk`, `skin03.vpk`).
//! Installing a payload whose prefix and suffix already exist gets the next
//! free sequence number instead of overwriting the earlier install.

use regex::Regex;
use std::sync::LazyLock;

use crate::mod_installer::InstallError;

/// Largest sequence number a two-digit field can hold.
pub const MAX_VARIANT: u32 = 99;

static VARIANT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)(\d{1,2})(_[^.]+)?(\.[^.]+)$").expect("variant name pattern is valid")
});

/// A file name split along the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantName<'a> {
    pub prefix: &'a str,
    pub number: u32,
    pub suffix: &'a str,
    pub extension: &'a str,
}

impl<'a> VariantName<'a> {
    pub fn parse(name: &'a str) -> Option<Self> {
        let captures = VARIANT_NAME.captures(name)?;
        Some(Self {
            prefix: captures.get(1)?.as_str(),
            number: captures.get(2)?.as_str().parse().ok()?,
            suffix: captures.get(3).map_or("", |m| m.as_str()),
            extension: captures.get(4)?.as_str(),
        })
    }

    fn same_family(&self, other: &VariantName<'_>) -> bool {
        self.prefix == other.prefix && self.suffix == other.suffix
    }
}

/// Pick the destination name for `proposed` given the names already present.
///
/// The sequence number is one past the highest number already used by the
/// same prefix/suffix pair (or 1 when there is none); the number in `proposed`
/// itself is ignored. Names that don't follow the convention are returned
/// unchanged, and the caller may overwrite an existing file with that name.
pub fn resolve_destination_name<'e, I>(existing: I, proposed: &str) -> Result<String, InstallError>
where
    I: IntoIterator<Item = &'e str>,
{
    let Some(wanted) = VariantName::parse(proposed) else {
        return Ok(proposed.to_string());
    };

    let highest = existing
        .into_iter()
        .filter_map(VariantName::parse)
        .filter(|name| name.same_family(&wanted))
        .map(|name| name.number)
        .max();

    let next = highest.map_or(1, |n| n + 1);
    if next > MAX_VARIANT {
        return Err(InstallError::TooManyVariants {
            prefix: wanted.prefix.to_string(),
            suffix: wanted.suffix.to_string(),
        });
    }

    Ok(format!("{}{:02}{}{}", wanted.prefix, next, wanted.suffix, wanted.extension))
}
