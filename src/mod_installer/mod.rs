// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod locator;
pub mod locks;
pub mod naming;
pub mod pipeline;
pub mod scratch;
pub mod service;

pub use error::InstallError;
pub use locks::DirLocks;
pub use pipeline::{addons_dir, install_from_archive};
pub use service::{ModDetails, ModInstallationService};
