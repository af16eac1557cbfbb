// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod json;
pub mod models;
pub mod traits;

pub use error::LedgerError;
pub use json::JsonLedger;
pub use models::InstalledMod;
pub use traits::Ledger;
