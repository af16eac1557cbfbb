// SPDX-License-Identifier: GPL-3.0-only
pub mod client;
pub mod gamebanana;
pub mod models;

pub use client::HttpClient;
pub use gamebanana::GameBananaClient;
pub use models::{CatalogMod, ModProfile};
