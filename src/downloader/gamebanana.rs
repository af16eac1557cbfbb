// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::downloader::models::RecordPage;
use crate::downloader::{CatalogMod, HttpClient, ModProfile};

const PAGE_SIZE: u32 = 10;

/// Client for the GameBanana v11 API, scoped to one game
#[derive(Clone)]
pub struct GameBananaClient {
    http: HttpClient,
    api_url: String,
    game_id: u64,
}

impl GameBananaClient {
    pub fn new(api_url: impl Into<String>, game_id: u64) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            game_id,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.api_url, path))
            .with_context(|| format!("Invalid catalog URL '{}'", self.api_url))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// One page of the game's mod index
    pub async fn fetch_mods(&self, page: u32) -> anyhow::Result<Vec<CatalogMod>> {
        let url = self.endpoint(
            "Mod/Index",
            &[
                ("_nPerpage", &PAGE_SIZE.to_string()),
                ("_nPage", &page.max(1).to_string()),
                ("_aFilters[Generic_Game]", &self.game_id.to_string()),
            ],
        )?;

        let page: RecordPage = self.http.get_json(url.as_str()).await?;
        Ok(page.records)
    }

    pub async fn search_mods(&self, query: &str) -> anyhow::Result<Vec<CatalogMod>> {
        let url = self.endpoint(
            "Util/Search/Results",
            &[("_sSearchString", query), ("_idGameRow", &self.game_id.to_string())],
        )?;

        let page: RecordPage = self.http.get_json(url.as_str()).await?;
        Ok(page.records)
    }

    pub async fn mod_profile(&self, mod_id: i64) -> anyhow::Result<ModProfile> {
        let url = self.endpoint(
            &format!("Mod/{}", mod_id),
            &[("_csvProperties", "_sName,_aPreviewMedia,_aFiles")],
        )?;

        let mut profile: ModProfile = self
            .http
            .get_json(url.as_str())
            .await
            .with_context(|| format!("Failed to fetch mod {}", mod_id))?;
        profile.id = mod_id;
        Ok(profile)
    }

    /// Download the first file of a mod into `dir` as `<uuid>-<file name>`
    pub async fn download_mod(&self, mod_id: i64, dir: &Path) -> anyhow::Result<(PathBuf, ModProfile)> {
        let profile = self.mod_profile(mod_id).await?;
        let file = profile
            .files
            .first()
            .ok_or_else(|| anyhow::anyhow!("Mod {} has no downloadable files", mod_id))?;

        let download_url = Url::parse(&file.download_url)
            .with_context(|| format!("Invalid download URL '{}'", file.download_url))?;
        if !matches!(download_url.scheme(), "http" | "https") {
            anyhow::bail!("Refusing to download from '{}' scheme", download_url.scheme());
        }

        let file_name = Path::new(&file.file_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Mod {} file has no usable name", mod_id))?;

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create download directory '{}'", dir.display()))?;
        let output_path = dir.join(format!("{}-{}", Uuid::new_v4(), file_name));

        info!(
            mod_id,
            url = %download_url,
            path = %output_path.display(),
            expected_bytes = file.file_size,
            "Downloading mod archive"
        );
        let bytes = self.http.download(download_url.as_str(), &output_path).await?;
        if file.file_size > 0 && bytes != file.file_size {
            warn!(mod_id, expected = file.file_size, actual = bytes, "Downloaded size differs from catalog size");
        }

        Ok((output_path, profile))
    }
}
