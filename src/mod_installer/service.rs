// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::downloader::GameBananaClient;
use crate::gameinfo::patch_gameinfo_file;
use crate::ledger::{InstalledMod, Ledger};
use crate::mod_installer::{install_from_archive, DirLocks};

/// Catalog metadata recorded alongside an install
#[derive(Debug, Clone, PartialEq)]
pub struct ModDetails {
    pub id: i64,
    pub name: String,
    pub image_url: String,
}

pub struct ModInstallationService {
    ledger: Arc<dyn Ledger>,
    catalog: GameBananaClient,
    locks: DirLocks,
    game_dir: PathBuf,
    gameinfo_path: PathBuf,
    download_dir: PathBuf,
}

impl ModInstallationService {
    pub fn new(config: &Config, ledger: Arc<dyn Ledger>, catalog: GameBananaClient) -> Self {
        Self {
            ledger,
            catalog,
            locks: DirLocks::new(),
            game_dir: config.game_dir.clone(),
            gameinfo_path: config.gameinfo_path(),
            download_dir: config.download_dir(),
        }
    }

    pub fn catalog(&self) -> &GameBananaClient {
        &self.catalog
    }

    /// Install a local archive and record it in the ledger
    pub async fn install_archive(&self, archive: &Path, details: ModDetails) -> anyhow::Result<InstalledMod> {
        let _guard = self.locks.lock(&self.game_dir).await;

        let installed_path = match install_from_archive(archive, &self.game_dir).await {
            Ok(path) => path,
            Err(e) if e.is_warning() => {
                warn!(error = %e, mod_id = details.id, "Mod installed with warnings");
                let Some(path) = e.installed_path().map(Path::to_path_buf) else {
                    return Err(e.into());
                };
                path
            }
            Err(e) => return Err(e.into()),
        };

        let record = InstalledMod::new(details.id, details.name, details.image_url, installed_path.clone());
        if let Err(e) = self.ledger.append(record.clone(), &self.game_dir).await {
            // Clean up installed file on error
            if let Err(cleanup) = tokio::fs::remove_file(&installed_path).await {
                warn!(error = %cleanup, path = %installed_path.display(), "Failed to remove unrecorded payload");
            }
            return Err(anyhow::Error::new(e).context("Failed to record installed mod"));
        }

        info!(mod_id = record.id, name = %record.name, path = %installed_path.display(), "Mod installed successfully");
        Ok(record)
    }

    /// Download a mod from the catalog and install it
    pub async fn install_from_catalog(&self, mod_id: i64) -> anyhow::Result<InstalledMod> {
        info!(mod_id, "Installing mod from catalog");

        let (archive, profile) = self
            .catalog
            .download_mod(mod_id, &self.download_dir)
            .await
            .with_context(|| format!("Failed to download mod {}", mod_id))?;

        let details = ModDetails {
            id: mod_id,
            name: profile.name.clone(),
            image_url: profile.image_url().unwrap_or_default(),
        };

        let result = self.install_archive(&archive, details).await;
        if result.is_err() {
            // Clean up downloaded file
            match tokio::fs::remove_file(&archive).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(error = %e, path = %archive.display(), "Failed to clean up downloaded archive"),
            }
        }
        result
    }

    /// Remove every ledger record for `id` along with its payload file
    pub async fn uninstall(&self, id: i64) -> anyhow::Result<Vec<InstalledMod>> {
        let _guard = self.locks.lock(&self.game_dir).await;

        match self.ledger.remove(id, &self.game_dir).await {
            Ok(removed) => {
                info!(mod_id = id, removed = removed.len(), "Uninstalled mod");
                Ok(removed)
            }
            Err(e) if e.is_missing() => Ok(Vec::new()),
            Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to uninstall mod {}", id))),
        }
    }

    pub async fn installed_mods(&self) -> anyhow::Result<Vec<InstalledMod>> {
        match self.ledger.list(&self.game_dir).await {
            Ok(records) => Ok(records),
            Err(e) if e.is_missing() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Make the game mount the addons directory; returns whether gameinfo.gi changed
    pub async fn patch_gameinfo(&self) -> anyhow::Result<bool> {
        patch_gameinfo_file(&self.gameinfo_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{JsonLedger, LedgerError};
    use crate::mod_installer::{addons_dir, InstallError};
    use crate::test_helpers::{create_temp_dir, create_test_config, create_test_zip};
    use mockito::Matcher;

    fn create_service(config: &Config) -> ModInstallationService {
        let catalog = GameBananaClient::new(config.gamebanana_api_url.clone(), config.gamebanana_game_id).unwrap();
        ModInstallationService::new(config, Arc::new(JsonLedger::new()), catalog)
    }

    fn details(id: i64, name: &str) -> ModDetails {
        ModDetails {
            id,
            name: name.to_string(),
            image_url: format!("https://images.example.com/{}.jpg", id),
        }
    }

    #[tokio::test]
    async fn test_install_collision_scenario_records_ledger_entry() {
        let game_dir = create_temp_dir();
        let config = create_test_config(game_dir.path());
        let service = create_service(&config);
        let addons = config.addons_dir();
        std::fs::create_dir_all(&addons).unwrap();
        std::fs::write(addons.join("pak01_dir.vpk"), b"stock").unwrap();
        let downloads = create_temp_dir();
        let archive = create_test_zip(
            downloads.path(),
            "pak01_dir.zip",
            &[("pak01_dir.vpk", b"modded".as_slice())],
        );

        let record = service.install_archive(&archive, details(31337, "Modded Pak")).await.unwrap();

        assert_eq!(record.path, addons.join("pak02_dir.vpk"));
        assert!(!archive.exists());
        let listed = service.installed_mods().await.unwrap();
        assert_eq!(listed.last(), Some(&record));
        assert_eq!(listed.last().unwrap().name, "Modded Pak");
    }

    #[tokio::test]
    async fn test_installed_mods_without_ledger_is_empty() {
        let game_dir = create_temp_dir();
        let service = create_service(&create_test_config(game_dir.path()));

        assert!(service.installed_mods().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_failure_keeps_ledger_untouched() {
        let game_dir = create_temp_dir();
        let config = create_test_config(game_dir.path());
        let service = create_service(&config);
        let downloads = create_temp_dir();
        let archive = create_test_zip(downloads.path(), "empty.zip", &[("readme.md", b"nothing".as_slice())]);

        let err = service.install_archive(&archive, details(1, "Empty")).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<InstallError>(), Some(InstallError::PayloadNotFound { .. })));
        assert!(!config.ledger_path().exists());
    }

    #[tokio::test]
    async fn test_ledger_failure_removes_placed_payload() {
        let game_dir = create_temp_dir();
        let config = create_test_config(game_dir.path());
        let service = create_service(&config);
        std::fs::write(config.ledger_path(), "[ broken").unwrap();
        let downloads = create_temp_dir();
        let archive = create_test_zip(downloads.path(), "skin.zip", &[("skin01.vpk", b"skin".as_slice())]);

        let err = service.install_archive(&archive, details(2, "Skin")).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<LedgerError>(), Some(LedgerError::ParseFailed { .. })));
        assert!(!addons_dir(game_dir.path()).join("skin01.vpk").exists());
    }

    #[tokio::test]
    async fn test_concurrent_installs_get_distinct_names() {
        let game_dir = create_temp_dir();
        let config = create_test_config(game_dir.path());
        let service = Arc::new(create_service(&config));
        let downloads = create_temp_dir();

        let mut tasks = Vec::new();
        for n in 0..4 {
            let archive = create_test_zip(
                downloads.path(),
                &format!("pak_{}.zip", n),
                &[("pak01_dir.vpk", format!("payload {}", n).as_bytes())],
            );
            let service = Arc::clone(&service);
            tasks.push(tokio::spawn(async move {
                service.install_archive(&archive, details(n, "Pak")).await.unwrap()
            }));
        }

        let mut names = Vec::new();
        for task in tasks {
            let record = task.await.unwrap();
            names.push(record.path.file_name().unwrap().to_string_lossy().into_owned());
        }
        names.sort();

        assert_eq!(names, vec!["pak01_dir.vpk", "pak02_dir.vpk", "pak03_dir.vpk", "pak04_dir.vpk"]);
        assert_eq!(service.installed_mods().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_uninstall_removes_record_and_file() {
        let game_dir = create_temp_dir();
        let config = create_test_config(game_dir.path());
        let service = create_service(&config);
        let downloads = create_temp_dir();
        let archive = create_test_zip(downloads.path(), "hud.zip", &[("hud01.vpk", b"hud".as_slice())]);
        let record = service.install_archive(&archive, details(808, "HUD")).await.unwrap();

        let removed = service.uninstall(808).await.unwrap();

        assert_eq!(removed, vec![record.clone()]);
        assert!(!record.path.exists());
        assert!(service.installed_mods().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_uninstall_without_ledger() {
        let game_dir = create_temp_dir();
        let service = create_service(&create_test_config(game_dir.path()));

        assert!(service.uninstall(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_from_catalog() {
        let mut server = mockito::Server::new_async().await;
        let archive_bytes = {
            let staging = create_temp_dir();
            let path = create_test_zip(
                staging.path(),
                "mod.zip",
                &[("nested/citadel_skin01.vpk", b"catalog payload".as_slice())],
            );
            std::fs::read(path).unwrap()
        };
        let profile = serde_json::json!({
            "_sName": "Catalog Skin",
            "_aPreviewMedia": {"_aImages": [{"_sBaseUrl": "https://images.example.com/ss", "_sFile": "skin.webp"}]},
            "_aFiles": [{"_idRow": 5, "_sFile": "catalog_skin.zip", "_nFilesize": archive_bytes.len(), "_sDownloadUrl": format!("{}/dl/5", server.url())}]
        });
        let _profile_mock = server
            .mock("GET", "/Mod/4040")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(profile.to_string())
            .create_async()
            .await;
        let _file_mock = server
            .mock("GET", "/dl/5")
            .with_status(200)
            .with_body(archive_bytes)
            .create_async()
            .await;

        let game_dir = create_temp_dir();
        let mut config = create_test_config(game_dir.path());
        config.gamebanana_api_url = server.url();
        let service = create_service(&config);

        let record = service.install_from_catalog(4040).await.unwrap();

        assert_eq!(record.id, 4040);
        assert_eq!(record.name, "Catalog Skin");
        assert_eq!(record.image_url, "https://images.example.com/ss/skin.webp");
        assert_eq!(record.path, config.addons_dir().join("citadel_skin01.vpk"));
        assert_eq!(std::fs::read(&record.path).unwrap(), b"catalog payload");
        // The downloaded archive is consumed
        assert_eq!(std::fs::read_dir(config.download_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_install_from_catalog_cleans_up_failed_download() {
        let mut server = mockito::Server::new_async().await;
        let profile = serde_json::json!({
            "_sName": "Not An Archive",
            "_aFiles": [{"_idRow": 6, "_sFile": "mod.exe", "_sDownloadUrl": format!("{}/dl/6", server.url())}]
        });
        let _profile_mock = server
            .mock("GET", "/Mod/6")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(profile.to_string())
            .create_async()
            .await;
        let _file_mock = server.mock("GET", "/dl/6").with_status(200).with_body("MZ").create_async().await;

        let game_dir = create_temp_dir();
        let mut config = create_test_config(game_dir.path());
        config.gamebanana_api_url = server.url();
        let service = create_service(&config);

        let err = service.install_from_catalog(6).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<InstallError>(), Some(InstallError::UnsupportedFormat { .. })));
        assert_eq!(std::fs::read_dir(config.download_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_patch_gameinfo() {
        let game_dir = create_temp_dir();
        let config = create_test_config(game_dir.path());
        let service = create_service(&config);
        std::fs::create_dir_all(config.gameinfo_path().parent().unwrap()).unwrap();
        std::fs::write(config.gameinfo_path(), "FileSystem { SearchPaths { Game citadel } }").unwrap();

        assert!(service.patch_gameinfo().await.unwrap());
        assert!(std::fs::read_to_string(config.gameinfo_path()).unwrap().contains("citadel/addons"));
    }
}
