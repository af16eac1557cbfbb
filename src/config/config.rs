// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::ledger::JsonLedger;
use crate::mod_installer::addons_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!("Unknown log format '{}' (expected 'pretty' or 'json')", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deadlock installation root (the directory holding `game/`)
    pub game_dir: PathBuf,

    /// Where catalog downloads are staged before installation
    pub download_dir: Option<PathBuf>,

    /// GameBanana API base URL
    pub gamebanana_api_url: String,

    /// GameBanana game identifier used to filter the catalog
    pub gamebanana_game_id: u64,

    /// Local API bind address (e.g., "127.0.0.1:8080")
    pub local_api_bind: SocketAddr,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("DEADLOCK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = Self::from_file(Path::new(&config_path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Parse a TOML file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Apply `DEADLOCK_*` overrides using `lookup` to resolve variable names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DEADLOCK_GAME_DIR") {
            self.game_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("DEADLOCK_DOWNLOAD_DIR") {
            self.download_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("DEADLOCK_GAMEBANANA_API_URL") {
            self.gamebanana_api_url = val;
        }
        if let Some(val) = lookup("DEADLOCK_GAMEBANANA_GAME_ID") {
            self.gamebanana_game_id = val
                .parse()
                .with_context(|| format!("Invalid DEADLOCK_GAMEBANANA_GAME_ID '{}'", val))?;
        }
        if let Some(val) = lookup("DEADLOCK_LOCAL_API_BIND") {
            self.local_api_bind = val
                .parse()
                .with_context(|| format!("Invalid DEADLOCK_LOCAL_API_BIND '{}'", val))?;
        }
        if let Some(val) = lookup("DEADLOCK_LOG_LEVEL") {
            self.log_level = val;
        }
        if let Some(val) = lookup("DEADLOCK_LOG_FORMAT") {
            self.log_format = val.parse()?;
        }

        Ok(())
    }

    /// Get the addons directory path
    pub fn addons_dir(&self) -> PathBuf {
        addons_dir(&self.game_dir)
    }

    pub fn gameinfo_path(&self) -> PathBuf {
        self.game_dir.join("game").join("citadel").join("gameinfo.gi")
    }

    pub fn ledger_path(&self) -> PathBuf {
        JsonLedger::ledger_path(&self.game_dir)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("deadlock-downloads"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game_dir: PathBuf::from("C:\\Program Files (x86)\\Steam\\steamapps\\common\\Deadlock"),
            download_dir: None,
            gamebanana_api_url: String::from("https://gamebanana.com/apiv11"),
            gamebanana_game_id: 20948,
            local_api_bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            log_level: String::from("info"),
            log_format: LogFormat::Pretty,
        }
    }
}
