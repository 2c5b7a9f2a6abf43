use crate::constants::tmdb::DEFAULT_BASE_URL;
use crate::domain::QueuePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub tmdb: TmdbConfig,

    pub drive: DriveConfig,

    pub library: LibraryConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Event bus buffer size (default: 100)
    pub event_bus_buffer_size: usize,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,

    /// How often live views re-read watch progress written by other
    /// processes, in milliseconds (default: 1000)
    pub watch_poll_interval_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/zplex.db".to_string(),
            log_level: "info".to_string(),
            event_bus_buffer_size: 100,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
            watch_poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,

    /// v3 API key. `TMDB_API_KEY` from the environment takes precedence.
    pub api_key: String,

    pub language: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub base_url: String,

    /// OAuth bearer token. `DRIVE_ACCESS_TOKEN` from the environment takes precedence.
    pub access_token: String,

    pub page_size: u32,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
            access_token: String::new(),
            page_size: 1000,
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Downloaded episodes live under this directory. File ids starting with
    /// it are treated as local paths.
    pub offline_path: String,

    /// URL probed to decide whether the network is reachable.
    pub connectivity_probe_url: String,

    /// Probe timeout in seconds (default: 5)
    pub connectivity_timeout_seconds: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            offline_path: "./offline".to_string(),
            connectivity_probe_url: "https://www.googleapis.com/generate_204".to_string(),
            connectivity_timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlaybackConfig {
    /// `accumulate` (default) keeps appending playable episodes on every merge
    /// within a season session; `replace` keeps only the latest merge.
    pub queue_policy: QueuePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            tmdb: TmdbConfig::default(),
            drive: DriveConfig::default(),
            library: LibraryConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Credentials may come from the environment (or a `.env` file) instead of
    /// being written to `config.toml`.
    pub fn apply_env_overrides(&mut self) {
        dotenvy::dotenv().ok();

        if let Ok(key) = std::env::var("TMDB_API_KEY")
            && !key.is_empty()
        {
            self.tmdb.api_key = key;
        }

        if let Ok(token) = std::env::var("DRIVE_ACCESS_TOKEN")
            && !token.is_empty()
        {
            self.drive.access_token = token;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("zplex").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".zplex").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.tmdb.base_url)
            .with_context(|| format!("Invalid TMDB base URL: {}", self.tmdb.base_url))?;

        url::Url::parse(&self.drive.base_url)
            .with_context(|| format!("Invalid Drive base URL: {}", self.drive.base_url))?;

        if self.drive.page_size == 0 {
            anyhow::bail!("Drive page size must be > 0");
        }

        if self.library.offline_path.is_empty() {
            anyhow::bail!("Offline path cannot be empty");
        }

        if self.general.watch_poll_interval_ms == 0 {
            anyhow::bail!("Watch poll interval must be > 0");
        }

        Ok(())
    }

    #[must_use]
    pub fn offline_root(&self) -> PathBuf {
        PathBuf::from(&self.library.offline_path)
    }
}
