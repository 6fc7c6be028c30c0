use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::draft::FileStorage;
use crate::photos::DEFAULT_MAX_PHOTO_BYTES;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub photos: PhotosConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Marketplace backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// GET, answers `{ "<type-id>": "<url>" }`
    #[serde(default = "default_thumbnails_path")]
    pub thumbnails_path: String,
    /// POST, multipart listing creation
    #[serde(default = "default_listings_path")]
    pub listings_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_thumbnails_path() -> String {
    "/api/servicos/imagens".to_string()
}

fn default_listings_path() -> String {
    "/api/anuncios".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_env() -> String {
    "ANUNCIO_TOKEN".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            thumbnails_path: default_thumbnails_path(),
            listings_path: default_listings_path(),
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosConfig {
    /// Per-photo size limit in bytes (default: 5 MiB)
    #[serde(default = "default_max_photo_bytes")]
    pub max_bytes: u64,
}

fn default_max_photo_bytes() -> u64 {
    DEFAULT_MAX_PHOTO_BYTES
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_photo_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Session file and logs live here
    #[serde(default = "default_state_dir")]
    pub state: String,
}

fn default_state_dir() -> String {
    ".anuncio".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    200
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".anuncio/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Embedded defaults so the wizard runs without any config file
        let defaults_json = serde_json::to_string(&Config::default())
            .context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("anuncio").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // ANUNCIO__API__BASE_URL and friends
        builder = builder.add_source(
            config::Environment::with_prefix("ANUNCIO")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .anuncio/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// File-backed session storage location
    pub fn session_path(&self) -> PathBuf {
        self.state_path().join(FileStorage::FILE_NAME)
    }
}
