use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::credentials::CredentialStore;

/// Environment variable that overrides every configured API key
pub const API_KEY_ENV: &str = "MARQUEE_TMDB_API_KEY";

pub const DEFAULT_WATCHLIST_SLOT: &str = "marquee-watchlist";

const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    /// Usually kept in credentials.toml instead; this is a fallback
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Serve built-in demo data instead of calling the API
    #[serde(default)]
    pub use_mock_data: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchlistConfig {
    /// Storage slot holding the JSON entry list
    #[serde(default = "default_slot")]
    pub slot: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Daily-rotated log file; logs go to stderr when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_slot() -> String {
    DEFAULT_WATCHLIST_SLOT.to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            use_mock_data: false,
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self { slot: default_slot() }
    }
}

/// Slot names become file names, so keep them to a safe alphabet
pub fn is_valid_slot_name(slot: &str) -> bool {
    !slot.is_empty()
        && !slot.starts_with('.')
        && slot.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn usable_key(key: Option<&str>) -> Option<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != API_KEY_PLACEHOLDER)
        .map(str::to_string)
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the settings that don't depend on credentials
    pub fn validate(&self) -> anyhow::Result<()> {
        if !is_valid_slot_name(&self.watchlist.slot) {
            return Err(anyhow::anyhow!(
                "Invalid watchlist slot '{}': use letters, digits, '-', '_' or '.'",
                self.watchlist.slot
            ));
        }

        for (name, url) in [("base_url", &self.tmdb.base_url), ("image_base_url", &self.tmdb.image_base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("tmdb.{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        Ok(())
    }

    /// Validate, and also require an API key unless demo data is enabled
    pub fn validate_for_catalog(&self, credentials: &CredentialStore) -> anyhow::Result<()> {
        self.validate()?;
        if !self.tmdb.use_mock_data && self.effective_api_key(credentials).is_none() {
            return Err(anyhow::anyhow!(
                "No TMDB API key configured. Run 'marquee config set-api-key' or set {}",
                API_KEY_ENV
            ));
        }
        Ok(())
    }

    /// API key to use: environment first, then credentials file, then config file
    pub fn effective_api_key(&self, credentials: &CredentialStore) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok(), credentials)
    }

    fn resolve_api_key(&self, env_key: Option<String>, credentials: &CredentialStore) -> Option<String> {
        usable_key(env_key.as_deref())
            .or_else(|| usable_key(credentials.get_tmdb_api_key().map(String::as_str)))
            .or_else(|| usable_key(self.tmdb.api_key.as_deref()))
    }

    pub fn is_catalog_configured(&self, credentials: &CredentialStore) -> bool {
        self.tmdb.use_mock_data || self.effective_api_key(credentials).is_some()
    }
}
