pub mod browse;
pub mod clear;
pub mod config;
pub mod details;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod search;
pub mod watchlist;

use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use marquee_catalog::{create_catalog, CatalogSource, ImageUrls};
use marquee_config::{Config, CredentialStore, PathManager};
use marquee_core::{LoadOutcome, PersistOutcome, WatchlistStore};

/// Everything a command needs that comes from disk: resolved paths, the
/// parsed config and the credentials file
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config = Config::load_or_default(&paths.config_file()).map_err(|e| eyre!("{:#}", e))?;
        let credentials = CredentialStore::open(paths.credentials_file()).map_err(|e| eyre!("{:#}", e))?;
        Ok(Self::from_parts(paths, config, credentials))
    }

    pub fn from_parts(paths: PathManager, config: Config, credentials: CredentialStore) -> Self {
        Self {
            paths,
            config,
            credentials,
        }
    }

    /// Open the watchlist slot, telling the user when saved data had to be discarded
    pub fn open_watchlist(&self, output: &Output) -> WatchlistStore {
        let (store, outcome) = WatchlistStore::open(&self.paths, &self.config);
        if let LoadOutcome::Corrupt { reason } = outcome {
            output.warn(format!(
                "Saved watchlist in slot '{}' could not be read ({}); starting with an empty watchlist",
                store.slot(),
                reason
            ));
        }
        store
    }

    pub fn catalog(&self) -> Result<Box<dyn CatalogSource>> {
        self.config
            .validate_for_catalog(&self.credentials)
            .map_err(|e| eyre!("{:#}. Or run 'marquee config init --mock' to use demo data", e))?;
        create_catalog(&self.config, &self.credentials).map_err(|e| eyre!("{:#}", e))
    }

    pub fn image_urls(&self) -> ImageUrls {
        ImageUrls::new(self.config.tmdb.image_base_url.clone())
    }
}

/// Warn when the last watchlist write did not reach storage
pub fn report_persist(store: &WatchlistStore, output: &Output) {
    if let Some(PersistOutcome::Failed { reason }) = store.last_persist() {
        output.warn(format!(
            "Watchlist updated for this session only; saving failed: {}",
            reason
        ));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Context rooted in a temp dir, serving demo data
    pub fn demo_context() -> (TempDir, AppContext) {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        let mut config = Config::default();
        config.tmdb.use_mock_data = true;
        let credentials = CredentialStore::new(paths.credentials_file());
        (dir, AppContext::from_parts(paths, config, credentials))
    }
}
