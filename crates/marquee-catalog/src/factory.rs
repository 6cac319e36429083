use anyhow::Result;
use marquee_config::{Config, CredentialStore};
use tracing::info;
use crate::error::CatalogError;
use crate::mock::MockCatalog;
use crate::tmdb::TmdbClient;
use crate::traits::CatalogSource;

/// Build the catalog the configuration asks for: the demo data set when
/// `tmdb.use_mock_data` is on, otherwise the live TMDB client.
pub fn create_catalog(config: &Config, credentials: &CredentialStore) -> Result<Box<dyn CatalogSource>> {
    config.validate()?;

    if config.tmdb.use_mock_data {
        info!("Using built-in demo catalog");
        return Ok(Box::new(MockCatalog::new()?));
    }

    let api_key = config
        .effective_api_key(credentials)
        .ok_or(CatalogError::MissingApiKey)?;
    info!("Using TMDB catalog at {}", config.tmdb.base_url);
    Ok(Box::new(TmdbClient::with_base_url(api_key, config.tmdb.base_url.clone())))
}
