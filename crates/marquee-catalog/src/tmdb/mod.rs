pub mod client;

pub use client::TmdbClient;

use reqwest::Client;
use std::time::Duration;

/// Shared reqwest client for catalog calls
pub fn create_tmdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(20))
        .build()
        .unwrap_or_else(|_| Client::new())
}
