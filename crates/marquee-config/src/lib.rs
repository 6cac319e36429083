pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, LoggingConfig, TmdbConfig, WatchlistConfig, is_valid_slot_name, API_KEY_ENV, DEFAULT_WATCHLIST_SLOT};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
