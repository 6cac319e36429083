pub mod error;
pub mod factory;
pub mod format;
pub mod images;
pub mod mock;
pub mod tmdb;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use factory::create_catalog;
pub use format::{format_currency, format_rating, format_runtime};
pub use images::{BackdropSize, ImageUrls, PosterSize, PLACEHOLDER_IMAGE};
pub use mock::MockCatalog;
pub use tmdb::TmdbClient;
pub use traits::{CatalogSource, ListCategory, TimeWindow};
