pub mod catalog;
pub mod credits;
pub mod media;
pub mod watchlist;

pub use catalog::{CatalogItem, Genre, Movie, MovieDetails, MultiSearchItem, PagedResponse, PersonSummary, ProductionCompany, ProductionCountry, SpokenLanguage, TvShow, TvShowDetails};
pub use credits::{CastMember, Credits, Video, Videos};
pub use media::{MediaKind, ParseMediaKindError};
pub use watchlist::{EntryKey, WatchlistEntry};
