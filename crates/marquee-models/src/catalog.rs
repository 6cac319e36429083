use serde::{Deserialize, Serialize};
use crate::credits::{Credits, Videos};
use crate::media::MediaKind;
use crate::watchlist::WatchlistEntry;

/// List envelope returned by every paged catalog endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagedResponse<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl<T> PagedResponse<T> {
    /// Wrap a complete result set as a single page
    pub fn single_page(results: Vec<T>) -> Self {
        let total = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results: total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub video: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvShow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCompany {
    pub id: u64,
    pub logo_path: Option<String>,
    pub name: String,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    pub iso_639_1: String,
    #[serde(default)]
    pub name: String,
}

/// Movie detail payload. Requested with `append_to_response=credits,videos`,
/// so credits and videos ride along when the API honours it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Option<Videos>,
}

impl MovieDetails {
    pub fn to_watchlist_entry(&self) -> WatchlistEntry {
        WatchlistEntry::new(self.movie.id, MediaKind::Movie, self.movie.title.clone(), self.movie.poster_path.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvShowDetails {
    #[serde(flatten)]
    pub show: TvShow,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Option<Videos>,
}

impl TvShowDetails {
    pub fn to_watchlist_entry(&self) -> WatchlistEntry {
        WatchlistEntry::new(self.show.id, MediaKind::Series, self.show.name.clone(), self.show.poster_path.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// One row of a `/search/multi` response, discriminated by `media_type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MultiSearchItem {
    Movie(Movie),
    Tv(TvShow),
    Person(PersonSummary),
    #[serde(other)]
    Other,
}

impl MultiSearchItem {
    /// Movies and series only; people and unknown rows are dropped
    pub fn into_catalog_item(self) -> Option<CatalogItem> {
        match self {
            MultiSearchItem::Movie(movie) => Some(CatalogItem::Movie(movie)),
            MultiSearchItem::Tv(show) => Some(CatalogItem::Series(show)),
            MultiSearchItem::Person(_) | MultiSearchItem::Other => None,
        }
    }
}

impl PagedResponse<MultiSearchItem> {
    pub fn catalog_items(self) -> Vec<CatalogItem> {
        self.results
            .into_iter()
            .filter_map(MultiSearchItem::into_catalog_item)
            .collect()
    }
}

/// A displayable list item: either a movie or a series summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CatalogItem {
    Movie(Movie),
    Series(TvShow),
}

impl CatalogItem {
    pub fn id(&self) -> u64 {
        match self {
            CatalogItem::Movie(m) => m.id,
            CatalogItem::Series(s) => s.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            CatalogItem::Movie(_) => MediaKind::Movie,
            CatalogItem::Series(_) => MediaKind::Series,
        }
    }

    pub fn display_title(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.title,
            CatalogItem::Series(s) => &s.name,
        }
    }

    pub fn release_date(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.release_date.as_deref(),
            CatalogItem::Series(s) => s.first_air_date.as_deref(),
        }
        .filter(|d| !d.is_empty())
    }

    /// Four-digit year from the release or first-air date
    pub fn year(&self) -> Option<&str> {
        self.release_date().and_then(|d| d.get(..4))
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.poster_path.as_deref(),
            CatalogItem::Series(s) => s.poster_path.as_deref(),
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            CatalogItem::Movie(m) => m.vote_average,
            CatalogItem::Series(s) => s.vote_average,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.overview,
            CatalogItem::Series(s) => &s.overview,
        }
    }

    /// Snapshot used when the item is saved to the watchlist
    pub fn to_watchlist_entry(&self) -> WatchlistEntry {
        WatchlistEntry::new(
            self.id(),
            self.kind(),
            self.display_title(),
            self.poster_path().map(str::to_string),
        )
    }
}

impl From<Movie> for CatalogItem {
    fn from(movie: Movie) -> Self {
        CatalogItem::Movie(movie)
    }
}

impl From<TvShow> for CatalogItem {
    fn from(show: TvShow) -> Self {
        CatalogItem::Series(show)
    }
}
