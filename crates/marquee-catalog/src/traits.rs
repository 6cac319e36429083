use async_trait::async_trait;
use marquee_models::{
    CatalogItem, Credits, MediaKind, Movie, MovieDetails, MultiSearchItem, PagedResponse, TvShow, TvShowDetails, Videos,
};
use std::fmt;
use crate::error::CatalogResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Named listings shown on the home screen and by `browse`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCategory {
    TrendingMovies,
    PopularMovies,
    TopRatedMovies,
    NowPlayingMovies,
    UpcomingMovies,
    TrendingTv,
    PopularTv,
    TopRatedTv,
}

impl ListCategory {
    pub const ALL: [ListCategory; 8] = [
        ListCategory::TrendingMovies,
        ListCategory::PopularMovies,
        ListCategory::TopRatedMovies,
        ListCategory::NowPlayingMovies,
        ListCategory::UpcomingMovies,
        ListCategory::TrendingTv,
        ListCategory::PopularTv,
        ListCategory::TopRatedTv,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ListCategory::TrendingMovies => "Trending Movies",
            ListCategory::PopularMovies => "Popular Movies",
            ListCategory::TopRatedMovies => "Top Rated Movies",
            ListCategory::NowPlayingMovies => "Now Playing",
            ListCategory::UpcomingMovies => "Coming Soon",
            ListCategory::TrendingTv => "Trending TV Shows",
            ListCategory::PopularTv => "Popular TV Shows",
            ListCategory::TopRatedTv => "Top Rated TV Shows",
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            ListCategory::TrendingTv | ListCategory::PopularTv | ListCategory::TopRatedTv => MediaKind::Series,
            _ => MediaKind::Movie,
        }
    }
}

impl fmt::Display for ListCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn movies(page: PagedResponse<Movie>) -> PagedResponse<CatalogItem> {
    PagedResponse {
        page: page.page,
        results: page.results.into_iter().map(CatalogItem::Movie).collect(),
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

fn shows(page: PagedResponse<TvShow>) -> PagedResponse<CatalogItem> {
    PagedResponse {
        page: page.page,
        results: page.results.into_iter().map(CatalogItem::Series).collect(),
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

/// Read-only access to the movie/TV metadata catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    // Movies
    async fn trending_movies(&self, window: TimeWindow) -> CatalogResult<PagedResponse<Movie>>;
    async fn popular_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>>;
    async fn top_rated_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>>;
    async fn now_playing_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>>;
    async fn upcoming_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>>;
    async fn movie_credits(&self, id: u64) -> CatalogResult<Credits>;
    async fn movie_videos(&self, id: u64) -> CatalogResult<Videos>;
    async fn similar_movies(&self, id: u64) -> CatalogResult<PagedResponse<Movie>>;
    async fn movie_details(&self, id: u64) -> CatalogResult<MovieDetails>;

    // TV
    async fn trending_tv(&self, window: TimeWindow) -> CatalogResult<PagedResponse<TvShow>>;
    async fn popular_tv(&self, page: u32) -> CatalogResult<PagedResponse<TvShow>>;
    async fn top_rated_tv(&self, page: u32) -> CatalogResult<PagedResponse<TvShow>>;
    async fn tv_details(&self, id: u64) -> CatalogResult<TvShowDetails>;

    // Search
    async fn search_multi(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<MultiSearchItem>>;
    async fn search_movies(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<Movie>>;
    async fn search_tv(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<TvShow>>;

    /// Fetch a named listing as display items. Trending lists use the weekly
    /// window and ignore `page`.
    async fn list(&self, category: ListCategory, page: u32) -> CatalogResult<PagedResponse<CatalogItem>> {
        let listing = match category {
            ListCategory::TrendingMovies => movies(self.trending_movies(TimeWindow::Week).await?),
            ListCategory::PopularMovies => movies(self.popular_movies(page).await?),
            ListCategory::TopRatedMovies => movies(self.top_rated_movies(page).await?),
            ListCategory::NowPlayingMovies => movies(self.now_playing_movies(page).await?),
            ListCategory::UpcomingMovies => movies(self.upcoming_movies(page).await?),
            ListCategory::TrendingTv => shows(self.trending_tv(TimeWindow::Week).await?),
            ListCategory::PopularTv => shows(self.popular_tv(page).await?),
            ListCategory::TopRatedTv => shows(self.top_rated_tv(page).await?),
        };
        Ok(listing)
    }
}
