use crate::error::{CatalogError, CatalogResult};
use crate::traits::{CatalogSource, TimeWindow};
use async_trait::async_trait;
use marquee_models::{
    Credits, Genre, Movie, MovieDetails, MultiSearchItem, PagedResponse, TvShow, TvShowDetails, Videos,
};
use serde::Deserialize;
use tracing::debug;

const DEMO_CATALOG: &str = include_str!("demo_catalog.json");

#[derive(Debug, Deserialize)]
struct DemoCatalog {
    movies: Vec<Movie>,
    shows: Vec<TvShow>,
    genres: Vec<Genre>,
}

/// Offline catalog serving a small built-in data set.
///
/// Listings are fixed slices of the demo movies; every listing has exactly one
/// page. Searches match a case-insensitive substring of the title.
pub struct MockCatalog {
    movies: Vec<Movie>,
    shows: Vec<TvShow>,
    genres: Vec<Genre>,
}

impl MockCatalog {
    pub fn new() -> CatalogResult<Self> {
        let demo: DemoCatalog = serde_json::from_str(DEMO_CATALOG).map_err(|source| CatalogError::Decode {
            endpoint: "demo catalog".to_string(),
            source,
        })?;
        Ok(Self::from_parts(demo.movies, demo.shows, demo.genres))
    }

    pub fn from_parts(movies: Vec<Movie>, shows: Vec<TvShow>, genres: Vec<Genre>) -> Self {
        Self { movies, shows, genres }
    }

    fn page<T: Clone>(items: &[T], page: u32) -> PagedResponse<T> {
        if page <= 1 {
            PagedResponse::single_page(items.to_vec())
        } else {
            PagedResponse {
                page,
                results: Vec::new(),
                total_pages: 1,
                total_results: items.len() as u32,
            }
        }
    }

    fn slice(&self, start: usize, end: usize) -> &[Movie] {
        let end = end.min(self.movies.len());
        let start = start.min(end);
        &self.movies[start..end]
    }

    fn genres_for(&self, ids: &[u32]) -> Vec<Genre> {
        ids.iter()
            .filter_map(|id| self.genres.iter().find(|g| g.id == *id).cloned())
            .collect()
    }

    fn find_movie(&self, id: u64) -> CatalogResult<&Movie> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("movie {}", id)))
    }

    fn find_show(&self, id: u64) -> CatalogResult<&TvShow> {
        self.shows
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("tv {}", id)))
    }

    fn matching_movies(&self, query: &str) -> Vec<Movie> {
        let needle = query.to_lowercase();
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn matching_shows(&self, query: &str) -> Vec<TvShow> {
        let needle = query.to_lowercase();
        self.shows
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    fn source_name(&self) -> &str {
        "demo"
    }

    async fn trending_movies(&self, _window: TimeWindow) -> CatalogResult<PagedResponse<Movie>> {
        Ok(Self::page(self.slice(0, 3), 1))
    }

    async fn popular_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        Ok(Self::page(&self.movies, page))
    }

    async fn top_rated_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        let reversed: Vec<Movie> = self.movies.iter().rev().cloned().collect();
        Ok(Self::page(&reversed, page))
    }

    async fn now_playing_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        Ok(Self::page(self.slice(1, 4), page))
    }

    async fn upcoming_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        Ok(Self::page(self.slice(2, self.movies.len()), page))
    }

    async fn movie_credits(&self, id: u64) -> CatalogResult<Credits> {
        self.find_movie(id)?;
        Ok(Credits::default())
    }

    async fn movie_videos(&self, id: u64) -> CatalogResult<Videos> {
        self.find_movie(id)?;
        Ok(Videos::default())
    }

    async fn similar_movies(&self, id: u64) -> CatalogResult<PagedResponse<Movie>> {
        let movie = self.find_movie(id)?;
        let similar: Vec<Movie> = self
            .movies
            .iter()
            .filter(|m| m.id != id && m.genre_ids.iter().any(|g| movie.genre_ids.contains(g)))
            .cloned()
            .collect();
        Ok(Self::page(&similar, 1))
    }

    async fn movie_details(&self, id: u64) -> CatalogResult<MovieDetails> {
        let movie = self.find_movie(id)?.clone();
        debug!("Serving demo details for movie {}", id);
        Ok(MovieDetails {
            genres: self.genres_for(&movie.genre_ids),
            movie,
            runtime: None,
            budget: 0,
            revenue: 0,
            tagline: None,
            status: "Released".to_string(),
            homepage: None,
            production_companies: Vec::new(),
            production_countries: Vec::new(),
            spoken_languages: Vec::new(),
            credits: Some(Credits::default()),
            videos: Some(Videos::default()),
        })
    }

    async fn trending_tv(&self, _window: TimeWindow) -> CatalogResult<PagedResponse<TvShow>> {
        Ok(Self::page(&self.shows, 1))
    }

    async fn popular_tv(&self, page: u32) -> CatalogResult<PagedResponse<TvShow>> {
        Ok(Self::page(&self.shows, page))
    }

    async fn top_rated_tv(&self, page: u32) -> CatalogResult<PagedResponse<TvShow>> {
        let mut ranked = self.shows.clone();
        ranked.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
        Ok(Self::page(&ranked, page))
    }

    async fn tv_details(&self, id: u64) -> CatalogResult<TvShowDetails> {
        let show = self.find_show(id)?.clone();
        Ok(TvShowDetails {
            genres: self.genres_for(&show.genre_ids),
            show,
            number_of_seasons: None,
            number_of_episodes: None,
            episode_run_time: Vec::new(),
            tagline: None,
            status: "Returning Series".to_string(),
            homepage: None,
            credits: Some(Credits::default()),
            videos: Some(Videos::default()),
        })
    }

    async fn search_multi(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<MultiSearchItem>> {
        let results: Vec<MultiSearchItem> = self
            .matching_movies(query)
            .into_iter()
            .map(MultiSearchItem::Movie)
            .chain(self.matching_shows(query).into_iter().map(MultiSearchItem::Tv))
            .collect();
        Ok(Self::page(&results, page))
    }

    async fn search_movies(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        Ok(Self::page(&self.matching_movies(query), page))
    }

    async fn search_tv(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<TvShow>> {
        Ok(Self::page(&self.matching_shows(query), page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ListCategory;
    use marquee_models::MediaKind;

    fn catalog() -> MockCatalog {
        MockCatalog::new().unwrap()
    }

    #[tokio::test]
    async fn test_demo_listings() {
        let catalog = catalog();
        let trending = catalog.trending_movies(TimeWindow::Week).await.unwrap();
        assert_eq!(trending.results.len(), 3);
        assert_eq!(trending.results[0].title, "The Dark Knight");

        let top = catalog.top_rated_movies(1).await.unwrap();
        assert_eq!(top.results[0].title, "Avengers: Endgame");

        let now_playing = catalog.now_playing_movies(1).await.unwrap();
        let titles: Vec<&str> = now_playing.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Interstellar", "The Matrix"]);

        let top_tv = catalog.top_rated_tv(1).await.unwrap();
        assert_eq!(top_tv.results[0].name, "Breaking Bad");
    }

    #[tokio::test]
    async fn test_later_pages_are_empty() {
        let page = catalog().popular_movies(2).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.page, 2);
        assert_eq!(page.total_results, 5);
    }

    #[tokio::test]
    async fn test_search_multi_is_case_insensitive() {
        let catalog = catalog();
        let results = catalog.search_multi("THE", 1).await.unwrap().catalog_items();
        let titles: Vec<&str> = results.iter().map(|i| i.display_title()).collect();
        assert_eq!(titles, vec!["The Dark Knight", "The Matrix"]);

        let results = catalog.search_multi("stranger", 1).await.unwrap().catalog_items();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind(), MediaKind::Series);

        assert!(catalog.search_multi("zzz", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_details_and_not_found() {
        let catalog = catalog();
        let details = catalog.movie_details(2).await.unwrap();
        assert_eq!(details.movie.title, "Inception");
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(genres, vec!["Action", "Science Fiction", "Thriller"]);

        let err = catalog.movie_details(999).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(catalog.tv_details(101).await.is_ok());
        assert!(catalog.tv_details(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_similar_movies_share_a_genre() {
        let similar = catalog().similar_movies(3).await.unwrap();
        assert!(similar.results.iter().all(|m| m.id != 3));
        // Every other demo movie is drama or sci-fi
        assert_eq!(similar.results.len(), 4);
    }

    #[tokio::test]
    async fn test_list_category() {
        let listing = catalog().list(ListCategory::PopularTv, 1).await.unwrap();
        assert_eq!(listing.results.len(), 2);
        assert!(listing.results.iter().all(|i| i.kind() == MediaKind::Series));
    }
}
