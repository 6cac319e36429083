use crate::error::{CatalogError, CatalogResult};
use crate::tmdb::create_tmdb_client;
use crate::traits::{CatalogSource, TimeWindow};
use async_trait::async_trait;
use marquee_models::{Credits, Movie, MovieDetails, MultiSearchItem, PagedResponse, TvShow, TvShowDetails, Videos};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Detail requests pull credits and videos in the same round trip
const DETAIL_APPENDS: &str = "credits,videos";

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Arc::new(create_tmdb_client()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `path`, with the API key appended as a query parameter
    pub fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> CatalogResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| CatalogError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("api_key", &self.api_key);
        }
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> CatalogResult<T> {
        let url = self.endpoint_url(path, params)?;
        // Log the path only; the URL carries the API key
        debug!("TMDB GET {}", path);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("TMDB {} returned status {}", path, status);
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        decode(path, &body)
    }

    async fn fetch_page<T: DeserializeOwned>(&self, path: &str, page: u32) -> CatalogResult<PagedResponse<T>> {
        self.fetch(path, &[("page", page.max(1).to_string())]).await
    }

    async fn search<T: DeserializeOwned>(&self, path: &str, query: &str, page: u32) -> CatalogResult<PagedResponse<T>> {
        self.fetch(
            path,
            &[("query", query.to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> CatalogResult<T> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn trending_movies(&self, window: TimeWindow) -> CatalogResult<PagedResponse<Movie>> {
        self.fetch(&format!("/trending/movie/{}", window.as_str()), &[]).await
    }

    async fn popular_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        self.fetch_page("/movie/popular", page).await
    }

    async fn top_rated_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        self.fetch_page("/movie/top_rated", page).await
    }

    async fn now_playing_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        self.fetch_page("/movie/now_playing", page).await
    }

    async fn upcoming_movies(&self, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        self.fetch_page("/movie/upcoming", page).await
    }

    async fn movie_credits(&self, id: u64) -> CatalogResult<Credits> {
        self.fetch(&format!("/movie/{}/credits", id), &[]).await
    }

    async fn movie_videos(&self, id: u64) -> CatalogResult<Videos> {
        self.fetch(&format!("/movie/{}/videos", id), &[]).await
    }

    async fn similar_movies(&self, id: u64) -> CatalogResult<PagedResponse<Movie>> {
        self.fetch(&format!("/movie/{}/similar", id), &[]).await
    }

    async fn movie_details(&self, id: u64) -> CatalogResult<MovieDetails> {
        self.fetch(
            &format!("/movie/{}", id),
            &[("append_to_response", DETAIL_APPENDS.to_string())],
        )
        .await
    }

    async fn trending_tv(&self, window: TimeWindow) -> CatalogResult<PagedResponse<TvShow>> {
        self.fetch(&format!("/trending/tv/{}", window.as_str()), &[]).await
    }

    async fn popular_tv(&self, page: u32) -> CatalogResult<PagedResponse<TvShow>> {
        self.fetch_page("/tv/popular", page).await
    }

    async fn top_rated_tv(&self, page: u32) -> CatalogResult<PagedResponse<TvShow>> {
        self.fetch_page("/tv/top_rated", page).await
    }

    async fn tv_details(&self, id: u64) -> CatalogResult<TvShowDetails> {
        self.fetch(
            &format!("/tv/{}", id),
            &[("append_to_response", DETAIL_APPENDS.to_string())],
        )
        .await
    }

    async fn search_multi(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<MultiSearchItem>> {
        self.search("/search/multi", query, page).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<Movie>> {
        self.search("/search/movie", query, page).await
    }

    async fn search_tv(&self, query: &str, page: u32) -> CatalogResult<PagedResponse<TvShow>> {
        self.search("/search/tv", query, page).await
    }
}
