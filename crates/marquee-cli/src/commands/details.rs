use super::progress::FetchSpinner;
use super::render;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Color};
use marquee_catalog::{
    format_currency, format_rating, format_runtime, BackdropSize, CatalogError, CatalogSource, ImageUrls, PosterSize,
};
use marquee_models::{CastMember, CatalogItem, Credits, MediaKind, MovieDetails, PagedResponse, TvShowDetails, Videos, WatchlistEntry};
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use tracing::debug;

/// Cast members shown on a details page
pub const CAST_LIMIT: usize = 10;

/// Movie and TV details flattened into what the details page shows
#[derive(Debug, Clone)]
pub struct DetailsView {
    pub entry: WatchlistEntry,
    pub year: Option<String>,
    pub tagline: Option<String>,
    pub overview: String,
    pub genres: Vec<String>,
    pub runtime: Option<String>,
    pub rating: String,
    pub vote_count: u64,
    pub status: String,
    pub budget: Option<String>,
    pub revenue: Option<String>,
    pub seasons: Option<u32>,
    pub episodes: Option<u32>,
    pub homepage: Option<String>,
    pub cast: Vec<CastMember>,
    pub trailer_url: Option<String>,
    pub poster_url: String,
    pub backdrop_url: String,
}

fn year_of(date: Option<&str>) -> Option<String> {
    date.and_then(|d| d.get(..4)).map(str::to_string)
}

fn top_cast(credits: Option<&Credits>) -> Vec<CastMember> {
    credits.map(|c| c.top_billed(CAST_LIMIT).to_vec()).unwrap_or_default()
}

fn trailer_url(videos: Option<&Videos>) -> Option<String> {
    videos.and_then(|v| v.trailer()).and_then(|t| t.youtube_url())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.trim().is_empty())
}

impl DetailsView {
    pub fn from_movie(details: &MovieDetails, images: &ImageUrls) -> Self {
        let movie = &details.movie;
        Self {
            entry: details.to_watchlist_entry(),
            year: year_of(movie.release_date.as_deref()),
            tagline: non_empty(&details.tagline),
            overview: movie.overview.clone(),
            genres: details.genres.iter().map(|g| g.name.clone()).collect(),
            runtime: details.runtime.filter(|m| *m > 0).map(format_runtime),
            rating: format_rating(movie.vote_average),
            vote_count: movie.vote_count,
            status: details.status.clone(),
            budget: Some(format_currency(details.budget)),
            revenue: Some(format_currency(details.revenue)),
            seasons: None,
            episodes: None,
            homepage: non_empty(&details.homepage),
            cast: top_cast(details.credits.as_ref()),
            trailer_url: trailer_url(details.videos.as_ref()),
            poster_url: images.poster_url(movie.poster_path.as_deref(), PosterSize::W500),
            backdrop_url: images.backdrop_url(movie.backdrop_path.as_deref(), BackdropSize::W1280),
        }
    }

    pub fn from_show(details: &TvShowDetails, images: &ImageUrls) -> Self {
        let show = &details.show;
        Self {
            entry: details.to_watchlist_entry(),
            year: year_of(show.first_air_date.as_deref()),
            tagline: non_empty(&details.tagline),
            overview: show.overview.clone(),
            genres: details.genres.iter().map(|g| g.name.clone()).collect(),
            runtime: details.episode_run_time.first().filter(|m| **m > 0).map(|m| format_runtime(*m)),
            rating: format_rating(show.vote_average),
            vote_count: show.vote_count,
            status: details.status.clone(),
            budget: None,
            revenue: None,
            seasons: details.number_of_seasons,
            episodes: details.number_of_episodes,
            homepage: non_empty(&details.homepage),
            cast: top_cast(details.credits.as_ref()),
            trailer_url: trailer_url(details.videos.as_ref()),
            poster_url: images.poster_url(show.poster_path.as_deref(), PosterSize::W500),
            backdrop_url: images.backdrop_url(show.backdrop_path.as_deref(), BackdropSize::W1280),
        }
    }

    pub fn to_json(&self, in_watchlist: bool) -> Value {
        json!({
            "id": self.entry.id,
            "type": self.entry.kind,
            "title": self.entry.title,
            "year": self.year,
            "tagline": self.tagline,
            "overview": self.overview,
            "genres": self.genres,
            "runtime": self.runtime,
            "rating": self.rating,
            "vote_count": self.vote_count,
            "status": self.status,
            "budget": self.budget,
            "revenue": self.revenue,
            "seasons": self.seasons,
            "episodes": self.episodes,
            "homepage": self.homepage,
            "cast": self.cast.iter().map(|c| json!({ "name": c.name, "character": c.character })).collect::<Vec<_>>(),
            "trailer_url": self.trailer_url,
            "poster_url": self.poster_url,
            "backdrop_url": self.backdrop_url,
            "in_watchlist": in_watchlist,
        })
    }
}

/// Movie details, backfilling credits and videos when the response did not carry them
pub async fn load_movie(catalog: &dyn CatalogSource, id: u64) -> Result<MovieDetails, CatalogError> {
    let mut details = catalog.movie_details(id).await?;
    if details.credits.is_none() {
        debug!("Movie {} details came without credits, fetching separately", id);
        details.credits = catalog.movie_credits(id).await.ok();
    }
    if details.videos.is_none() {
        details.videos = catalog.movie_videos(id).await.ok();
    }
    Ok(details)
}

fn not_found_or(e: CatalogError, kind: MediaKind, id: u64) -> color_eyre::eyre::Report {
    if e.is_not_found() {
        color_eyre::eyre::eyre!("No {} with id {} in the catalog", kind.label().to_lowercase(), id)
    } else {
        color_eyre::eyre::eyre!("Failed to load {} {}: {}", kind.as_path(), id, e)
    }
}

pub async fn run_details(ctx: &AppContext, kind: MediaKind, id: u64, similar: bool, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let store = ctx.open_watchlist(output);
    let images = ctx.image_urls();

    let spinner = FetchSpinner::start(output, "Loading details...");
    let view = match kind {
        MediaKind::Movie => load_movie(catalog.as_ref(), id).await.map(|d| DetailsView::from_movie(&d, &images)),
        MediaKind::Series => catalog.tv_details(id).await.map(|d| DetailsView::from_show(&d, &images)),
    };
    let similar_titles = if similar && kind == MediaKind::Movie && view.is_ok() {
        Some(catalog.similar_movies(id).await)
    } else {
        None
    };
    spinner.finish();

    let view = view.map_err(|e| not_found_or(e, kind, id))?;
    let in_watchlist = store.contains(id, kind);

    let similar_titles = similar_titles
        .transpose()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load similar titles: {}", e))?
        .map(|page| PagedResponse {
            page: page.page,
            results: page.results.into_iter().map(CatalogItem::from).collect(),
            total_pages: page.total_pages,
            total_results: page.total_results,
        });

    if !output.is_human() {
        let mut value = view.to_json(in_watchlist);
        if let Some(page) = &similar_titles {
            value["similar"] = render::listing_json("Similar Movies", page, &store, &images);
        }
        output.json(&value);
        return Ok(());
    }

    print_view(&view, in_watchlist, output);
    if let Some(page) = &similar_titles {
        render::print_listing(output, "Similar Movies", page, &store, &images);
    }
    Ok(())
}

fn print_view(view: &DetailsView, in_watchlist: bool, output: &Output) {
    let heading = match &view.year {
        Some(year) => format!("{} ({})", view.entry.title, year),
        None => view.entry.title.clone(),
    };
    output.heading(heading);
    if let Some(tagline) = &view.tagline {
        output.info(tagline.italic().to_string());
    }

    let mut facts = render::new_table(&["", ""]);
    facts.add_row(vec![Cell::new("Type"), Cell::new(view.entry.kind.label())]);
    if !view.genres.is_empty() {
        facts.add_row(vec![Cell::new("Genres"), Cell::new(view.genres.join(", "))]);
    }
    if let Some(runtime) = &view.runtime {
        facts.add_row(vec![Cell::new("Runtime"), Cell::new(runtime)]);
    }
    facts.add_row(vec![
        Cell::new("Rating"),
        Cell::new(format!("{} ({} votes)", view.rating, view.vote_count)),
    ]);
    if !view.status.is_empty() {
        facts.add_row(vec![Cell::new("Status"), Cell::new(&view.status)]);
    }
    if let Some(seasons) = view.seasons {
        facts.add_row(vec![Cell::new("Seasons"), Cell::new(seasons)]);
    }
    if let Some(episodes) = view.episodes {
        facts.add_row(vec![Cell::new("Episodes"), Cell::new(episodes)]);
    }
    if let Some(budget) = &view.budget {
        facts.add_row(vec![Cell::new("Budget"), Cell::new(budget)]);
    }
    if let Some(revenue) = &view.revenue {
        facts.add_row(vec![Cell::new("Revenue"), Cell::new(revenue)]);
    }
    if let Some(trailer) = &view.trailer_url {
        facts.add_row(vec![Cell::new("Trailer"), Cell::new(trailer)]);
    }
    if let Some(homepage) = &view.homepage {
        facts.add_row(vec![Cell::new("Homepage"), Cell::new(homepage)]);
    }
    facts.add_row(vec![Cell::new("Poster"), Cell::new(&view.poster_url)]);
    let saved = if in_watchlist {
        Cell::new(format!("{} yes", render::SAVED_MARKER)).fg(Color::Yellow)
    } else {
        Cell::new("no")
    };
    facts.add_row(vec![Cell::new("On watchlist"), saved]);
    output.table(&facts);

    if !view.overview.is_empty() {
        output.info(format!("\n{}", view.overview));
    }

    if !view.cast.is_empty() {
        output.heading("Cast");
        let mut cast = render::new_table(&["Name", "Character"]);
        for member in &view.cast {
            cast.add_row(vec![
                Cell::new(&member.name),
                Cell::new(member.character.as_deref().unwrap_or("")),
            ]);
        }
        output.table(&cast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use marquee_catalog::MockCatalog;

    fn movie_details() -> MovieDetails {
        let cast: Vec<Value> = (0..12)
            .map(|i| json!({ "id": i, "name": format!("Actor {}", i), "character": "Someone", "profile_path": null, "order": i }))
            .collect();
        serde_json::from_value(json!({
            "id": 27205,
            "title": "Inception",
            "overview": "A thief who steals corporate secrets.",
            "poster_path": "/inception.jpg",
            "backdrop_path": null,
            "release_date": "2010-07-15",
            "vote_average": 8.368,
            "vote_count": 35000,
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
            "runtime": 148,
            "budget": 160000000,
            "revenue": 0,
            "tagline": "Your mind is the scene of the crime.",
            "status": "Released",
            "homepage": "",
            "credits": { "cast": cast },
            "videos": { "results": [
                { "id": "a", "key": "teaser1", "name": "Teaser", "site": "YouTube", "type": "Teaser" },
                { "id": "b", "key": "YoHD9XEInc0", "name": "Official Trailer", "site": "YouTube", "type": "Trailer" }
            ] }
        }))
        .unwrap()
    }

    #[test]
    fn test_movie_view() {
        let view = DetailsView::from_movie(&movie_details(), &ImageUrls::default());
        assert_eq!(view.year.as_deref(), Some("2010"));
        assert_eq!(view.runtime.as_deref(), Some("2h 28m"));
        assert_eq!(view.budget.as_deref(), Some("$160,000,000"));
        assert_eq!(view.revenue.as_deref(), Some("N/A"));
        assert_eq!(view.rating, "8.4");
        assert_eq!(view.cast.len(), CAST_LIMIT);
        assert_eq!(view.cast[0].name, "Actor 0");
        assert_eq!(view.trailer_url.as_deref(), Some("https://www.youtube.com/watch?v=YoHD9XEInc0"));
        assert_eq!(view.homepage, None);
        assert_eq!(view.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(view.backdrop_url, marquee_catalog::PLACEHOLDER_IMAGE);

        let value = view.to_json(true);
        assert_eq!(value["type"], "movie");
        assert_eq!(value["in_watchlist"], true);
        assert_eq!(value["cast"].as_array().unwrap().len(), CAST_LIMIT);
    }

    #[tokio::test]
    async fn test_show_view_from_demo() {
        let catalog = MockCatalog::new().unwrap();
        let details = catalog.tv_details(101).await.unwrap();
        let view = DetailsView::from_show(&details, &ImageUrls::default());
        assert_eq!(view.entry.kind, MediaKind::Series);
        assert_eq!(view.entry.id, 101);
        assert!(view.budget.is_none());
        assert!(view.cast.is_empty());
        assert!(view.trailer_url.is_none());
    }

    #[tokio::test]
    async fn test_run_details_reports_missing_titles() {
        let (_dir, ctx) = crate::commands::test_support::demo_context();
        let output = Output::new(OutputFormat::Json, true);

        run_details(&ctx, MediaKind::Movie, 2, true, &output).await.unwrap();

        let err = run_details(&ctx, MediaKind::Movie, 999, false, &output).await.unwrap_err();
        assert!(err.to_string().contains("No movie with id 999"));
    }
}
