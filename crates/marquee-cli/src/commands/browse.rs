use super::progress::FetchSpinner;
use super::render;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use futures::future::join_all;
use marquee_catalog::{CatalogResult, CatalogSource, ListCategory};
use marquee_models::{CatalogItem, PagedResponse};
use serde_json::json;
use tracing::{debug, warn};

/// Sections on the home screen, top to bottom
pub const HOME_SECTIONS: [ListCategory; 6] = [
    ListCategory::TrendingMovies,
    ListCategory::PopularMovies,
    ListCategory::TopRatedMovies,
    ListCategory::NowPlayingMovies,
    ListCategory::UpcomingMovies,
    ListCategory::PopularTv,
];

/// Fetch every home section concurrently. A failed section does not sink the others.
pub async fn fetch_home(
    catalog: &dyn CatalogSource,
) -> Vec<(ListCategory, CatalogResult<PagedResponse<CatalogItem>>)> {
    let results = join_all(HOME_SECTIONS.iter().map(|category| catalog.list(*category, 1))).await;
    HOME_SECTIONS.iter().copied().zip(results).collect()
}

pub async fn run_home(ctx: &AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let store = ctx.open_watchlist(output);
    let images = ctx.image_urls();

    let spinner = FetchSpinner::start(output, format!("Loading from {}...", catalog.source_name()));
    let sections = fetch_home(catalog.as_ref()).await;
    spinner.finish();

    let mut failures = 0;
    let mut json_sections = Vec::new();
    for (category, result) in &sections {
        match result {
            Ok(listing) => {
                debug!("{}: {} titles", category, listing.results.len());
                if output.is_human() {
                    render::print_listing(output, category.title(), listing, &store, &images);
                } else {
                    json_sections.push(render::listing_json(category.title(), listing, &store, &images));
                }
            }
            Err(e) => {
                failures += 1;
                warn!("Failed to load {}: {}", category, e);
                output.warn(format!("Could not load {}: {}", category, e));
            }
        }
    }

    if !output.is_human() {
        output.json(&json!({ "sections": json_sections }));
    }

    if failures == sections.len() {
        return Err(color_eyre::eyre::eyre!("Could not load any listings from {}", catalog.source_name()));
    }
    Ok(())
}

pub async fn run_browse(ctx: &AppContext, category: ListCategory, page: u32, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let store = ctx.open_watchlist(output);

    let spinner = FetchSpinner::start(output, format!("Loading {}...", category));
    let listing = catalog.list(category, page.max(1)).await;
    spinner.finish();

    let listing = listing.map_err(|e| color_eyre::eyre::eyre!("Failed to load {}: {}", category, e))?;
    render::print_listing(output, category.title(), &listing, &store, &ctx.image_urls());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_catalog::MockCatalog;
    use marquee_models::MediaKind;

    #[tokio::test]
    async fn test_fetch_home_returns_every_section_in_order() {
        let catalog = MockCatalog::new().unwrap();
        let sections = fetch_home(&catalog).await;

        let categories: Vec<ListCategory> = sections.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, HOME_SECTIONS.to_vec());
        assert!(sections.iter().all(|(_, r)| r.as_ref().is_ok_and(|l| !l.is_empty())));

        let (_, tv) = sections.last().unwrap();
        assert!(tv.as_ref().unwrap().results.iter().all(|i| i.kind() == MediaKind::Series));
    }

    #[tokio::test]
    async fn test_run_browse_with_demo_catalog() {
        let (_dir, ctx) = crate::commands::test_support::demo_context();
        let output = Output::new(crate::output::OutputFormat::Json, true);
        run_browse(&ctx, ListCategory::UpcomingMovies, 1, &output).await.unwrap();
        run_home(&ctx, &output).await.unwrap();
    }
}
