use super::progress::FetchSpinner;
use super::render;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use marquee_catalog::{CatalogResult, CatalogSource};
use marquee_models::{CatalogItem, PagedResponse};

/// Multi search with people filtered out. A blank query yields `None` without a request.
pub async fn search_titles(
    catalog: &dyn CatalogSource,
    query: &str,
    page: u32,
) -> CatalogResult<Option<PagedResponse<CatalogItem>>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }

    let response = catalog.search_multi(query, page.max(1)).await?;
    let (page, total_pages, total_results) = (response.page, response.total_pages, response.total_results);
    Ok(Some(PagedResponse {
        page,
        results: response.catalog_items(),
        total_pages,
        total_results,
    }))
}

pub async fn run_search(ctx: &AppContext, query: &str, page: u32, output: &Output) -> Result<()> {
    if query.trim().is_empty() {
        output.warn("Enter something to search for, e.g. marquee search inception");
        return Ok(());
    }

    let catalog = ctx.catalog()?;
    let store = ctx.open_watchlist(output);

    let spinner = FetchSpinner::start(output, format!("Searching for \"{}\"...", query.trim()));
    let results = search_titles(catalog.as_ref(), query, page).await;
    spinner.finish();

    let Some(results) = results.map_err(|e| color_eyre::eyre::eyre!("Search failed: {}", e))? else {
        return Ok(());
    };

    if results.is_empty() && output.is_human() {
        output.info(format!("No results found for \"{}\"", query.trim()));
        return Ok(());
    }

    let title = format!("Results for \"{}\"", query.trim());
    render::print_listing(output, &title, &results, &store, &ctx.image_urls());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_catalog::MockCatalog;

    #[tokio::test]
    async fn test_blank_query_is_not_sent() {
        let catalog = MockCatalog::new().unwrap();
        assert!(search_titles(&catalog, "   ", 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_trims_and_matches() {
        let catalog = MockCatalog::new().unwrap();
        let results = search_titles(&catalog, "  matrix ", 1).await.unwrap().unwrap();
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].display_title(), "The Matrix");
    }

    #[tokio::test]
    async fn test_no_matches_is_an_empty_page() {
        let catalog = MockCatalog::new().unwrap();
        let results = search_titles(&catalog, "no such title", 1).await.unwrap().unwrap();
        assert!(results.is_empty());
    }
}
