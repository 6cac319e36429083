use crate::output::Output;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use marquee_catalog::{format_rating, ImageUrls, PosterSize};
use marquee_core::WatchlistStore;
use marquee_models::{CatalogItem, PagedResponse};
use serde_json::{json, Value};

/// Shown next to titles that are already on the watchlist
pub const SAVED_MARKER: &str = "★";

pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn items_table(items: &[CatalogItem], store: &WatchlistStore) -> Table {
    let mut table = new_table(&["", "Title", "Year", "Type", "Rating", "ID"]);
    for item in items {
        let saved = store.contains(item.id(), item.kind());
        let marker = if saved {
            Cell::new(SAVED_MARKER).fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(item.display_title()),
            Cell::new(item.year().unwrap_or("-")),
            Cell::new(item.kind().label()),
            Cell::new(format_rating(item.vote_average())),
            Cell::new(item.id()),
        ]);
    }
    table
}

pub fn item_json(item: &CatalogItem, store: &WatchlistStore, images: &ImageUrls) -> Value {
    json!({
        "id": item.id(),
        "type": item.kind(),
        "title": item.display_title(),
        "release_date": item.release_date(),
        "vote_average": item.vote_average(),
        "overview": item.overview(),
        "poster_url": images.poster_url(item.poster_path(), PosterSize::W342),
        "in_watchlist": store.contains(item.id(), item.kind()),
    })
}

pub fn listing_json(title: &str, listing: &PagedResponse<CatalogItem>, store: &WatchlistStore, images: &ImageUrls) -> Value {
    json!({
        "title": title,
        "page": listing.page,
        "total_pages": listing.total_pages,
        "total_results": listing.total_results,
        "results": listing.results.iter().map(|i| item_json(i, store, images)).collect::<Vec<_>>(),
    })
}

/// Heading plus table for human output; the listing object for JSON
pub fn print_listing(
    output: &Output,
    title: &str,
    listing: &PagedResponse<CatalogItem>,
    store: &WatchlistStore,
    images: &ImageUrls,
) {
    if !output.is_human() {
        output.json(&listing_json(title, listing, store, images));
        return;
    }

    output.heading(title);
    if listing.is_empty() {
        output.info("  Nothing to show");
        return;
    }
    output.table(&items_table(&listing.results, store));
    if listing.total_pages > 1 {
        output.info(format!("Page {} of {}", listing.page, listing.total_pages));
    }
}
