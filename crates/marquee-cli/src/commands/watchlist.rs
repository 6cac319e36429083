use super::details::load_movie;
use super::progress::{is_interactive, FetchSpinner};
use super::{prompts, render, report_persist, AppContext};
use crate::output::Output;
use crate::WatchlistCommands;
use color_eyre::Result;
use comfy_table::Cell;
use marquee_catalog::{CatalogResult, CatalogSource};
use marquee_core::WatchlistStore;
use marquee_models::{MediaKind, WatchlistEntry};
use serde_json::json;
use tracing::info;

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let mut store = ctx.open_watchlist(output);

    match cmd {
        WatchlistCommands::List => list(ctx, &store, output),
        WatchlistCommands::Add { kind, id, title, poster_path } => {
            let kind = MediaKind::from(kind);
            if let Some(existing) = store.get(id, kind) {
                output.info(format!("{} is already on your watchlist", existing.title));
                return Ok(());
            }
            let entry = resolve_entry(ctx, kind, id, title, poster_path, output).await?;
            let title = entry.title.clone();
            store.add(entry);
            report_persist(&store, output);
            output.success(format!("Added {} to your watchlist", title));
            Ok(())
        }
        WatchlistCommands::Remove { kind, id } => {
            let kind = MediaKind::from(kind);
            let title = store.get(id, kind).map(|e| e.title.clone());
            if store.remove(id, kind) {
                report_persist(&store, output);
                output.success(format!("Removed {} from your watchlist", title.unwrap_or_else(|| id.to_string())));
            } else {
                output.info(format!("{} {} is not on your watchlist", kind.label(), id));
            }
            Ok(())
        }
        WatchlistCommands::Toggle { kind, id, title, poster_path } => {
            let kind = MediaKind::from(kind);
            let entry = match store.get(id, kind) {
                Some(existing) => existing.clone(),
                None => resolve_entry(ctx, kind, id, title, poster_path, output).await?,
            };
            let title = entry.title.clone();
            let now_saved = store.toggle(entry);
            report_persist(&store, output);
            if now_saved {
                output.success(format!("Added {} to your watchlist", title));
            } else {
                output.success(format!("Removed {} from your watchlist", title));
            }
            Ok(())
        }
        WatchlistCommands::Contains { kind, id } => {
            let kind = MediaKind::from(kind);
            let saved = store.contains(id, kind);
            if output.is_human() {
                let answer = if saved { "is" } else { "is not" };
                output.info(format!("{} {} {} on your watchlist", kind.label(), id, answer));
            } else {
                output.json(&json!({ "id": id, "type": kind, "in_watchlist": saved }));
            }
            Ok(())
        }
        WatchlistCommands::Clear { yes } => clear(&mut store, yes, output),
    }
}

fn list(ctx: &AppContext, store: &WatchlistStore, output: &Output) -> Result<()> {
    if !output.is_human() {
        let images = ctx.image_urls();
        let entries: Vec<_> = store
            .entries()
            .iter()
            .map(|e| {
                json!({
                    "id": e.id,
                    "type": e.kind,
                    "title": e.title,
                    "poster_path": e.poster_path,
                    "poster_url": images.poster_url(e.poster_path.as_deref(), marquee_catalog::PosterSize::W342),
                })
            })
            .collect();
        output.json(&json!({ "slot": store.slot(), "entries": entries }));
        return Ok(());
    }

    if store.is_empty() {
        output.info("Your watchlist is empty. Add titles with: marquee watchlist add <movie|tv> <id>");
        return Ok(());
    }

    output.heading(format!("Watchlist ({})", store.len()));
    let mut table = render::new_table(&["#", "Title", "Type", "ID"]);
    for (i, entry) in store.entries().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.title),
            Cell::new(entry.kind.label()),
            Cell::new(entry.id),
        ]);
    }
    output.table(&table);
    Ok(())
}

fn clear(store: &mut WatchlistStore, yes: bool, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.info("Your watchlist is already empty");
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(color_eyre::eyre::eyre!("Refusing to clear the watchlist without --yes"));
        }
        let prompt = format!("Remove all {} titles from your watchlist?", store.len());
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Cancelled");
            return Ok(());
        }
    }

    let count = store.len();
    store.clear();
    report_persist(store, output);
    info!("Cleared {} watchlist entries", count);
    output.success(format!("Removed {} titles from your watchlist", count));
    Ok(())
}

/// Snapshot for a title not yet saved. A given title is used as-is; otherwise
/// the catalog is asked for the details.
async fn resolve_entry(
    ctx: &AppContext,
    kind: MediaKind,
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    output: &Output,
) -> Result<WatchlistEntry> {
    if let Some(title) = title {
        return Ok(WatchlistEntry::new(id, kind, title, poster_path));
    }

    let catalog = ctx.catalog()?;
    let spinner = FetchSpinner::start(output, "Looking up title...");
    let entry = fetch_entry(catalog.as_ref(), kind, id).await;
    spinner.finish();

    entry.map_err(|e| {
        if e.is_not_found() {
            color_eyre::eyre::eyre!("No {} with id {} in the catalog", kind.label().to_lowercase(), id)
        } else {
            color_eyre::eyre::eyre!("Could not look up {} {}: {}", kind.as_path(), id, e)
        }
    })
}

pub async fn fetch_entry(catalog: &dyn CatalogSource, kind: MediaKind, id: u64) -> CatalogResult<WatchlistEntry> {
    match kind {
        MediaKind::Movie => Ok(load_movie(catalog, id).await?.to_watchlist_entry()),
        MediaKind::Series => Ok(catalog.tv_details(id).await?.to_watchlist_entry()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::demo_context;
    use crate::output::OutputFormat;
    use crate::KindArg;
    use marquee_catalog::MockCatalog;

    fn quiet() -> Output {
        Output::new(OutputFormat::Json, true)
    }

    #[tokio::test]
    async fn test_fetch_entry_snapshots_catalog_data() {
        let catalog = MockCatalog::new().unwrap();
        let entry = fetch_entry(&catalog, MediaKind::Movie, 2).await.unwrap();
        assert_eq!(entry.title, "Inception");
        assert_eq!(entry.kind, MediaKind::Movie);

        let show = fetch_entry(&catalog, MediaKind::Series, 101).await.unwrap();
        assert_eq!(show.kind, MediaKind::Series);

        assert!(fetch_entry(&catalog, MediaKind::Series, 2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_add_toggle_remove_persist_to_the_slot() {
        let (_dir, ctx) = demo_context();
        let output = quiet();

        run_watchlist(&ctx, WatchlistCommands::Add { kind: KindArg::Movie, id: 2, title: None, poster_path: None }, &output)
            .await
            .unwrap();
        // Adding twice leaves one entry
        run_watchlist(&ctx, WatchlistCommands::Add { kind: KindArg::Movie, id: 2, title: None, poster_path: None }, &output)
            .await
            .unwrap();
        run_watchlist(
            &ctx,
            WatchlistCommands::Toggle { kind: KindArg::Tv, id: 42, title: Some("Offline Show".to_string()), poster_path: None },
            &output,
        )
        .await
        .unwrap();

        let store = ctx.open_watchlist(&output);
        let titles: Vec<&str> = store.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Offline Show"]);

        run_watchlist(&ctx, WatchlistCommands::Toggle { kind: KindArg::Tv, id: 42, title: None, poster_path: None }, &output)
            .await
            .unwrap();
        run_watchlist(&ctx, WatchlistCommands::Remove { kind: KindArg::Movie, id: 2 }, &output)
            .await
            .unwrap();
        assert!(ctx.open_watchlist(&output).is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_title_fails_without_saving() {
        let (_dir, ctx) = demo_context();
        let output = quiet();
        let err = run_watchlist(&ctx, WatchlistCommands::Add { kind: KindArg::Movie, id: 999, title: None, poster_path: None }, &output)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No movie with id 999"));
        assert!(ctx.open_watchlist(&output).is_empty());
    }

    #[tokio::test]
    async fn test_clear_with_yes() {
        let (_dir, ctx) = demo_context();
        let output = quiet();
        run_watchlist(&ctx, WatchlistCommands::Add { kind: KindArg::Movie, id: 1, title: None, poster_path: None }, &output)
            .await
            .unwrap();
        run_watchlist(&ctx, WatchlistCommands::Clear { yes: true }, &output).await.unwrap();
        assert!(ctx.open_watchlist(&output).is_empty());
    }
}
