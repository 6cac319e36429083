use super::progress::is_interactive;
use super::{prompts, AppContext};
use crate::output::Output;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use marquee_core::{FileStorage, KeyValueStorage};
use std::fs;
use std::path::Path;

pub fn run_clear(ctx: &AppContext, all: bool, watchlist: bool, config: bool, yes: bool, output: &Output) -> Result<()> {
    let clear_watchlist = all || watchlist;
    let clear_config = all || config;

    if !clear_watchlist && !clear_config {
        output.warn("No clear option specified. Use --watchlist, --config, or --all");
        output.info("\nExample: marquee clear --watchlist");
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(eyre!("Refusing to delete data without --yes"));
        }
        let what = match (clear_watchlist, clear_config) {
            (true, true) => "your watchlist, configuration and API key",
            (true, false) => "your watchlist",
            _ => "your configuration and API key",
        };
        if !prompts::prompt_yes_no(&format!("This permanently deletes {}. Continue?", what), false)? {
            output.info("Cancelled");
            return Ok(());
        }
    }

    if clear_watchlist {
        clear_watchlist_slot(ctx, output)?;
    }
    if clear_config {
        remove_file(&ctx.paths.config_file(), "configuration", output)?;
        remove_file(&ctx.paths.credentials_file(), "credentials", output)?;
    }
    Ok(())
}

fn clear_watchlist_slot(ctx: &AppContext, output: &Output) -> Result<()> {
    let storage = FileStorage::new(ctx.paths.storage_dir());
    let slot = &ctx.config.watchlist.slot;
    let path = storage.slot_path(slot);
    if !path.exists() {
        output.info(format!("No saved watchlist in slot '{}'", slot));
        return Ok(());
    }
    storage
        .remove(slot)
        .wrap_err_with(|| format!("Failed to remove watchlist at {}", path.display()))?;
    output.success(format!("Cleared watchlist: {}", path.display()));
    Ok(())
}

fn remove_file(path: &Path, label: &str, output: &Output) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).wrap_err_with(|| format!("Failed to remove {} at {}", label, path.display()))?;
        output.success(format!("Cleared {}: {}", label, path.display()));
    } else {
        output.info(format!("No {} found to clear", label));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::demo_context;
    use crate::output::OutputFormat;
    use marquee_models::{MediaKind, WatchlistEntry};

    #[test]
    fn test_clear_all_removes_slot_and_files() {
        let (_dir, ctx) = demo_context();
        let output = Output::new(OutputFormat::Json, true);

        let mut store = ctx.open_watchlist(&output);
        store.add(WatchlistEntry::new(1, MediaKind::Movie, "The Dark Knight", None));
        ctx.config.save_to_file(&ctx.paths.config_file()).unwrap();
        let slot_file = FileStorage::new(ctx.paths.storage_dir()).slot_path(store.slot());
        assert!(slot_file.exists());

        run_clear(&ctx, true, false, false, true, &output).unwrap();
        assert!(!slot_file.exists());
        assert!(!ctx.paths.config_file().exists());
        assert!(ctx.open_watchlist(&output).is_empty());
    }

    #[test]
    fn test_clear_without_options_is_a_no_op() {
        let (_dir, ctx) = demo_context();
        let output = Output::new(OutputFormat::Json, true);
        ctx.config.save_to_file(&ctx.paths.config_file()).unwrap();
        run_clear(&ctx, false, false, false, true, &output).unwrap();
        assert!(ctx.paths.config_file().exists());
    }
}
