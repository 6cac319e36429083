use super::{prompts, render, AppContext};
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use marquee_config::{Config, API_KEY_ENV};
use marquee_core::FileStorage;
use serde_json::json;

pub fn run_config(mut ctx: AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(&ctx, full, output),
        ConfigCommands::SetApiKey { key } => set_api_key(&mut ctx, key, output),
        ConfigCommands::Init { mock, force } => init_config(&ctx, mock, force, output),
        ConfigCommands::Path => show_paths(&ctx, output),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    match (s.get(..2), s.get(s.len() - 2..)) {
        (Some(head), Some(tail)) => format!("{}***{}", head, tail),
        _ => "*".repeat(s.chars().count()),
    }
}

/// Where the effective API key comes from, if anywhere
fn api_key_source(ctx: &AppContext) -> Option<&'static str> {
    let key = ctx.config.effective_api_key(&ctx.credentials)?;
    if std::env::var(API_KEY_ENV).ok().as_deref().map(str::trim) == Some(key.as_str()) {
        Some("environment")
    } else if ctx.credentials.get_tmdb_api_key().map(|k| k.trim()) == Some(key.as_str()) {
        Some("credentials file")
    } else {
        Some("config file")
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let key = config.effective_api_key(&ctx.credentials);
    let shown_key = match &key {
        Some(k) if full => k.clone(),
        Some(k) => mask_string(k),
        None => "<not set>".to_string(),
    };
    let storage_file = FileStorage::new(ctx.paths.storage_dir()).slot_path(&config.watchlist.slot);

    if !output.is_human() {
        output.json(&json!({
            "config_file": ctx.paths.config_file(),
            "config_file_exists": ctx.paths.config_file().exists(),
            "tmdb": {
                "api_key": key.as_ref().map(|_| shown_key.clone()),
                "api_key_source": api_key_source(ctx),
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
                "use_mock_data": config.tmdb.use_mock_data,
            },
            "watchlist": {
                "slot": config.watchlist.slot,
                "file": storage_file,
            },
            "logging": {
                "file": config.logging.file,
            },
        }));
        return Ok(());
    }

    output.heading("Configuration");
    let mut table = render::new_table(&["Setting", "Value"]);
    let config_file = ctx.paths.config_file();
    let config_note = if config_file.exists() { "" } else { " (not created, using defaults)" };
    table.add_row(vec![Cell::new("Config file"), Cell::new(format!("{}{}", config_file.display(), config_note))]);
    let key_cell = match api_key_source(ctx) {
        Some(source) => format!("{} (from {})", shown_key, source),
        None => shown_key,
    };
    table.add_row(vec![Cell::new("TMDB API key"), Cell::new(key_cell)]);
    table.add_row(vec![Cell::new("TMDB base URL"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("Image base URL"), Cell::new(&config.tmdb.image_base_url)]);
    table.add_row(vec![
        Cell::new("Demo data"),
        Cell::new(if config.tmdb.use_mock_data { "on" } else { "off" }),
    ]);
    table.add_row(vec![Cell::new("Watchlist slot"), Cell::new(&config.watchlist.slot)]);
    table.add_row(vec![Cell::new("Watchlist file"), Cell::new(storage_file.display())]);
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());
    table.add_row(vec![Cell::new("Log output"), Cell::new(log_file)]);
    output.table(&table);

    if !config.is_catalog_configured(&ctx.credentials) {
        output.warn("No TMDB API key set. Run 'marquee config set-api-key' or 'marquee config init --mock'");
    }
    if let Err(e) = config.validate() {
        output.warn(format!("Configuration problem: {:#}", e));
    }
    Ok(())
}

fn set_api_key(ctx: &mut AppContext, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key.trim().to_string(),
        None => {
            output.info("Get an API key at https://www.themoviedb.org/settings/api");
            prompts::prompt_api_key()?
        }
    };
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    ctx.paths.ensure_directories().map_err(|e| eyre!("{:#}", e))?;
    ctx.credentials.set_tmdb_api_key(key.clone());
    ctx.credentials.save().map_err(|e| eyre!("Failed to save credentials: {:#}", e))?;
    output.success(format!(
        "TMDB API key {} saved to {}",
        mask_string(&key),
        ctx.credentials.path().display()
    ));

    if std::env::var_os(API_KEY_ENV).is_some() {
        output.warn(format!("{} is set and takes precedence over the saved key", API_KEY_ENV));
    }
    if ctx.config.tmdb.use_mock_data {
        output.info("Demo data is still enabled; set use_mock_data = false in config.toml to use TMDB");
    }
    Ok(())
}

fn init_config(ctx: &AppContext, mock: bool, force: bool, output: &Output) -> Result<()> {
    let path = ctx.paths.config_file();
    if path.exists() && !force {
        output.warn(format!("{} already exists. Use --force to overwrite it", path.display()));
        return Ok(());
    }

    let mut config = Config::default();
    config.tmdb.use_mock_data = mock;
    ctx.paths.ensure_directories().map_err(|e| eyre!("{:#}", e))?;
    config
        .save_to_file(&path)
        .map_err(|e| eyre!("Failed to write {}: {:#}", path.display(), e))?;

    output.success(format!("Wrote {}", path.display()));
    if mock {
        output.info("Demo data enabled; no API key needed");
    } else if !config.is_catalog_configured(&ctx.credentials) {
        output.info("Next: marquee config set-api-key");
    }
    Ok(())
}

fn show_paths(ctx: &AppContext, output: &Output) -> Result<()> {
    let paths = &ctx.paths;
    let rows = [
        ("config_dir", paths.config_dir().to_path_buf()),
        ("config_file", paths.config_file()),
        ("credentials_file", paths.credentials_file()),
        ("data_dir", paths.data_dir().to_path_buf()),
        ("storage_dir", paths.storage_dir()),
        ("log_dir", paths.log_dir().to_path_buf()),
    ];

    if !output.is_human() {
        let value: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(name, path)| (name.to_string(), json!(path)))
            .collect();
        output.json(&serde_json::Value::Object(value));
        return Ok(());
    }

    let mut table = render::new_table(&["Location", "Path"]);
    for (name, path) in &rows {
        table.add_row(vec![Cell::new(name.replace('_', " ")), Cell::new(path.display())]);
    }
    output.table(&table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::demo_context;
    use crate::output::OutputFormat;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let (_dir, ctx) = demo_context();
        let output = Output::new(OutputFormat::Json, true);
        init_config(&ctx, true, false, &output).unwrap();

        let written = Config::load_from_file(&ctx.paths.config_file()).unwrap();
        assert!(written.tmdb.use_mock_data);

        // Existing file is kept without --force
        init_config(&ctx, false, false, &output).unwrap();
        assert!(Config::load_from_file(&ctx.paths.config_file()).unwrap().tmdb.use_mock_data);

        init_config(&ctx, false, true, &output).unwrap();
        assert!(!Config::load_from_file(&ctx.paths.config_file()).unwrap().tmdb.use_mock_data);
    }

    #[test]
    fn test_set_api_key_saves_credentials() {
        let (_dir, mut ctx) = demo_context();
        let output = Output::new(OutputFormat::Json, true);
        set_api_key(&mut ctx, Some("  secret-key  ".to_string()), &output).unwrap();

        let reloaded = marquee_config::CredentialStore::open(ctx.paths.credentials_file()).unwrap();
        assert_eq!(reloaded.get_tmdb_api_key().map(String::as_str), Some("secret-key"));

        assert!(set_api_key(&mut ctx, Some("   ".to_string()), &output).is_err());
    }
}
