use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{browse, clear, config, details, search, watchlist, AppContext};
use marquee_catalog::ListCategory;
use marquee_models::MediaKind;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - browse movies and TV shows and keep a watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Movie or TV show, as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Movie,
    #[value(aliases = ["series", "show"])]
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Series,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Trending,
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    TrendingTv,
    PopularTv,
    TopRatedTv,
}

impl From<CategoryArg> for ListCategory {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Trending => ListCategory::TrendingMovies,
            CategoryArg::Popular => ListCategory::PopularMovies,
            CategoryArg::TopRated => ListCategory::TopRatedMovies,
            CategoryArg::NowPlaying => ListCategory::NowPlayingMovies,
            CategoryArg::Upcoming => ListCategory::UpcomingMovies,
            CategoryArg::TrendingTv => ListCategory::TrendingTv,
            CategoryArg::PopularTv => ListCategory::PopularTv,
            CategoryArg::TopRatedTv => ListCategory::TopRatedTv,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the home screen: one section per featured listing
    #[command(long_about = "Fetch trending, popular, top rated, now playing and upcoming movies plus popular TV shows concurrently and print a section for each. Titles already on your watchlist are marked.")]
    Home,

    /// Show a single catalog listing
    Browse {
        #[arg(value_enum)]
        category: CategoryArg,

        /// Page number (starting at 1)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search movies and TV shows by title
    Search {
        /// Search terms
        #[arg(num_args = 0..)]
        query: Vec<String>,

        /// Page number (starting at 1)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show details, cast and trailer for a movie or TV show
    Details {
        #[arg(value_enum)]
        kind: KindArg,

        id: u64,

        /// Also list similar movies
        #[arg(long, action = ArgAction::SetTrue)]
        similar: bool,
    },

    /// Manage the watchlist
    #[command(long_about = "List and edit the local watchlist. Running without a subcommand lists the saved titles.")]
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },

    /// Manage configuration and the TMDB API key
    #[command(long_about = "View or modify Marquee settings. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },

    /// Remove the saved watchlist, configuration or credentials
    #[command(long_about = "Delete stored data. Use --watchlist to empty the watchlist slot, --config to remove config.toml and credentials.toml, or --all for both.")]
    Clear {
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        config: bool,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List saved titles in the order they were added
    List,

    /// Add a title; details are fetched from the catalog unless --title is given
    Add {
        #[arg(value_enum)]
        kind: KindArg,

        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, requires = "title")]
        poster_path: Option<String>,
    },

    /// Remove a title
    Remove {
        #[arg(value_enum)]
        kind: KindArg,

        id: u64,
    },

    /// Add the title if missing, remove it otherwise
    Toggle {
        #[arg(value_enum)]
        kind: KindArg,

        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, requires = "title")]
        poster_path: Option<String>,
    },

    /// Report whether a title is on the watchlist
    Contains {
        #[arg(value_enum)]
        kind: KindArg,

        id: u64,
    },

    /// Remove every title
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(long_about = "Display the current configuration. The API key is masked unless --full is given.")]
    Show {
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    #[command(long_about = "Store a TMDB API key in the credentials file. You'll need an API key from https://www.themoviedb.org/settings/api. Prompts for the key when it is not passed on the command line.")]
    SetApiKey {
        #[arg(long)]
        key: Option<String>,
    },

    #[command(long_about = "Write a config.toml with default settings. Use --mock to start in demo mode without an API key.")]
    Init {
        #[arg(long, action = ArgAction::SetTrue)]
        mock: bool,

        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    #[command(long_about = "Print the directories and files Marquee reads and writes.")]
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let output = output::Output::new(cli.output, cli.quiet);

    let ctx = match AppContext::load() {
        Ok(ctx) => ctx,
        Err(e) => {
            logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            output.error(format!("Failed to load configuration: {}", e));
            return Err(e);
        }
    };

    logging::init_logging_with_file(cli.verbose, cli.quiet, ctx.config.logging.file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match cli.command {
        Commands::Home => browse::run_home(&ctx, &output).await,
        Commands::Browse { category, page } => browse::run_browse(&ctx, category.into(), page, &output).await,
        Commands::Search { query, page } => search::run_search(&ctx, &query.join(" "), page, &output).await,
        Commands::Details { kind, id, similar } => details::run_details(&ctx, kind.into(), id, similar, &output).await,
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List);
            watchlist::run_watchlist(&ctx, cmd, &output).await
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(ctx, cmd, &output)
        }
        Commands::Clear { all, watchlist, config, yes } => clear::run_clear(&ctx, all, watchlist, config, yes, &output),
    }
}
