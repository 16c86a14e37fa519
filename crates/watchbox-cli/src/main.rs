//! watchbox - movie watchlist and catalog browser.

/// Application configuration (TOML).
mod config;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use tokio::sync::broadcast;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path};
use watchbox_api::tmdb::{Movie, TmdbApi, TmdbClient, image_url};
use watchbox_core::credentials::{PLACEHOLDER_API_KEY, build_client};
use watchbox_core::detail::{DetailPolicy, MovieDetail, MovieDetailAggregator};
use watchbox_core::feed::HomeFeedLoader;
use watchbox_core::search::{SearchService, is_suggestible};
use watchbox_core::watchlist::{AddOutcome, RemoveOutcome, WatchlistStore};
use watchbox_core::{Notice, NoticeLevel, Notices};
use watchbox_db::{Connection, open_db};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file.
    Init,
    /// Show the home feed shelves.
    Home,
    /// Search the catalog.
    Search(SearchArgs),
    /// Show search suggestions for a partial query.
    Suggest(SuggestArgs),
    /// Show full details for a movie.
    Details(DetailsArgs),
    /// Manage the watchlist.
    Watchlist(WatchlistCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "Inception").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `suggest` subcommand.
#[derive(clap::Args)]
struct SuggestArgs {
    /// Partial query (at least 2 characters).
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Show available sections even if some lookups fail.
    #[arg(long)]
    lenient: bool,
    /// Open the trailer in the system browser.
    #[arg(long)]
    open_trailer: bool,
}

/// Arguments for the `watchlist` subcommand.
#[derive(clap::Args)]
struct WatchlistCommand {
    /// Watchlist subcommand to run.
    #[command(subcommand)]
    command: WatchlistSubcommands,
}

/// Available watchlist subcommands.
#[derive(Subcommand)]
enum WatchlistSubcommands {
    /// List saved movies.
    List,
    /// Add a movie by TMDB ID.
    Add(WatchlistAddArgs),
    /// Remove a movie by TMDB ID.
    Remove(WatchlistRemoveArgs),
}

/// Arguments for the `watchlist add` subcommand.
#[derive(clap::Args)]
struct WatchlistAddArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `watchlist remove` subcommand.
#[derive(clap::Args)]
struct WatchlistRemoveArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}

/// Loads the config file and applies the `TMDB_API_KEY` override.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file cannot be parsed.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
}

/// Builds the catalog client, refusing to run without a usable API key.
///
/// # Errors
///
/// Returns an error if the API key is missing or the client fails to build.
fn build_catalog(config: &AppConfig) -> Result<Arc<TmdbClient>> {
    let client = build_client(&config.catalog_settings())?;
    Ok(Arc::new(client))
}

/// Opens the watchlist in the data directory.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn open_watchlist(
    dir: Option<&PathBuf>,
    config: &AppConfig,
    notices: &Notices,
) -> Result<WatchlistStore<Connection>> {
    let conn = open_db(dir).context("failed to open database")?;
    Ok(WatchlistStore::open(
        conn,
        config.watchlist.storage_key.as_str(),
        notices.clone(),
    ))
}

/// Logs every notice published so far.
fn drain_notices(rx: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = rx.try_recv() {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
}

/// Formats a movie as one listing line.
fn movie_line(movie: &Movie) -> String {
    format!(
        "{:>8}  {} ({})  ★ {:.1}",
        movie.id,
        movie.title,
        movie
            .release_year()
            .map_or_else(|| String::from("N/A"), |y| y.to_string()),
        movie.vote_average,
    )
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
#[instrument(skip_all)]
fn run_init(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() {
        tracing::info!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    let mut config = AppConfig::default();
    config.tmdb.api_key = Some(String::from(PLACEHOLDER_API_KEY));
    config.save(&config_path)?;

    tracing::info!("Wrote {}", config_path.display());
    tracing::info!("Set tmdb.api_key to your key from themoviedb.org (or export {API_KEY_ENV}).");
    Ok(())
}

/// Runs the `home` subcommand.
///
/// # Errors
///
/// Returns an error if the config is invalid or the API key is missing.
#[instrument(skip_all)]
async fn run_home(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog(&config)?;
    let notices = Notices::new();
    let mut rx = notices.subscribe();

    let loader = HomeFeedLoader::new(client, notices);
    let feed = loader.load().await;

    for shelf in &feed.shelves {
        let marker = if shelf.stale { " (unavailable)" } else { "" };
        tracing::info!("== {} ({}){marker}", shelf.kind.title(), shelf.movies.len());
        for movie in &shelf.movies {
            tracing::info!("{}", movie_line(movie));
        }
    }
    drain_notices(&mut rx);

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the API key is missing or the request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog(&config)?;
    let notices = Notices::new();
    let mut rx = notices.subscribe();

    let service = SearchService::new(client, notices);
    let result = service.search(&args.query).await;
    drain_notices(&mut rx);

    let Some(movies) = result? else {
        tracing::info!("Enter a search query.");
        return Ok(());
    };

    for movie in &movies {
        tracing::info!("{}", movie_line(movie));
    }
    tracing::info!("Total: {} movies", movies.len());

    Ok(())
}

/// Runs the `suggest` subcommand.
///
/// # Errors
///
/// Returns an error if the API key is missing.
#[instrument(skip_all)]
async fn run_suggest(args: &SuggestArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog(&config)?;

    if !is_suggestible(&args.query) {
        tracing::info!("Type at least 2 characters to see suggestions.");
        return Ok(());
    }

    let debounce = config.search.debounce();
    let notices = Notices::new();
    let mut notice_rx = notices.subscribe();
    let service = SearchService::new(client, notices).with_debounce(debounce);
    let mut rx = service.subscribe();
    service.suggest(&args.query);

    let deadline = debounce
        .saturating_add(Duration::from_secs(config.tmdb.timeout_secs))
        .saturating_add(Duration::from_secs(1));
    let settled = tokio::time::timeout(deadline, async {
        tokio::select! {
            changed = rx.changed() => changed.is_ok(),
            notice = notice_rx.recv() => {
                if let Ok(notice) = notice {
                    tracing::error!("{}", notice.message);
                    drain_notices(&mut notice_rx);
                }
                false
            }
        }
    })
    .await;
    if !matches!(settled, Ok(true)) {
        tracing::info!("No suggestions.");
        return Ok(());
    }

    let suggestions = rx.borrow_and_update().clone();
    if suggestions.is_empty() {
        tracing::info!("No suggestions.");
    }
    for suggestion in &suggestions {
        tracing::info!(
            "{:>8}  {} ({})",
            suggestion.id,
            suggestion.title,
            suggestion.year_label()
        );
    }

    Ok(())
}

/// Logs the aggregated detail record.
fn print_detail(detail: &MovieDetail, image_base: &str, in_watchlist: bool) {
    let d = &detail.details;
    let year = d
        .release_year()
        .map_or_else(|| String::from("N/A"), |y| y.to_string());
    tracing::info!("{} ({year})", d.title);
    if let Some(tagline) = &d.tagline {
        tracing::info!("  \"{tagline}\"");
    }
    tracing::info!(
        "  ★ {:.1} ({} votes)  {} min  {}",
        d.vote_average,
        d.vote_count,
        d.runtime.map_or_else(|| String::from("-"), |r| r.to_string()),
        d.status.as_deref().unwrap_or("-"),
    );
    let genres: Vec<&str> = d.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("  Genres: {}", genres.join(", "));
    if let Some(poster) = image_url(image_base, d.poster_path.as_deref()) {
        tracing::info!("  Poster: {poster}");
    }
    tracing::info!("  In watchlist: {}", if in_watchlist { "yes" } else { "no" });
    if !d.overview.is_empty() {
        tracing::info!("  {}", d.overview);
    }

    if let Some(director) = &detail.director {
        tracing::info!("Director: {}", director.name);
    }
    if !detail.writers.is_empty() {
        let writers: Vec<&str> = detail.writers.iter().map(|w| w.name.as_str()).collect();
        tracing::info!("Writers: {}", writers.join(", "));
    }
    if !detail.cast.is_empty() {
        tracing::info!("Cast:");
        for member in &detail.cast {
            tracing::info!("  {} as {}", member.name, member.character);
        }
    }
    if let Some(url) = detail.trailer.as_ref().and_then(|t| t.youtube_embed_url()) {
        tracing::info!("Trailer: {url}");
    }

    tracing::info!(
        "Budget: ${}  Revenue: ${}",
        d.budget,
        d.revenue
    );
    let languages: Vec<&str> = d
        .spoken_languages
        .iter()
        .map(|l| l.english_name.as_str())
        .collect();
    tracing::info!("Languages: {}", languages.join(", "));
    let countries: Vec<&str> = d
        .production_countries
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    tracing::info!("Countries: {}", countries.join(", "));
    let companies: Vec<&str> = d
        .production_companies
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    tracing::info!("Production: {}", companies.join(", "));

    if !detail.reviews.is_empty() {
        tracing::info!("Reviews:");
        for review in &detail.reviews {
            let rating = review
                .rating()
                .map_or_else(String::new, |r| format!(" ★ {r:.1}"));
            tracing::info!("  {}{rating}", review.author);
            tracing::info!("    {}", review.content);
        }
    }
    if !detail.similar.is_empty() {
        tracing::info!("Similar:");
        for movie in &detail.similar {
            tracing::info!("{}", movie_line(movie));
        }
    }
    for section in &detail.missing {
        tracing::warn!("{section} unavailable");
    }
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the API key is missing, aggregation fails, or the
/// trailer cannot be opened.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog(&config)?;
    let notices = Notices::new();
    let mut rx = notices.subscribe();

    let policy = if args.lenient {
        DetailPolicy::Lenient
    } else {
        DetailPolicy::Strict
    };
    let aggregator = MovieDetailAggregator::new(client, notices.clone()).with_policy(policy);
    let result = aggregator.fetch_details(args.id).await;
    drain_notices(&mut rx);
    let detail = result?;

    let store = open_watchlist(dir, &config, &notices)?;
    print_detail(&detail, &config.tmdb.image_base_url, store.contains(args.id));

    if args.open_trailer {
        match detail.trailer.as_ref().and_then(|t| t.youtube_embed_url()) {
            Some(url) => open::that(&url).with_context(|| format!("failed to open {url}"))?,
            None => tracing::info!("No trailer available."),
        }
    }

    Ok(())
}

/// Runs the `watchlist list` subcommand.
///
/// # Errors
///
/// Returns an error if config or DB operations fail.
#[instrument(skip_all)]
fn run_watchlist_list(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let store = open_watchlist(dir, &config, &Notices::new())?;

    if store.is_empty() {
        tracing::info!("Your watchlist is empty. Add movies with `watchlist add --id <ID>`.");
        return Ok(());
    }

    tracing::info!("Watchlist ({}):", store.len());
    for movie in store.movies() {
        tracing::info!("{}", movie_line(movie));
    }

    Ok(())
}

/// Runs the `watchlist add` subcommand.
///
/// # Errors
///
/// Returns an error if the API key is missing, the lookup fails, or the
/// watchlist cannot be saved.
#[instrument(skip_all)]
async fn run_watchlist_add(args: &WatchlistAddArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let notices = Notices::new();
    let mut rx = notices.subscribe();
    let mut store = open_watchlist(dir, &config, &notices)?;

    let client = build_catalog(&config)?;
    let details = client
        .movie_details(args.id)
        .await
        .with_context(|| format!("failed to look up movie {}", args.id))?;

    let result = store.add(details.summary());
    drain_notices(&mut rx);
    if result? == AddOutcome::Added {
        tracing::debug!(movie_id = args.id, total = store.len(), "watchlist updated");
    }

    Ok(())
}

/// Asks the user to confirm, defaulting to no.
///
/// Without an interactive terminal nothing is confirmed; pass `--yes` instead.
///
/// # Errors
///
/// Returns an error if the prompt cannot be read.
fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        tracing::warn!("not an interactive terminal, pass --yes to confirm");
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("failed to read confirmation")
}

/// Runs the `watchlist remove` subcommand.
///
/// # Errors
///
/// Returns an error if DB operations fail or the watchlist cannot be saved.
#[instrument(skip_all)]
fn run_watchlist_remove(args: &WatchlistRemoveArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let notices = Notices::new();
    let mut rx = notices.subscribe();
    let mut store = open_watchlist(dir, &config, &notices)?;

    let Some(movie) = store.find(args.id) else {
        tracing::info!("Movie {} is not in your watchlist.", args.id);
        return Ok(());
    };

    let prompt = format!(
        "Are you sure you want to remove \"{}\" from your watchlist?",
        movie.title
    );
    if !args.yes && !confirm(&prompt)? {
        tracing::info!("Cancelled.");
        return Ok(());
    }

    let result = store.remove(args.id);
    drain_notices(&mut rx);
    if let RemoveOutcome::Removed(movie) = result? {
        tracing::debug!(movie_id = movie.id, remaining = store.len(), "watchlist updated");
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Init => run_init(dir),
        Commands::Home => run_home(dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Suggest(args) => run_suggest(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Watchlist(wl) => match wl.command {
            WatchlistSubcommands::List => run_watchlist_list(dir),
            WatchlistSubcommands::Add(args) => run_watchlist_add(&args, dir).await,
            WatchlistSubcommands::Remove(args) => run_watchlist_remove(&args, dir),
        },
    }
}
