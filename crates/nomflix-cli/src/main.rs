//! nomflix - terminal movie and TV browser backed by TMDB.

#![allow(clippy::future_not_send)]

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use futures::future::try_join_all;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{ApiConfig, AppConfig, config_dir, resolve_config_path};
use crate::tui::state::Paging;
use crate::tui::ui::Artwork;
use crate::tui::{BrowseOptions, run_browser};
use nomflix_api::image::ImageResolver;
use nomflix_api::tmdb::{Credential, ListParams, LocalCatalogApi, SearchMultiParams, TmdbClient};
use nomflix_core::catalog::CatalogPage;
use nomflix_core::route::Route;
use nomflix_core::section::{RowId, RowSource};

/// Environment variable holding a TMDB v4 read access token.
const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Environment variable holding a TMDB v3 API key.
const KEY_ENV: &str = "TMDB_API_KEY";

/// Log file written while the browser owns the terminal.
const LOG_FILE_NAME: &str = "nomflix.log";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies and TV shows in an interactive TUI.
    Browse(BrowseArgs),
    /// Fetch catalog rows and print their items.
    List(ListArgs),
    /// Search movies and TV shows.
    Search(SearchArgs),
    /// Manage the config file.
    Config(ConfigCommand),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Route to open (e.g. "/tv", "/movies/550", "/search?keyword=matrix").
    /// Falls back to `browse.start_route` from the config.
    #[arg(long)]
    route: Option<String>,
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Rows to fetch (now-playing, popular-movies, top-rated-movies,
    /// popular-tv, top-rated-tv, on-the-air-tv).
    #[arg(required = true)]
    rows: Vec<RowId>,
    /// Response language (default: `api.language` from the config).
    #[arg(long)]
    language: Option<String>,
    /// Release region for movie rows (default: `api.region` from the config).
    #[arg(long)]
    region: Option<String>,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search keyword (e.g. "파이트 클럽").
    #[arg(long, required = true)]
    keyword: String,
    /// Response language (default: `api.language` from the config).
    #[arg(long)]
    language: Option<String>,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write the default config file.
    Init(ConfigInitArgs),
    /// Print the effective config.
    Show,
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Reads the credential from the environment. The bearer token wins when
/// both variables are set.
///
/// # Errors
///
/// Returns an error if neither variable is set to a non-empty value.
fn resolve_credential() -> Result<Credential> {
    let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    if let Some(token) = non_empty(TOKEN_ENV) {
        return Ok(Credential::BearerToken(token));
    }
    if let Some(key) = non_empty(KEY_ENV) {
        return Ok(Credential::ApiKey(key));
    }
    bail!("{TOKEN_ENV} or {KEY_ENV} environment variable is required")
}

/// Parses the API base URL, keeping its last path segment on join.
fn api_base_url(raw: &str) -> Result<Url> {
    let mut base = String::from(raw);
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).with_context(|| format!("invalid api.base_url: {raw}"))
}

/// Builds a `TmdbClient` from the environment credential and `[api]` config.
///
/// # Errors
///
/// Returns an error if no credential is set, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(api: &ApiConfig) -> Result<TmdbClient> {
    let credential = resolve_credential()?;

    TmdbClient::builder()
        .base_url(api_base_url(&api.base_url)?)
        .credential(credential)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .min_interval(api.min_interval())
        .build()
        .context("failed to build TMDB client")
}

/// Loads the config file.
fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load(path).context("failed to load config")
}

/// List request parameters from CLI overrides and the `[api]` config.
fn list_params(api: &ApiConfig, language: Option<&str>, region: Option<&str>) -> ListParams {
    ListParams::default()
        .language(language.unwrap_or(&api.language))
        .region(region.or_else(|| api.region()).map(String::from))
}

/// Fetches one row.
async fn fetch_row<C: LocalCatalogApi>(
    client: &C,
    row: RowId,
    params: &ListParams,
) -> Result<CatalogPage> {
    let page = match row.source() {
        RowSource::Movie(list) => client
            .movie_list(list, params)
            .await
            .map(CatalogPage::from),
        RowSource::Tv(list) => client.tv_list(list, params).await.map(CatalogPage::from),
    };
    page.with_context(|| format!("failed to fetch row {row}"))
}

/// Runs the `list` subcommand.
///
/// Rows are fetched concurrently.
///
/// # Errors
///
/// Returns an error if the client fails to build or any row request fails.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let client = build_catalog_client(&config.api)?;
    let params = list_params(
        &config.api,
        args.language.as_deref(),
        args.region.as_deref(),
    )
    .page(args.page);
    let images = ImageResolver::new(config.images.base_url.as_str());

    let pages = try_join_all(args.rows.iter().map(|&row| fetch_row(&client, row, &params))).await?;

    for (row, page) in args.rows.iter().zip(pages) {
        tracing::info!(
            "{} [{}]: page {}/{}, {} results",
            row.title(),
            row,
            page.page,
            page.total_pages,
            page.total_results,
        );
        tracing::info!("ID\tTitle\t\t\tImage");
        for item in &page.results {
            tracing::info!(
                "{}\t{}\t{}",
                item.id,
                item.title,
                item.backdrop_path.as_deref().map_or_else(
                    || String::from("-"),
                    |path| images.url(path, Some(&config.images.row_size))
                ),
            );
        }
    }

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let client = build_catalog_client(&config.api)?;
    let params = SearchMultiParams::new(&args.keyword)
        .language(args.language.as_deref().unwrap_or(&config.api.language))
        .page(args.page);

    let response = client
        .search_multi(&params)
        .await
        .context("TMDB search/multi request failed")?;
    let page = CatalogPage::from(response);

    tracing::info!("Total results: {}", page.total_results);
    tracing::info!("ID\tKind\tTitle");
    for item in &page.results {
        tracing::info!("{}\t{}\t{}", item.id, item.media_kind, item.title);
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the route is invalid, the client fails to build,
/// or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let route = args
        .route
        .as_deref()
        .unwrap_or(config.browse.start_route.as_str());
    let initial = Route::parse(route).with_context(|| format!("invalid route '{route}'"))?;
    let client = build_catalog_client(&config.api)?;

    let options = BrowseOptions {
        initial,
        paging: Paging {
            movie_offset: config.browse.movie_offset,
            tv_offset: config.browse.tv_offset,
            search_columns: config.browse.search_columns,
            transition: config.browse.transition(),
        },
        artwork: Artwork::new(
            ImageResolver::new(config.images.base_url.as_str()),
            config.images.detail_size.as_str(),
        ),
        list_params: list_params(&config.api, None, None),
    };

    tracing::info!(route = %options.initial, "Launching TUI...");
    run_browser(Arc::new(client), options)
        .await
        .context("browser TUI failed")?;
    tracing::info!("Browser closed");

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            config_path.display()
        );
    }
    AppConfig::default()
        .save(config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
#[instrument(skip_all)]
fn run_config_show(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let text = toml::to_string_pretty(&config).context("failed to serialize config to TOML")?;
    tracing::info!("Config file: {}", config_path.display());
    for line in text.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "nomflix", &mut io::stdout());
}

/// Chooses where the fmt layer writes: a log file, or stderr.
fn log_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(io::stderr));
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

/// Keeps the OTLP log provider alive until the command finishes.
#[derive(Default)]
struct Telemetry {
    #[cfg(feature = "otel")]
    logger_provider: Option<opentelemetry_sdk::logs::SdkLoggerProvider>,
}

impl Telemetry {
    /// Flushes pending log records.
    fn shutdown(self) {
        #[cfg(feature = "otel")]
        {
            if let Some(provider) = self.logger_provider
                && let Err(err) = provider.shutdown()
            {
                tracing::debug!(%err, "failed to shut down OTLP log provider");
            }
        }
    }
}

/// Targets whose events are kept out of the OTLP log bridge; the exporter
/// itself logs through them.
#[cfg(feature = "otel")]
const EXPORTER_TARGETS: [&str; 4] = ["opentelemetry", "reqwest", "hyper", "h2"];

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_file: Option<&Path>) -> Result<Telemetry> {
    let writer = log_writer(log_file)?;
    let ansi = log_file.is_none();

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
        return Ok(Telemetry::default());
    }

    #[cfg(feature = "otel")]
    {
        use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
        use tracing_subscriber::Layer;
        use tracing_subscriber::filter::filter_fn;

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);
        let otlp_enabled = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok();

        let otel_layer = otlp_enabled
            .then(|| {
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
            })
            .flatten();

        let logger_provider = otlp_enabled
            .then(|| {
                let exporter = opentelemetry_otlp::LogExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                Some(
                    opentelemetry_sdk::logs::SdkLoggerProvider::builder()
                        .with_simple_exporter(exporter)
                        .build(),
                )
            })
            .flatten();
        let log_layer = logger_provider.as_ref().map(|provider| {
            OpenTelemetryTracingBridge::new(provider).with_filter(filter_fn(|metadata| {
                !EXPORTER_TARGETS
                    .iter()
                    .any(|target| metadata.target().starts_with(target))
            }))
        });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .with(log_layer)
            .init();

        Ok(Telemetry { logger_provider })
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = if matches!(cli.command, Commands::Browse(_)) {
        Some(config_dir(cli.dir.as_ref())?.join(LOG_FILE_NAME))
    } else {
        None
    };
    let telemetry = init_tracing(log_file.as_deref())?;

    let config_path =
        resolve_config_path(cli.dir.as_ref()).context("failed to resolve config path")?;
    let result = match cli.command {
        Commands::Browse(args) => run_browse(&args, &config_path).await,
        Commands::List(args) => run_list(&args, &config_path).await,
        Commands::Search(args) => run_search(&args, &config_path).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, &config_path),
            ConfigSubcommands::Show => run_config_show(&config_path),
        },
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    };

    telemetry.shutdown();
    result
}
