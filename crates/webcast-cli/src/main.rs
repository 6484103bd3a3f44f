//! webcast - command-line client for the Webcast media platform API.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_api_key, resolve_config_path};
use webcast_api::webcast::{Endpoint, QueryOptions, WebcastClient, WebcastResponse, redact_key};

/// Environment variable holding the API key.
const API_KEY_ENV: &str = "WEBCAST_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Config directory (default: `$WEBCAST_CONFIG_DIR`, `$XDG_CONFIG_HOME/webcast`, `~/.config/webcast`).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Project API key (overrides `WEBCAST_API_KEY` and the config file).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Report swallowed conditions (malformed XML, error statuses) and log at debug level.
    #[arg(long, global = true)]
    debug: bool,

    /// Print the request URL (key redacted) instead of calling the API.
    #[arg(long, global = true)]
    print_url: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query medias.
    Medias(MediasCommand),
    /// Query channels.
    Channels(ChannelsCommand),
    /// List outputs (encoding profiles).
    Outputs,
    /// Fetch usage reports.
    Report(ReportCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Query options shared by endpoints that accept them.
#[derive(clap::Args)]
struct OptionArgs {
    /// Query option as KEY=VALUE, repeatable, sent in the given order
    /// (e.g. `--opt first=0 --opt limit=10`).
    #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_option)]
    opts: Vec<(String, String)>,
}

impl OptionArgs {
    /// Converts to `QueryOptions`, `None` when empty.
    fn to_options(&self) -> Option<QueryOptions> {
        if self.opts.is_empty() {
            return None;
        }
        Some(self.opts.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }
}

/// Required query options.
#[derive(clap::Args)]
struct RequiredOptionArgs {
    /// Query option as KEY=VALUE, repeatable (e.g. `--opt quarter=1`).
    #[arg(long = "opt", value_name = "KEY=VALUE", required = true, value_parser = parse_option)]
    opts: Vec<(String, String)>,
}

impl RequiredOptionArgs {
    /// Converts to `QueryOptions`.
    fn to_options(&self) -> QueryOptions {
        self.opts.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

/// Arguments for the `medias` subcommand.
#[derive(clap::Args)]
struct MediasCommand {
    /// Medias subcommand to run.
    #[command(subcommand)]
    command: MediasSubcommands,
}

/// Available medias subcommands.
#[derive(Subcommand)]
enum MediasSubcommands {
    /// List medias (`/medias/`).
    List(OptionArgs),
    /// Count medias (`/medias/count/`).
    Count,
    /// Rating summaries (`/medias/ratings/`).
    Ratings(OptionArgs),
    /// View counts (`/medias/views/`).
    Views(OptionArgs),
    /// One media (`/medias/{id}/`).
    Get(MediaIdArgs),
    /// URLs of a media file (`/medias/urls/{file-id}/`).
    FileUrls(FileIdArgs),
    /// Register a view on a media file (`/medias/views/{file-id}/`).
    FileViews(FileViewsArgs),
    /// Rating summary of a media (`/medias/{id}/rating/`).
    Rating(MediaIdArgs),
    /// Related medias (`/medias/{id}/related/`).
    Related(MediaIdArgs),
    /// Thumbnails (`/medias/{id}/thumbs/`).
    Thumbs(MediaIdArgs),
    /// Total views of a media (`/medias/{id}/views/`).
    MediaViews(PlainMediaIdArgs),
    /// URLs by output name (`/medias/urls/{id}/{output}/`).
    Urls(OutputArgs),
    /// Register a view by output name (`/medias/{id}/views/{output}/`).
    OutputViews(OutputViewsArgs),
}

/// Media id with optional query options.
#[derive(clap::Args)]
struct MediaIdArgs {
    /// Media ID.
    #[arg(long, required = true)]
    id: String,
    /// Query options.
    #[command(flatten)]
    options: OptionArgs,
}

/// Media id without options.
#[derive(clap::Args)]
struct PlainMediaIdArgs {
    /// Media ID.
    #[arg(long, required = true)]
    id: String,
}

/// Media file id.
#[derive(clap::Args)]
struct FileIdArgs {
    /// Media file ID.
    #[arg(long, required = true)]
    file_id: String,
}

/// Arguments for `medias file-views`.
#[derive(clap::Args)]
struct FileViewsArgs {
    /// Media file ID.
    #[arg(long, required = true)]
    file_id: String,
    /// Query options.
    #[command(flatten)]
    options: RequiredOptionArgs,
}

/// Media id and output name.
#[derive(clap::Args)]
struct OutputArgs {
    /// Media ID.
    #[arg(long, required = true)]
    id: String,
    /// Output name (e.g. "mp4").
    #[arg(long, required = true)]
    output: String,
}

/// Arguments for `medias output-views`.
#[derive(clap::Args)]
struct OutputViewsArgs {
    /// Media ID.
    #[arg(long, required = true)]
    id: String,
    /// Output name (e.g. "mp4").
    #[arg(long, required = true)]
    output: String,
    /// Query options.
    #[command(flatten)]
    options: RequiredOptionArgs,
}

/// Arguments for the `channels` subcommand.
#[derive(clap::Args)]
struct ChannelsCommand {
    /// Channels subcommand to run.
    #[command(subcommand)]
    command: ChannelsSubcommands,
}

/// Available channels subcommands.
#[derive(Subcommand)]
enum ChannelsSubcommands {
    /// List channels (`/channels/`).
    List(OptionArgs),
    /// Count channels (`/channels/count/`).
    Count,
    /// One channel (`/channels/{id}/`).
    Get(ChannelIdArgs),
}

/// Channel id with optional query options.
#[derive(clap::Args)]
struct ChannelIdArgs {
    /// Channel ID.
    #[arg(long, required = true)]
    id: String,
    /// Query options.
    #[command(flatten)]
    options: OptionArgs,
}

/// Arguments for the `report` subcommand.
#[derive(clap::Args)]
struct ReportCommand {
    /// Report to fetch.
    #[command(subcommand)]
    command: ReportSubcommands,
}

/// Available reports.
#[derive(Subcommand)]
enum ReportSubcommands {
    /// Traffic report.
    Traffic,
    /// Medias report.
    Medias,
    /// Views report.
    Views,
    /// Storage report.
    Storage,
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
    /// Store the API key in the config file.
    SetKey {
        /// Project API key.
        key: String,
    },
    /// Store an API domain override in the config file.
    SetBaseUrl {
        /// API domain (e.g. `http://fast.api.liquidplatform.com`).
        url: String,
    },
    /// Show the config file path and contents (key redacted).
    Show,
}

/// Parses a `KEY=VALUE` query option.
fn parse_option(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((String::from(key), String::from(value))),
        _ => Err(format!("invalid option '{s}': expected KEY=VALUE")),
    }
}

/// Maps a medias subcommand to its endpoint and options.
fn medias_request(cmd: &MediasSubcommands) -> (Endpoint, Option<QueryOptions>) {
    match cmd {
        MediasSubcommands::List(opts) => (Endpoint::Medias, opts.to_options()),
        MediasSubcommands::Count => (Endpoint::MediasCount, None),
        MediasSubcommands::Ratings(opts) => (Endpoint::MediasRatings, opts.to_options()),
        MediasSubcommands::Views(opts) => (Endpoint::MediasViews, opts.to_options()),
        MediasSubcommands::Get(args) => (
            Endpoint::MediaById {
                media_id: args.id.clone(),
            },
            args.options.to_options(),
        ),
        MediasSubcommands::FileUrls(args) => (
            Endpoint::MediaUrlsByFileId {
                media_file_id: args.file_id.clone(),
            },
            None,
        ),
        MediasSubcommands::FileViews(args) => (
            Endpoint::MediaViewsByFileId {
                media_file_id: args.file_id.clone(),
            },
            Some(args.options.to_options()),
        ),
        MediasSubcommands::Rating(args) => (
            Endpoint::MediaRatingById {
                media_id: args.id.clone(),
            },
            args.options.to_options(),
        ),
        MediasSubcommands::Related(args) => (
            Endpoint::MediaRelatedById {
                media_id: args.id.clone(),
            },
            args.options.to_options(),
        ),
        MediasSubcommands::Thumbs(args) => (
            Endpoint::MediaThumbsById {
                media_id: args.id.clone(),
            },
            args.options.to_options(),
        ),
        MediasSubcommands::MediaViews(args) => (
            Endpoint::MediaViewsById {
                media_id: args.id.clone(),
            },
            None,
        ),
        MediasSubcommands::Urls(args) => (
            Endpoint::MediaUrlsByIdAndOutputName {
                media_id: args.id.clone(),
                output_name: args.output.clone(),
            },
            None,
        ),
        MediasSubcommands::OutputViews(args) => (
            Endpoint::MediaViewsByIdAndOutputName {
                media_id: args.id.clone(),
                output_name: args.output.clone(),
            },
            Some(args.options.to_options()),
        ),
    }
}

/// Maps a channels subcommand to its endpoint and options.
fn channels_request(cmd: &ChannelsSubcommands) -> (Endpoint, Option<QueryOptions>) {
    match cmd {
        ChannelsSubcommands::List(opts) => (Endpoint::Channels, opts.to_options()),
        ChannelsSubcommands::Count => (Endpoint::ChannelsCount, None),
        ChannelsSubcommands::Get(args) => (
            Endpoint::ChannelById {
                channel_id: args.id.clone(),
            },
            args.options.to_options(),
        ),
    }
}

/// Maps a report subcommand to its endpoint.
const fn report_endpoint(cmd: &ReportSubcommands) -> Endpoint {
    match cmd {
        ReportSubcommands::Traffic => Endpoint::ReportDetailTraffic,
        ReportSubcommands::Medias => Endpoint::ReportDetailMedias,
        ReportSubcommands::Views => Endpoint::ReportDetailViews,
        ReportSubcommands::Storage => Endpoint::ReportDetailStorage,
    }
}

/// Builds a `WebcastClient` from flag, environment and config.
///
/// # Errors
///
/// Returns an error if no API key is available, the configured base URL is
/// invalid, or the client fails to build.
fn build_webcast_client(api_key: Option<String>, dir: Option<&PathBuf>) -> Result<WebcastClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let key = resolve_api_key(api_key, std::env::var(API_KEY_ENV).ok(), &config)?;

    let mut builder = WebcastClient::builder().api_key(key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(ref base_url) = config.api.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid base_url in config: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build Webcast client")
}

/// Runs one API request and logs the result.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the request fails.
#[instrument(skip_all, fields(endpoint = endpoint.name()))]
async fn run_request(
    cli: &Cli,
    endpoint: Endpoint,
    options: Option<&QueryOptions>,
) -> Result<()> {
    let client = build_webcast_client(cli.api_key.clone(), cli.dir.as_ref())?;
    client.debug(cli.debug);

    if cli.print_url {
        tracing::info!("{}", redact_key(&client.url_for(&endpoint, options)));
        return Ok(());
    }

    let response = client
        .call(endpoint, options)
        .await
        .context("Webcast API request failed")?;

    match &response {
        WebcastResponse::Document(_) | WebcastResponse::Text(_) => {
            for line in response.to_string().lines() {
                tracing::info!("{}", line);
            }
        }
        WebcastResponse::Malformed { error, .. } => {
            tracing::warn!(%error, "Response could not be parsed as XML");
        }
    }

    Ok(())
}

/// Runs the `config` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
fn run_config(cmd: &ConfigSubcommands, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;

    match cmd {
        ConfigSubcommands::SetKey { key } => {
            if key.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            config.api.key = Some(key.clone());
            config.save(&config_path).context("failed to save config")?;
            tracing::info!("Saved API key to {}", config_path.display());
        }
        ConfigSubcommands::SetBaseUrl { url } => {
            Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;
            config.api.base_url = Some(url.clone());
            config.save(&config_path).context("failed to save config")?;
            tracing::info!("Saved base URL to {}", config_path.display());
        }
        ConfigSubcommands::Show => {
            tracing::info!("Config: {}", config_path.display());
            tracing::info!(
                "key: {}",
                if config.api.key.is_some() { "***" } else { "-" }
            );
            tracing::info!(
                "base_url: {}",
                config.api.base_url.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.debug { "debug" } else { "info" };

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
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

    match &cli.command {
        Commands::Medias(cmd) => {
            let (endpoint, options) = medias_request(&cmd.command);
            run_request(&cli, endpoint, options.as_ref()).await
        }
        Commands::Channels(cmd) => {
            let (endpoint, options) = channels_request(&cmd.command);
            run_request(&cli, endpoint, options.as_ref()).await
        }
        Commands::Outputs => run_request(&cli, Endpoint::Outputs, None).await,
        Commands::Report(cmd) => run_request(&cli, report_endpoint(&cmd.command), None).await,
        Commands::Config(cmd) => run_config(&cmd.command, cli.dir.as_ref()),
    }
}
