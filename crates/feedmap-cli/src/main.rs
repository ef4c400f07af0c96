mod feeds;
mod map;

use clap::{CommandFactory, Parser, Subcommand};
use feedmap_core::{CurrencyCode, FeedFormat};
use feedmap_scraper::CancelSignal;
use tracing_subscriber::EnvFilter;

use feeds::FeedsCommands;

#[derive(Debug, Parser)]
#[command(name = "feedmap-cli")]
#[command(about = "Map product feeds into canonical products")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and map a single feed URL
    Map {
        /// Feed URL to download
        #[arg(long)]
        url: String,

        /// Feed format: json, xml (Google Shopping) or raw
        #[arg(long)]
        format: FeedFormat,

        /// Currency for prices that do not state one (overrides FEEDMAP_DEFAULT_CURRENCY)
        #[arg(long)]
        currency: Option<CurrencyCode>,

        /// Leading lines to skip in raw feeds (overrides FEEDMAP_RAW_HEADER_ROWS)
        #[arg(long)]
        header_rows: Option<usize>,

        /// Abandon the run after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print every mapped product as a JSON line on stdout
        #[arg(long)]
        emit_products: bool,
    },
    /// Work with the feeds listed in the catalog file
    Feeds {
        #[command(subcommand)]
        command: FeedsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = feedmap_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        feeds_path = %config.feeds_path.display(),
        "configuration loaded"
    );

    let cancel = CancelSignal::new();
    cancel_on_ctrl_c(cancel.clone());

    match cli.command {
        Some(Commands::Map {
            url,
            format,
            currency,
            header_rows,
            timeout_secs,
            emit_products,
        }) => {
            let options = map::MapOptions {
                url,
                format,
                currency,
                header_rows,
                timeout_secs,
                emit_products,
            };
            map::run_map(&config, options, &cancel).await?;
        }
        Some(Commands::Feeds { command }) => {
            feeds::run_feeds_command(&config, command, &cancel).await?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// Trips `cancel` on the first Ctrl+C so in-flight runs stop at their next
/// checkpoint.
fn cancel_on_ctrl_c(cancel: CancelSignal) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("interrupt received, cancelling feed runs");
                cancel.cancel();
            }
            Err(e) => tracing::error!(error = %e, "failed to install Ctrl+C handler"),
        }
    });
}
