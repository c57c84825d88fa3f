//! livefeed player
//!
//! Replays push-API event batches through the event scheduler and logs what
//! a live chat widget would display.

mod config;
mod renderer;
mod shutdown;
mod source;

use clap::Parser;
use config::{ConfigError, ConfigLoader, FileConfig};
use livefeed_core::config::ConfigStore;
use livefeed_core::events::event_batch_channel;
use livefeed_core::scheduler::SchedulerRunner;
use livefeed_core::source::{BatchHandler, EventSource};
use renderer::TimedRenderer;
use shutdown::spawn_signal_handler;
use source::{LineEventSource, SourceError, SourceStats};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::watch;
use tokio_stream::Stream;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// livefeed player - buffered release of chat and gift events
#[derive(Parser, Debug)]
#[command(name = "livefeed-player")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./livefeed.toml")]
    config: PathBuf,

    /// Read batches from this file instead of the configured input (`-` for stdin)
    #[arg(short, long, env = "LIVEFEED_INPUT")]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration; the log filter comes from it
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.input));
    let loaded_config = load_config(&config_loader)?;

    // Initialize tracing
    init_tracing(loaded_config.log_filter.as_deref());

    tracing::info!("Starting livefeed-player v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Configuration loaded from {:?}", config_loader.path());

    let renderer_config = ConfigStore::new(loaded_config.renderer);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler (SIGTERM/SIGINT shutdown, SIGHUP reload)
    let stop_notify =
        spawn_signal_handler(shutdown_tx, config_loader.clone(), renderer_config.clone())
            .map_err(|e| {
                tracing::error!("Failed to install signal handlers: {}", e);
                e
            })?;

    // Start the scheduler
    let (batch_tx, batch_rx) = event_batch_channel();
    let renderer = TimedRenderer::new(renderer_config.subscribe());
    let runner = tokio::spawn(SchedulerRunner::new(renderer).run(shutdown_rx.clone(), batch_rx));

    // Feed it from the configured input
    let handler = BatchHandler::new(batch_tx);
    let restamp = loaded_config.input.restamp;
    let source_result = match loaded_config.input.file() {
        Some(path) => {
            tracing::info!("Reading batches from {:?}", path);
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                tracing::error!("Failed to open input {:?}: {}", path, e);
                e
            })?;
            replay(LineEventSource::new(BufReader::new(file)), restamp, handler, shutdown_rx).await
        }
        None => {
            tracing::info!("Reading batches from stdin");
            let source = LineEventSource::stdin().map_err(|e| {
                tracing::error!("Failed to start stdin reader: {}", e);
                e
            })?;
            replay(source, restamp, handler, shutdown_rx).await
        }
    };

    // Wait for the scheduler to drain whatever is still queued
    let scheduler = runner.await?;
    if !scheduler.is_empty() {
        tracing::warn!(pending = scheduler.len(), "Stopped with events still queued");
    }

    // Signal the signal handler to stop
    stop_notify.notify_one();

    let stats = source_result?;
    tracing::info!(
        batches = stats.batches,
        events = stats.events,
        "livefeed-player shutdown complete"
    );
    Ok(())
}

/// Load the configuration file, logging a failure before returning it.
///
/// Tracing is not set up yet at this point, so a failure installs the
/// default subscriber first.
fn load_config(config_loader: &ConfigLoader) -> Result<FileConfig, ConfigError> {
    config_loader.load().map_err(|e| {
        init_tracing(None);
        tracing::error!("Failed to load configuration: {}", e);
        e
    })
}

async fn replay<S>(
    source: LineEventSource<S>,
    restamp: bool,
    handler: BatchHandler,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<SourceStats, SourceError>
where
    S: Stream<Item = io::Result<String>> + Unpin,
{
    let mut source = source.restamp(restamp);
    source.set_event_handler(handler);
    source.run(shutdown_rx).await
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// A second call keeps the subscriber that is already installed.
fn init_tracing(default_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or("info")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
