//! handsfree-engine: replay recorded hand landmarks through the gesture
//! classifier and interaction controllers, writing events as s-expressions.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use tracing::info;

use handsfree_engine::config::EngineConfig;
use handsfree_engine::interaction::GalleryItem;
use handsfree_engine::runtime::{self, EngineState, RuntimeOptions};
use handsfree_engine::source::{LandmarkSource, ReplaySource};

#[derive(Parser, Debug)]
#[command(name = "handsfree-engine", about = "Hand gesture interaction engine")]
struct Cli {
    /// Recorded detector frames, one s-expression per line
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Config plist (default: built-in thresholds)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds between detection requests
    #[arg(long, default_value_t = 33)]
    frame_interval_ms: u64,

    /// Exit after N seconds
    #[arg(long)]
    exit_after: Option<u64>,

    /// Number of placeholder gallery items
    #[arg(long, default_value_t = 12)]
    items: u64,

    /// Also write every published tracking snapshot
    #[arg(long)]
    emit_snapshots: bool,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handsfree_engine=info".into()),
        )
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if cli.print_config {
        println!("{}", config.to_sexp());
        return Ok(());
    }

    let Some(replay) = &cli.replay else {
        bail!("no landmark source: pass --replay <FILE>");
    };

    info!("handsfree-engine v{} starting", env!("CARGO_PKG_VERSION"));
    let source = ReplaySource::open(replay)?;
    info!("landmark source: {}", source.name());

    let items = (1..=cli.items)
        .map(|id| GalleryItem::new(id, format!("item-{id}")))
        .collect();
    let state = EngineState::new(&config, Box::new(source), items, cli.emit_snapshots);

    runtime::run(
        state,
        RuntimeOptions {
            frame_interval_ms: cli.frame_interval_ms,
            exit_after: cli.exit_after,
        },
    )
}
