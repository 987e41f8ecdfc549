//! msushuffle: shuffles MSU-1 soundtrack packs for A Link to the Past into
//! one fixed set of output tracks, once or continuously while playing.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod config;
mod error;
mod library;
mod observer;
mod publish;
mod runtime;
mod selection;
#[cfg(test)]
mod testutil;

use config::{CopyStrategy, Settings, ShuffleMode};

#[derive(Parser, Debug)]
#[command(name = "msushuffle")]
#[command(about = "Shuffle ALttP MSU-1 packs into one soundtrack")]
#[command(version)]
struct Args {
    /// default, basic, full or single-pool
    #[arg(short, long)]
    mode: Option<ShuffleMode>,

    /// Directory holding one sub-directory per pack
    #[arg(short, long)]
    collection: Option<PathBuf>,

    /// Pack to draw every track from (implies --mode single-pool)
    #[arg(long)]
    single_pool: Option<PathBuf>,

    /// Where the shuffled tracks are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file prefix, e.g. `shuffled` for `shuffled-17.pcm`
    #[arg(short, long)]
    prefix: Option<String>,

    /// Rescan the collection instead of reusing the saved index
    #[arg(long)]
    rebuild_index: bool,

    /// Reshuffle every N seconds until stopped
    #[arg(long, value_name = "SECS")]
    live: Option<u64>,

    /// With --live, stop after N reshuffles
    #[arg(long, value_name = "N", requires = "live", value_parser = clap::value_parser!(u64).range(1..))]
    cycles: Option<u64>,

    /// Copy tracks instead of hard linking them
    #[arg(long)]
    real_copy: bool,

    /// Log what would be published without touching the output directory
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Report the pack of the track currently playing (usb2snes)
    #[arg(long)]
    now_playing: bool,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "MSUSHUFFLE_LOG")]
    log_level: Option<String>,
}

impl Args {
    /// Flags win over the config file and environment.
    fn apply(self, settings: &mut Settings) {
        let shuffle = &mut settings.shuffle;
        if let Some(mode) = self.mode {
            shuffle.mode = mode;
        }
        if let Some(pool) = self.single_pool {
            shuffle.single_pool = Some(pool);
            shuffle.mode = ShuffleMode::SinglePool;
        }
        if let Some(root) = self.collection {
            shuffle.collection_root = root;
        }
        if let Some(dir) = self.output_dir {
            shuffle.output_dir = dir;
        }
        if let Some(prefix) = self.prefix {
            shuffle.output_prefix = prefix;
        }
        if self.rebuild_index {
            shuffle.rebuild_index = true;
        }
        if self.real_copy {
            shuffle.copy_strategy = CopyStrategy::RealCopy;
        }
        if self.dry_run {
            shuffle.dry_run = true;
        }
        if self.seed.is_some() {
            shuffle.seed = self.seed;
        }
        if self.live.is_some() {
            settings.live.interval_secs = self.live;
        }
        if self.cycles.is_some() {
            settings.live.cycles = self.cycles;
        }
        if self.now_playing {
            settings.observer.enabled = true;
        }
        if let Some(level) = self.log_level {
            settings.logging.level = level;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (mut settings, config_warning) = runtime::load_settings();
    args.apply(&mut settings);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    settings.validate().map_err(error::Error::Config)?;

    info!(
        "shuffling {} into {} ({:?} mode)",
        settings.shuffle.collection_root.display(),
        settings.shuffle.output_dir.display(),
        settings.shuffle.mode
    );
    runtime::run(&settings)
}
