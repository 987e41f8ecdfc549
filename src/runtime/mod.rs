use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::config::Settings;

mod context;
mod scheduler;
mod session;
mod settings;
mod startup;

pub use settings::load_settings;

use scheduler::LiveScheduler;
use session::Tick;
use startup::build_session;

/// Run one shuffle, or keep reshuffling on the live interval when one is set.
pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let mut session = build_session(settings).context("failed to prepare output directory")?;

    match settings.live.interval_secs {
        Some(secs) => {
            let mut scheduler = LiveScheduler::new(Duration::from_secs(secs));
            info!(
                "live shuffle every {:?}{}",
                scheduler.interval(),
                settings
                    .live
                    .cycles
                    .map(|n| format!(" for {n} cycles"))
                    .unwrap_or_default()
            );
            scheduler.run(&mut session, settings.live.cycles)?;
        }
        None => {
            session.tick()?;
        }
    }
    Ok(())
}
