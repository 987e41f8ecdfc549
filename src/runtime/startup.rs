use std::fs;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::observer::{Observer, WsConnector};
use crate::publish::AtomicPublisher;

use super::context::ShuffleContext;
use super::session::Session;

pub type LiveSession = Session<StdRng, AtomicPublisher, WsConnector>;

/// Wire up a session from settings: output directory, random source,
/// publisher and the optional observer.
pub fn build_session(settings: &Settings) -> Result<LiveSession> {
    let shuffle = &settings.shuffle;

    if !shuffle.dry_run {
        fs::create_dir_all(&shuffle.output_dir)?;
    }

    let rng = match shuffle.seed {
        Some(seed) => {
            info!("using shuffle seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let publisher = AtomicPublisher::new(
        &shuffle.output_dir,
        shuffle.output_prefix.clone(),
        shuffle.copy_strategy,
    );

    let observer = settings.observer.enabled.then(|| {
        let obs = &settings.observer;
        let status_path = obs
            .status_path
            .clone()
            .unwrap_or_else(|| shuffle.output_dir.join("nowplaying.txt"));
        Observer::new(
            WsConnector::new(&obs.endpoint, Duration::from_millis(obs.timeout_ms)),
            &obs.address,
            shuffle.resolved_record_path(),
            shuffle.collection_root.clone(),
            status_path,
        )
    });

    Ok(Session::new(
        ShuffleContext::new(shuffle.clone()),
        rng,
        publisher,
        observer,
        shuffle.rebuild_index,
    ))
}
