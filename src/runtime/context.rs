use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::config::ShuffleSettings;
use crate::error::{Error, Result};
use crate::library::{self, Index};
use crate::publish::{Publish, SelectionRecord};
use crate::selection::{self, Selection, SkippedTrack};

/// What one publish cycle did.
#[derive(Debug)]
pub struct CycleReport {
    pub started: Instant,
    pub finished: Instant,
    pub published: Vec<Selection>,
    pub skipped: Vec<SkippedTrack>,
}

/// State carried from one cycle to the next: the track index and the record
/// of what is currently published.
pub struct ShuffleContext {
    settings: ShuffleSettings,
    index: Option<Index>,
    record: SelectionRecord,
}

impl ShuffleContext {
    pub fn new(settings: ShuffleSettings) -> Self {
        let record = SelectionRecord::load(&settings.resolved_record_path());
        if record.is_empty() {
            debug!("no previous selection record");
        } else {
            debug!("{} tracks recorded by the previous run", record.len());
        }
        Self {
            settings,
            index: None,
            record,
        }
    }

    #[cfg(test)]
    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    #[cfg(test)]
    pub fn record(&self) -> &SelectionRecord {
        &self.record
    }

    /// Select a source for every indexed track and publish it.
    ///
    /// Per-track failures are logged and leave that track's previous
    /// selection in place; only a missing pool set is returned as an error.
    pub fn run_cycle<R, P>(
        &mut self,
        rng: &mut R,
        publisher: &P,
        force_rebuild: bool,
    ) -> Result<CycleReport>
    where
        R: Rng + ?Sized,
        P: Publish + ?Sized,
    {
        let started = Instant::now();

        let index = match self.index.take() {
            Some(index) if !force_rebuild => index,
            _ => library::load_or_build(&self.settings, force_rebuild)?,
        };
        let plan = selection::select(&index, self.settings.mode, rng);
        self.index = Some(index);

        let mut published = Vec::with_capacity(plan.picks.len());
        let mut skipped = plan.skipped;

        for pick in plan.picks {
            if self.settings.dry_run {
                log_pick(&pick);
                published.push(pick);
                continue;
            }

            match publisher.publish(&pick.path, pick.dest) {
                Ok(_) => {
                    log_pick(&pick);
                    self.record.insert(pick.dest, pick.path.clone());
                    published.push(pick);
                }
                Err(reason) => skipped.push(SkippedTrack {
                    id: pick.dest,
                    reason,
                }),
            }
        }

        for skip in &skipped {
            match &skip.reason {
                Error::PublishLocked { .. } => warn!("{}", skip.reason),
                reason => warn!("{}: {reason}", catalog::title(skip.id)),
            }
        }

        if !self.settings.dry_run {
            let path = self.settings.resolved_record_path();
            if let Err(e) = self.record.save(&path) {
                warn!("could not save selection record {}: {e}", path.display());
            }
        }

        info!(
            "{} {} tracks, skipped {}",
            if self.settings.dry_run { "would publish" } else { "published" },
            published.len(),
            skipped.len()
        );

        Ok(CycleReport {
            started,
            finished: Instant::now(),
            published,
            skipped,
        })
    }
}

fn log_pick(pick: &Selection) {
    if pick.src == pick.dest {
        info!("{}: {}", catalog::title(pick.dest), pick.path.display());
    } else {
        info!(
            "{}: {} ({})",
            catalog::title(pick.dest),
            pick.path.display(),
            catalog::title(pick.src)
        );
    }
}
