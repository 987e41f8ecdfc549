use std::collections::HashMap;
use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::catalog::{self, TrackId};
use crate::config::ShuffleMode;
use crate::error::Error;
use crate::library::{Index, track_id_of};

/// How many random packs to try for an extended track before giving up on it.
pub const EXTENDED_ATTEMPTS: usize = 1000;

/// One destination track and the file chosen to fill it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub dest: TrackId,
    pub src: TrackId,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct SkippedTrack {
    pub id: TrackId,
    pub reason: Error,
}

/// The outcome of one selection pass: a pick per resolvable id plus the ids
/// that could not be resolved.
#[derive(Debug, Default)]
pub struct SelectionPlan {
    pub picks: Vec<Selection>,
    pub skipped: Vec<SkippedTrack>,
}

impl SelectionPlan {
    #[cfg(test)]
    pub fn pick(&self, dest: TrackId) -> Option<&Selection> {
        self.picks.iter().find(|s| s.dest == dest)
    }
}

/// Choose a source file for every track id present in `index`.
///
/// Non-looping tracks always come from their own track number. Looping
/// tracks follow `mode`: kept in place (`Basic`, `SinglePool`), permuted
/// among themselves (`Full`), or, for extended tracks in `Default`, taken
/// from a random pack's own version or its generic backup.
pub fn select<R: Rng + ?Sized>(index: &Index, mode: ShuffleMode, rng: &mut R) -> SelectionPlan {
    let ids: Vec<TrackId> = index.track_ids().collect();
    let sources = if mode == ShuffleMode::Full {
        shuffled_sources(&ids, rng)
    } else {
        HashMap::new()
    };

    let mut plan = SelectionPlan::default();
    for dest in ids {
        let resolved: Result<(TrackId, Vec<&PathBuf>), Error> = if !catalog::is_looping(dest) {
            Ok((dest, index.candidates(dest).iter().collect()))
        } else {
            match mode {
                ShuffleMode::Full => {
                    let src = sources.get(&dest).copied().unwrap_or(dest);
                    Ok((src, index.candidates(src).iter().collect()))
                }
                ShuffleMode::Default if catalog::is_extended(dest) => {
                    resolve_extended(index, dest, rng)
                }
                _ => Ok((dest, index.candidates(dest).iter().collect())),
            }
        };

        match resolved {
            Ok((src, candidates)) => match candidates.choose(rng) {
                Some(path) => plan.picks.push(Selection {
                    dest,
                    src,
                    path: (*path).clone(),
                }),
                None => plan.skipped.push(SkippedTrack {
                    id: dest,
                    reason: Error::CandidateMissing(src),
                }),
            },
            Err(reason) => plan.skipped.push(SkippedTrack { id: dest, reason }),
        }
    }

    debug!(
        "selected {} tracks, skipped {}",
        plan.picks.len(),
        plan.skipped.len()
    );
    plan
}

/// A one-off permutation of the looping ids. Self-mapping is allowed.
fn shuffled_sources<R: Rng + ?Sized>(ids: &[TrackId], rng: &mut R) -> HashMap<TrackId, TrackId> {
    let looping: Vec<TrackId> = ids
        .iter()
        .copied()
        .filter(|id| catalog::is_looping(*id))
        .collect();
    let mut shuffled = looping.clone();
    shuffled.shuffle(rng);
    looping.into_iter().zip(shuffled).collect()
}

fn resolve_extended<'a, R: Rng + ?Sized>(
    index: &'a Index,
    dest: TrackId,
    rng: &mut R,
) -> Result<(TrackId, Vec<&'a PathBuf>), Error> {
    let backup = catalog::backup_for(dest);

    for _ in 0..EXTENDED_ATTEMPTS {
        let Some(pool) = index.pools().choose(rng) else {
            break;
        };

        // Substituted backups share the extended id's slot, so check the filename.
        let own: Vec<&PathBuf> = index
            .candidates_in_pool(dest, pool)
            .into_iter()
            .filter(|p| track_id_of(p) == Some(dest))
            .collect();
        if !own.is_empty() {
            return Ok((dest, own));
        }

        if let Some(backup) = backup {
            let generic = index.candidates_in_pool(backup, pool);
            if !generic.is_empty() {
                return Ok((backup, generic));
            }
        }
    }

    Err(Error::ExtendedFallbackExhausted {
        id: dest,
        attempts: EXTENDED_ATTEMPTS,
    })
}
