use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{self, TrackId};
use crate::config::ShuffleSettings;

/// What an index was built from. A persisted index is only reused when its
/// fingerprint matches the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFingerprint {
    pub collection_root: PathBuf,
    pub single_pool: Option<PathBuf>,
    pub extended_backups: bool,
}

impl IndexFingerprint {
    pub fn for_settings(settings: &ShuffleSettings) -> Self {
        Self {
            collection_root: settings.collection_root.clone(),
            single_pool: settings.pool_restriction().cloned(),
            extended_backups: settings.mode.uses_extended_backups(),
        }
    }
}

/// Candidate tracks per track id across every enabled pack.
///
/// An id is either absent or has at least one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    fingerprint: IndexFingerprint,
    pools: Vec<PathBuf>,
    tracks: BTreeMap<TrackId, Vec<PathBuf>>,
}

impl Index {
    pub fn new(fingerprint: IndexFingerprint, pools: Vec<PathBuf>) -> Self {
        Self {
            fingerprint,
            pools,
            tracks: BTreeMap::new(),
        }
    }

    pub fn fingerprint(&self) -> &IndexFingerprint {
        &self.fingerprint
    }

    pub fn pools(&self) -> &[PathBuf] {
        &self.pools
    }

    /// Add candidates for `id`. Adding nothing leaves the id absent.
    pub fn add_candidates<I>(&mut self, id: TrackId, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut paths = paths.into_iter().peekable();
        if paths.peek().is_none() {
            return;
        }
        self.tracks.entry(id).or_default().extend(paths);
    }

    /// Sort and dedup candidate lists so equal trees produce equal indexes.
    pub fn normalize(&mut self) {
        for paths in self.tracks.values_mut() {
            paths.sort();
            paths.dedup();
        }
    }

    pub fn candidates(&self, id: TrackId) -> &[PathBuf] {
        self.tracks.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidates for `id` that live inside `pool`.
    pub fn candidates_in_pool(&self, id: TrackId, pool: &Path) -> Vec<&PathBuf> {
        self.candidates(id)
            .iter()
            .filter(|p| p.starts_with(pool))
            .collect()
    }

    #[cfg(test)]
    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.contains_key(&id)
    }

    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Structural checks applied to an index read back from disk.
    pub fn validate(&self) -> Result<(), String> {
        if self.pools.is_empty() {
            return Err("no pools recorded".to_string());
        }
        if self.tracks.is_empty() {
            return Err("no tracks recorded".to_string());
        }
        for (id, paths) in &self.tracks {
            if catalog::get(*id).is_none() {
                return Err(format!("track id {id} is outside the catalog"));
            }
            if paths.is_empty() {
                return Err(format!("track {id} has an empty candidate list"));
            }
        }
        Ok(())
    }
}
