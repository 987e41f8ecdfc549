use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::TrackId;
use crate::error::Result;

use super::atomic::write_atomically;

/// Which source file currently fills each destination track.
///
/// Entries are only replaced by a newer successful publish, so a track that
/// was locked during the last cycle keeps its previous source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionRecord {
    entries: BTreeMap<TrackId, PathBuf>,
}

impl SelectionRecord {
    pub fn get(&self, id: TrackId) -> Option<&Path> {
        self.entries.get(&id).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, id: TrackId, path: PathBuf) {
        self.entries.insert(id, path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the record, treating a missing or unreadable file as empty.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("ignoring unreadable selection record {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomically(path, &json)?;
        Ok(())
    }
}
