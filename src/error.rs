//! Error types shared by the indexer, selection policy, publisher and observer.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::TrackId;

/// Result type used across msushuffle.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No usable pool was found under the collection root. Aborts the run.
    #[error("no MSU packs found under {}", .0.display())]
    PoolSetEmpty(PathBuf),

    /// A resolved source id had no candidates to draw from.
    #[error("no candidates for track {0}")]
    CandidateMissing(TrackId),

    /// No pool supplied the extended track or its backup within the retry budget.
    #[error("no pool supplied track {id} or its backup after {attempts} attempts")]
    ExtendedFallbackExhausted { id: TrackId, attempts: usize },

    /// The destination file is held open by another process.
    #[error("{} is locked, keeping previous selection for track {id}", path.display())]
    PublishLocked { id: TrackId, path: PathBuf },

    /// The device-control endpoint could not be reached or answered badly.
    #[error("device query failed: {0}")]
    DeviceQueryFailed(String),

    /// The device did not answer within the configured timeout.
    #[error("device query timed out")]
    DeviceQueryTimeout,

    /// The persisted index could not be trusted and has to be rebuilt.
    #[error("persisted index is unusable: {0}")]
    IndexCorrupt(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Only a missing pool set stops a run; everything else is local to one track or poll.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::PoolSetEmpty(_))
    }
}
