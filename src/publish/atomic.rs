use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::TrackId;
use crate::config::CopyStrategy;
use crate::error::{Error, Result};

const STAGING_PREFIX: &str = ".msushuffle-";

/// How a published file got its bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Linked,
    Copied,
}

/// Puts a chosen track into its output slot.
pub trait Publish {
    fn publish(&self, src: &Path, dest: TrackId) -> Result<PublishOutcome>;
}

/// Publishes by staging the file next to its target and renaming it over
/// the target, so readers see either the old or the new track in full.
#[derive(Debug, Clone)]
pub struct AtomicPublisher {
    output_dir: PathBuf,
    prefix: String,
    strategy: CopyStrategy,
}

impl AtomicPublisher {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        strategy: CopyStrategy,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
            strategy,
        }
    }

    /// Fixed output path for a destination track, e.g. `shuffled-17.pcm`.
    pub fn target_path(&self, dest: TrackId) -> PathBuf {
        self.output_dir.join(format!("{}-{}.pcm", self.prefix, dest))
    }

    fn stage(&self, src: &Path, staged: &Path) -> io::Result<PublishOutcome> {
        if self.strategy == CopyStrategy::HardLink {
            match fs::hard_link(src, staged) {
                Ok(()) => return Ok(PublishOutcome::Linked),
                Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                    debug!("{} is on another filesystem, copying", src.display());
                }
                Err(e) => return Err(e),
            }
        }
        fs::copy(src, staged)?;
        Ok(PublishOutcome::Copied)
    }
}

impl Publish for AtomicPublisher {
    fn publish(&self, src: &Path, dest: TrackId) -> Result<PublishOutcome> {
        let target = self.target_path(dest);

        // Removed on drop, whichever way this function returns.
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.output_dir)?;
        let staged = staging.path().join(format!("{dest}.pcm"));

        let outcome = self.stage(src, &staged)?;

        fs::rename(&staged, &target).map_err(|e| {
            if is_locked(&e) {
                Error::PublishLocked { id: dest, path: target.clone() }
            } else {
                Error::Io(e)
            }
        })?;

        Ok(outcome)
    }
}

/// Whether an I/O error means another process is holding the file open.
pub fn is_locked(e: &io::Error) -> bool {
    is_sharing_violation(e)
        || matches!(
            e.kind(),
            io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
        )
}

// ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
#[cfg(windows)]
fn is_sharing_violation(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(32) | Some(33))
}

#[cfg(not(windows))]
fn is_sharing_violation(_e: &io::Error) -> bool {
    false
}

/// Replace `path` with `bytes` in one rename.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
