use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ShuffleSettings;
use crate::error::{Error, Result};
use crate::publish::write_atomically;

use super::model::{Index, IndexFingerprint};
use super::scan::rescan;

/// Read a persisted index. Anything unparseable or structurally invalid is
/// reported as `IndexCorrupt`.
pub fn load(path: &Path) -> Result<Index> {
    let raw = fs::read_to_string(path)?;
    let index: Index =
        serde_json::from_str(&raw).map_err(|e| Error::IndexCorrupt(e.to_string()))?;
    index.validate().map_err(Error::IndexCorrupt)?;
    Ok(index)
}

pub fn save(index: &Index, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(index)?;
    write_atomically(path, &json)?;
    Ok(())
}

/// Reuse the persisted index when it is valid and was built for the same
/// collection and mode, otherwise rescan and persist the result.
///
/// Only an empty pool set is an error.
pub fn load_or_build(settings: &ShuffleSettings, force_rebuild: bool) -> Result<Index> {
    let path = settings.resolved_index_path();

    if force_rebuild {
        info!("rebuilding track index");
    } else {
        match load(&path) {
            Ok(index) if *index.fingerprint() == IndexFingerprint::for_settings(settings) => {
                info!("reusing track index {}", path.display());
                return Ok(index);
            }
            Ok(_) => info!("track index was built for other settings, rebuilding"),
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no track index at {}", path.display());
            }
            Err(e) => warn!("{e}, rebuilding"),
        }
    }

    let index = rescan(settings)?;

    if !settings.dry_run {
        if let Err(e) = save(&index, &path) {
            warn!("could not persist track index to {}: {e}", path.display());
        }
    }
    Ok(index)
}
