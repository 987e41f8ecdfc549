use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::catalog::{self, TrackId};
use crate::config::ShuffleSettings;
use crate::error::{Error, Result};

use super::model::{Index, IndexFingerprint};

const DISABLED_MARKER: &str = "disabled";

pub(super) fn is_disabled(path: &Path) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .contains(DISABLED_MARKER)
}

fn is_track_file(path: &Path, settings: &ShuffleSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Track id encoded as the digits that end the file stem (`pack-12.pcm` -> 12).
pub fn track_id_of(path: &Path) -> Option<TrackId> {
    let stem = path.file_stem()?.to_str()?;
    let digits_at = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let number: u16 = stem[digits_at..].parse().ok()?;
    let id = TrackId::try_from(number).ok()?;
    catalog::get(id).map(|t| t.id)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The output directory may sit anywhere under a pack; its published
/// tracks are never candidates.
fn is_output_dir(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    let Some(output_dir) = output_dir else {
        return false;
    };
    entry.file_type().is_dir()
        && fs::canonicalize(entry.path()).is_ok_and(|p| p == output_dir)
}

/// The pack directories to draw from, sorted.
pub fn discover_pools(settings: &ShuffleSettings) -> Vec<PathBuf> {
    if let Some(pool) = settings.pool_restriction() {
        let name = pool.file_name().map(Path::new).unwrap_or(pool);
        if pool.is_dir() && !is_disabled(name) {
            return vec![pool.clone()];
        }
        warn!("single pool {} is missing or disabled", pool.display());
        return Vec::new();
    }

    let root = &settings.collection_root;
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read collection root {}: {e}", root.display());
            return Vec::new();
        }
    };

    let mut pools: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            let name = path.file_name().map(Path::new).unwrap_or(path);
            if is_disabled(name) {
                debug!("skipping disabled pack {}", path.display());
                return false;
            }
            true
        })
        .filter(|path| !same_dir(path, &settings.output_dir))
        .collect();
    pools.sort();
    pools
}

/// Every track file in one pack, grouped by the id its filename encodes.
pub fn scan_pool(pool: &Path, settings: &ShuffleSettings) -> BTreeMap<TrackId, Vec<PathBuf>> {
    let mut found: BTreeMap<TrackId, Vec<PathBuf>> = BTreeMap::new();

    let output_dir = fs::canonicalize(&settings.output_dir).ok();
    let walker = WalkDir::new(pool).follow_links(settings.follow_links);

    for entry in walker
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let relative = e.path().strip_prefix(pool).unwrap_or(e.path());
            !is_disabled(relative) && !is_output_dir(e, output_dir.as_deref())
        })
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_track_file(path, settings) {
            continue;
        }
        if let Some(id) = track_id_of(path) {
            found.entry(id).or_default().push(path.to_path_buf());
        }
    }

    found
}

/// Full rescan of the collection.
///
/// Extended tracks missing from a pack are stood in for by that pack's
/// generic backup track when the mode allows it.
pub fn rescan(settings: &ShuffleSettings) -> Result<Index> {
    let pools = discover_pools(settings);
    if pools.is_empty() {
        let root = settings
            .pool_restriction()
            .unwrap_or(&settings.collection_root);
        return Err(Error::PoolSetEmpty(root.clone()));
    }

    let fingerprint = IndexFingerprint::for_settings(settings);
    let backups = fingerprint.extended_backups;
    let mut index = Index::new(fingerprint, pools.clone());

    for pool in &pools {
        let assets = scan_pool(pool, settings);
        debug!("{}: {} track numbers", pool.display(), assets.len());

        for track in catalog::all() {
            let id = track.id;
            if let Some(direct) = assets.get(&id) {
                index.add_candidates(id, direct.iter().cloned());
            } else if backups && catalog::is_extended(id) {
                let substitute = catalog::backup_for(id).and_then(|b| assets.get(&b));
                if let Some(paths) = substitute {
                    index.add_candidates(id, paths.iter().cloned());
                }
            }
        }
    }

    index.normalize();
    if index.is_empty() {
        warn!("no track files found in {} packs", pools.len());
    }
    info!(
        "indexed {} packs, {} of {} track numbers available",
        pools.len(),
        index.len(),
        catalog::TRACK_COUNT
    );
    Ok(index)
}
