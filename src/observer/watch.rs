use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::{self, TrackId};
use crate::error::{Error, Result};
use crate::publish::{SelectionRecord, write_atomically};

use super::protocol::{Connector, DeviceLink};

/// Returned when the current track cannot be determined.
pub const UNKNOWN: TrackId = 0;

/// Polls the console/emulator for the track it is playing and reports which
/// pack the published copy of that track came from.
///
/// The device link is kept between polls and dropped on any failure, so the
/// next poll reconnects.
pub struct Observer<C: Connector> {
    connector: C,
    link: Option<C::Link>,
    address: String,
    record_path: PathBuf,
    collection_root: PathBuf,
    status_path: PathBuf,
}

impl<C: Connector> Observer<C> {
    pub fn new(
        connector: C,
        address: impl Into<String>,
        record_path: PathBuf,
        collection_root: PathBuf,
        status_path: PathBuf,
    ) -> Self {
        Self {
            connector,
            link: None,
            address: address.into(),
            record_path,
            collection_root,
            status_path,
        }
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Poll once. Returns the current track id, or `UNKNOWN` when the device
    /// cannot be reached, has nothing attached, or does not answer in time.
    pub fn observe(&mut self, previous: TrackId) -> TrackId {
        let current = match self.poll() {
            Ok(id) if catalog::get(id).is_some() => id,
            Ok(id) => {
                debug!("ignoring music byte {id:#04x}");
                return UNKNOWN;
            }
            Err(e) => {
                debug!("now-playing poll failed: {e}");
                self.link = None;
                return UNKNOWN;
            }
        };

        if current != previous {
            self.announce(current);
        }
        current
    }

    fn poll(&mut self) -> Result<TrackId> {
        let mut link = match self.link.take() {
            Some(link) => link,
            None => self.attach()?,
        };
        let bytes = link.read_memory(&self.address, 1)?;
        self.link = Some(link);
        bytes.first().copied().ok_or(Error::DeviceQueryTimeout)
    }

    fn attach(&self) -> Result<C::Link> {
        let mut link = self.connector.connect()?;
        let devices = link.device_list()?;
        let device = devices
            .first()
            .ok_or_else(|| Error::DeviceQueryFailed("no devices available".to_string()))?;
        link.attach(device)?;
        debug!("attached to {device}");
        Ok(link)
    }

    fn announce(&self, id: TrackId) {
        let record = SelectionRecord::load(&self.record_path);
        let Some(source) = record.get(id) else {
            debug!("{} has no published source", catalog::title(id));
            return;
        };

        let pool = pool_name(source, &self.collection_root);
        info!("Now playing: {pool} ({})", catalog::title(id));
        if let Err(e) = write_atomically(&self.status_path, pool.as_bytes()) {
            warn!("could not write {}: {e}", self.status_path.display());
        }
    }
}

/// The pack a source file belongs to: its top-level directory under the
/// collection root, or its parent directory's name.
pub fn pool_name(source: &Path, collection_root: &Path) -> String {
    if let Ok(rel) = source.strip_prefix(collection_root) {
        let mut parts = rel.components();
        if let (Some(first), Some(_)) = (parts.next(), parts.next()) {
            return first.as_os_str().to_string_lossy().into_owned();
        }
    }

    source
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string())
}
