//! Pool indexer: finds the MSU packs under the collection root and maps
//! every track id to the files that can stand in for it.

mod model;
mod scan;
mod store;

pub use model::Index;
pub use scan::track_id_of;
pub use store::load_or_build;

#[cfg(test)]
pub use {model::IndexFingerprint, scan::rescan};
