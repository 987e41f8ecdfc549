//! Fixtures shared by unit tests: throwaway pack collections on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ShuffleMode, ShuffleSettings};

/// A collection root with an output directory nested inside it, the way the
/// shuffler is usually installed.
pub struct Collection {
    pub dir: tempfile::TempDir,
}

impl Collection {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("shuffled")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("shuffled")
    }

    /// Write `<pool>/<pool>-<id>.pcm` with contents naming the pool and id.
    pub fn track(&self, pool: &str, id: u8) -> PathBuf {
        let path = self.root().join(pool).join(format!("{pool}-{id}.pcm"));
        self.file(&path, format!("{pool}:{id}").as_bytes());
        path
    }

    pub fn file(&self, path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn settings(&self, mode: ShuffleMode) -> ShuffleSettings {
        ShuffleSettings {
            mode,
            collection_root: self.root().to_path_buf(),
            output_dir: self.output(),
            ..ShuffleSettings::default()
        }
    }
}
