use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::IntoDeserializer;
use serde::de::value::{self, StrDeserializer};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/msushuffle/config.toml` or `~/.config/msushuffle/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `MSUSHUFFLE__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub shuffle: ShuffleSettings,
    pub live: LiveSettings,
    pub observer: ObserverSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShuffleSettings {
    /// How source tracks are chosen for each destination track.
    pub mode: ShuffleMode,
    /// Directory whose subdirectories are the MSU packs to draw from.
    pub collection_root: PathBuf,
    /// Pack directory used when `mode = "single-pool"`.
    pub single_pool: Option<PathBuf>,
    /// Directory the shuffled pack is written into.
    pub output_dir: PathBuf,
    /// Output files are named `<output_prefix>-<track>.pcm`.
    pub output_prefix: String,
    /// File extensions to treat as tracks (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while scanning packs.
    pub follow_links: bool,
    /// Ignore any persisted index and rescan the packs.
    pub rebuild_index: bool,
    pub copy_strategy: CopyStrategy,
    /// Log the picks without touching the output directory.
    pub dry_run: bool,
    /// Fixed seed for reproducible shuffles.
    pub seed: Option<u64>,
    /// Defaults to `<output_dir>/<output_prefix>.index.json`.
    pub index_path: Option<PathBuf>,
    /// Defaults to `<output_dir>/<output_prefix>.selection.json`.
    pub record_path: Option<PathBuf>,
}

impl Default for ShuffleSettings {
    fn default() -> Self {
        Self {
            mode: ShuffleMode::Default,
            collection_root: PathBuf::from(".."),
            single_pool: None,
            output_dir: PathBuf::from("."),
            output_prefix: "shuffled".to_string(),
            extensions: vec!["pcm".into()],
            follow_links: true,
            rebuild_index: false,
            copy_strategy: CopyStrategy::HardLink,
            dry_run: false,
            seed: None,
            index_path: None,
            record_path: None,
        }
    }
}

impl ShuffleSettings {
    pub fn resolved_index_path(&self) -> PathBuf {
        self.index_path.clone().unwrap_or_else(|| {
            self.output_dir
                .join(format!("{}.index.json", self.output_prefix))
        })
    }

    pub fn resolved_record_path(&self) -> PathBuf {
        self.record_path.clone().unwrap_or_else(|| {
            self.output_dir
                .join(format!("{}.selection.json", self.output_prefix))
        })
    }

    /// The single pool to scan, when the mode restricts scanning to one pack.
    pub fn pool_restriction(&self) -> Option<&PathBuf> {
        match self.mode {
            ShuffleMode::SinglePool => self.single_pool.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShuffleMode {
    /// Same track number from a random pack; extended tracks may fall back
    /// to their generic track.
    #[serde(alias = "xshuffle")]
    Default,
    /// Same track number from a random pack, no extended fallback.
    Basic,
    /// Looping tracks are shuffled among themselves.
    #[serde(alias = "trackshuffle", alias = "track-shuffle")]
    Full,
    /// Like `Basic`, but every track comes from one pack.
    #[serde(alias = "singleshuffle", alias = "single_pool", alias = "single")]
    SinglePool,
}

impl ShuffleMode {
    /// Whether extended tracks may be stood in for by their generic backup.
    pub fn uses_extended_backups(self) -> bool {
        matches!(self, ShuffleMode::Default)
    }
}

/// Accepts the same names and aliases as the config file.
impl FromStr for ShuffleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let de: StrDeserializer<'_, value::Error> = s.into_deserializer();
        Self::deserialize(de).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyStrategy {
    /// Hard link into place, falling back to a copy across filesystems.
    #[serde(alias = "hardlink", alias = "link")]
    HardLink,
    /// Always copy the bytes.
    #[serde(alias = "realcopy", alias = "copy")]
    RealCopy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    /// Reshuffle every N seconds. `None` runs a single shuffle and exits.
    pub interval_secs: Option<u64>,
    /// Stop after this many reshuffles instead of running forever.
    pub cycles: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObserverSettings {
    /// Poll the emulator/console for the current track while reshuffling.
    pub enabled: bool,
    /// Websocket endpoint of the usb2snes-compatible server.
    pub endpoint: String,
    /// Hex address (usb2snes address space) of the current music byte.
    pub address: String,
    /// How long to wait for any single reply (milliseconds).
    pub timeout_ms: u64,
    /// Defaults to `<output_dir>/nowplaying.txt`.
    pub status_path: Option<PathBuf>,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "ws://localhost:8080".to_string(),
            address: "F50130".to_string(),
            timeout_ms: 1000,
            status_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
