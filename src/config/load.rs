use std::{env, path::PathBuf};

use super::schema::{Settings, ShuffleMode};

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `MSUSHUFFLE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MSUSHUFFLE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.shuffle.mode == ShuffleMode::SinglePool && self.shuffle.single_pool.is_none() {
            return Err("shuffle.single_pool is required when mode = \"single-pool\"".to_string());
        }
        if self.shuffle.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("shuffle.extensions must name at least one extension".to_string());
        }
        if self.shuffle.output_prefix.trim().is_empty() {
            return Err("shuffle.output_prefix must not be empty".to_string());
        }
        if self.live.cycles == Some(0) {
            return Err("live.cycles must be >= 1".to_string());
        }
        if self.observer.timeout_ms == 0 {
            return Err("observer.timeout_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `MSUSHUFFLE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MSUSHUFFLE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/msushuffle/config.toml`
/// or `~/.config/msushuffle/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("msushuffle").join("config.toml"))
}
