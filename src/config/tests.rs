use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_msushuffle_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MSUSHUFFLE_CONFIG_PATH", "/tmp/msushuffle-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/msushuffle-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("msushuffle")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("msushuffle")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_mode_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[shuffle]
mode = "trackshuffle"
collection_root = "/srv/msu"
output_dir = "/srv/msu/shuffled"
output_prefix = "alttp"
extensions = ["pcm", "PCM"]
copy_strategy = "copy"
dry_run = true
seed = 7

[live]
interval_secs = 10

[observer]
enabled = true
endpoint = "ws://localhost:23074"
timeout_ms = 250

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MSUSHUFFLE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MSUSHUFFLE__SHUFFLE__MODE");

    let s = Settings::load().unwrap();
    assert_eq!(s.shuffle.mode, ShuffleMode::Full);
    assert_eq!(s.shuffle.collection_root, PathBuf::from("/srv/msu"));
    assert_eq!(s.shuffle.output_prefix, "alttp");
    assert_eq!(s.shuffle.copy_strategy, CopyStrategy::RealCopy);
    assert!(s.shuffle.dry_run);
    assert_eq!(s.shuffle.seed, Some(7));
    assert_eq!(
        s.shuffle.resolved_index_path(),
        PathBuf::from("/srv/msu/shuffled/alttp.index.json")
    );
    assert_eq!(
        s.shuffle.resolved_record_path(),
        PathBuf::from("/srv/msu/shuffled/alttp.selection.json")
    );
    assert_eq!(s.live.interval_secs, Some(10));
    assert!(s.observer.enabled);
    assert_eq!(s.observer.endpoint, "ws://localhost:23074");
    assert_eq!(s.observer.address, "F50130");
    assert_eq!(s.observer.timeout_ms, 250);
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[shuffle]
mode = "basic"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MSUSHUFFLE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MSUSHUFFLE__SHUFFLE__MODE", "full");

    let s = Settings::load().unwrap();
    assert_eq!(s.shuffle.mode, ShuffleMode::Full);
}

#[test]
fn validate_requires_a_pool_for_single_pool_mode() {
    let mut s = Settings::default();
    s.shuffle.mode = ShuffleMode::SinglePool;
    assert!(s.validate().is_err());

    s.shuffle.single_pool = Some(PathBuf::from("../some-pack"));
    assert!(s.validate().is_ok());
    assert_eq!(
        s.shuffle.pool_restriction(),
        Some(&PathBuf::from("../some-pack"))
    );

    s.shuffle.mode = ShuffleMode::Basic;
    assert_eq!(s.shuffle.pool_restriction(), None);
}

#[test]
fn validate_rejects_zero_observer_timeout() {
    let mut s = Settings::default();
    s.observer.timeout_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn only_default_mode_uses_extended_backups() {
    assert!(ShuffleMode::Default.uses_extended_backups());
    assert!(!ShuffleMode::Basic.uses_extended_backups());
    assert!(!ShuffleMode::Full.uses_extended_backups());
    assert!(!ShuffleMode::SinglePool.uses_extended_backups());
}

#[test]
fn modes_parse_from_cli_names_and_aliases() {
    assert_eq!("full".parse::<ShuffleMode>(), Ok(ShuffleMode::Full));
    assert_eq!("trackshuffle".parse::<ShuffleMode>(), Ok(ShuffleMode::Full));
    assert_eq!("single-pool".parse::<ShuffleMode>(), Ok(ShuffleMode::SinglePool));
    assert_eq!("xshuffle".parse::<ShuffleMode>(), Ok(ShuffleMode::Default));
    assert!("shuffle-everything".parse::<ShuffleMode>().is_err());
}

#[test]
fn validate_rejects_zero_live_cycles() {
    let mut s = Settings::default();
    s.live.cycles = Some(0);
    assert!(s.validate().is_err());

    s.live.cycles = Some(1);
    assert!(s.validate().is_ok());
}
