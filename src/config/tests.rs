use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use super::load::{default_config_path, resolve_config_path};
use super::schema::*;

static ENV: Mutex<()> = Mutex::new(());

/// Process environment overrides for one test. Tests holding a `ScopedEnv`
/// run one at a time; every touched variable is restored on drop.
struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV.lock().unwrap_or_else(|e| e.into_inner()),
        }
    }

    fn with(mut self, key: &'static str, value: Option<&str>) -> Self {
        self.saved.push((key, std::env::var_os(key)));
        // SAFETY: serialized by `ENV`.
        unsafe {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        self
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..).rev() {
            // SAFETY: serialized by `ENV`.
            unsafe {
                match old {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

#[test]
fn explicit_config_path_wins() {
    let _env = ScopedEnv::new().with("ORBITAL_CONFIG_PATH", Some("/etc/orbital.toml"));
    assert_eq!(resolve_config_path(), Some(PathBuf::from("/etc/orbital.toml")));
}

#[test]
fn empty_config_path_is_ignored() {
    let _env = ScopedEnv::new()
        .with("ORBITAL_CONFIG_PATH", Some(""))
        .with("XDG_CONFIG_HOME", Some("/xdg"));
    assert_eq!(
        resolve_config_path(),
        Some(PathBuf::from("/xdg/orbital/config.toml"))
    );
}

#[test]
fn xdg_config_home_beats_home() {
    let _env = ScopedEnv::new()
        .with("XDG_CONFIG_HOME", Some("/xdg"))
        .with("HOME", Some("/home/user"));
    assert_eq!(
        default_config_path(),
        Some(PathBuf::from("/xdg/orbital/config.toml"))
    );
}

#[test]
fn unset_or_relative_xdg_config_home_uses_home() {
    let expected = Some(PathBuf::from("/home/user/.config/orbital/config.toml"));

    let env = ScopedEnv::new()
        .with("XDG_CONFIG_HOME", None)
        .with("HOME", Some("/home/user"));
    assert_eq!(default_config_path(), expected);
    drop(env);

    let _env = ScopedEnv::new()
        .with("XDG_CONFIG_HOME", Some("relative/dir"))
        .with("HOME", Some("/home/user"));
    assert_eq!(default_config_path(), expected);
}

#[test]
fn defaults_match_a_20_column_module() {
    let s = Settings::default();
    assert_eq!(s.display.width, 20);
    assert_eq!(s.display.tick_interval_ms, 150.0);
    assert_eq!(s.display.phase_hold_seconds, 4.0);
    assert_eq!(
        s.device.path,
        PathBuf::from("/dev/serial/matrix_orbital")
    );
    assert!(s.validate().is_ok());
}

#[test]
fn schema_parses_partial_toml() {
    let s: Settings = toml::from_str(
        r#"
[display]
width = 16

[text]
paused = "PAUSE"
"#,
    )
    .unwrap();
    assert_eq!(s.display.width, 16);
    assert_eq!(s.display.tick_interval_ms, 150.0);
    assert_eq!(s.text.paused, "PAUSE");
    assert_eq!(s.text.now_playing, "* now playing *");
}

#[test]
fn settings_load_from_config_file() {
    let _env = ScopedEnv::new().with("ORBITAL__DISPLAY__WIDTH", None);

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[display]
width = 40
tick_interval_ms = 100.0
phase_hold_seconds = 2.5

[device]
path = "/dev/ttyUSB0"

[player]
bus_name = "org.mpris.MediaPlayer2.mpv"
poll_interval_ms = 250
seek_tolerance_ms = 1500

[text]
header = "Living room"
not_playing = "- idle -"
"#,
    )
    .unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.display.width, 40);
    assert_eq!(s.display.tick_interval_ms, 100.0);
    assert_eq!(s.display.phase_hold_seconds, 2.5);
    assert_eq!(s.device.path, PathBuf::from("/dev/ttyUSB0"));
    assert_eq!(s.player.bus_name, "org.mpris.MediaPlayer2.mpv");
    assert_eq!(s.player.poll_interval_ms, 250);
    assert_eq!(s.player.seek_tolerance_ms, 1500);
    assert_eq!(s.text.header, "Living room");
    assert_eq!(s.text.not_playing, "- idle -");
    assert_eq!(s.text.paused, "* paused *");
}

#[test]
fn settings_load_tolerates_missing_file() {
    let _env = ScopedEnv::new().with("ORBITAL__DISPLAY__WIDTH", None);

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s.display.width, 20);
}

#[test]
fn settings_env_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[display]
width = 40
"#,
    )
    .unwrap();

    let _env = ScopedEnv::new()
        .with("ORBITAL_CONFIG_PATH", cfg_path.to_str())
        .with("ORBITAL__DISPLAY__WIDTH", Some("16"));

    let s = Settings::load().unwrap();
    assert_eq!(s.display.width, 16);
}

#[test]
fn validate_rejects_unusable_geometry_and_timing() {
    let mut s = Settings::default();
    s.display.width = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.display.tick_interval_ms = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.display.phase_hold_seconds = -1.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.poll_interval_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_non_finite_and_oversized_timing() {
    for bad in [f64::INFINITY, f64::NAN, 1e300, 60_001.0] {
        let mut s = Settings::default();
        s.display.tick_interval_ms = bad;
        assert!(s.validate().is_err(), "tick_interval_ms = {bad}");
    }

    for bad in [f64::INFINITY, f64::NAN, 1e300] {
        let mut s = Settings::default();
        s.display.phase_hold_seconds = bad;
        assert!(s.validate().is_err(), "phase_hold_seconds = {bad}");
    }

    let mut s = Settings::default();
    s.display.tick_interval_ms = 60_000.0;
    s.display.phase_hold_seconds = 0.0;
    assert!(s.validate().is_ok());
}

#[test]
fn infinite_tick_interval_loads_but_fails_validation() {
    let _env = ScopedEnv::new().with("ORBITAL__DISPLAY__TICK_INTERVAL_MS", None);

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[display]\ntick_interval_ms = inf\n").unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert!(s.display.tick_interval_ms.is_infinite());
    assert!(s.validate().is_err());
}

#[test]
fn infinite_tick_interval_from_env_fails_validation() {
    let _env = ScopedEnv::new().with("ORBITAL__DISPLAY__TICK_INTERVAL_MS", Some("inf"));

    let s = Settings::load_from(None).unwrap();
    assert!(s.validate().is_err());
}
