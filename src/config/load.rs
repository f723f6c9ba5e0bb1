use std::env;
use std::path::{Path, PathBuf};

use super::schema::Settings;

/// Upper bounds for timing values.
const MAX_TICK_INTERVAL_MS: f64 = 60_000.0;
const MAX_PHASE_HOLD_SECONDS: f64 = 3_600.0;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ORBITAL__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and the config file at the resolved path.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from environment and an optional config file at `path`.
    /// A missing file is not an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ORBITAL")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let display = &self.display;
        if display.width == 0 {
            return Err("display.width must be >= 1".to_string());
        }
        if !(display.tick_interval_ms > 0.0 && display.tick_interval_ms <= MAX_TICK_INTERVAL_MS) {
            return Err(format!(
                "display.tick_interval_ms must be in (0, {MAX_TICK_INTERVAL_MS}]"
            ));
        }
        if !(0.0..=MAX_PHASE_HOLD_SECONDS).contains(&display.phase_hold_seconds) {
            return Err(format!(
                "display.phase_hold_seconds must be in [0, {MAX_PHASE_HOLD_SECONDS}]"
            ));
        }
        if self.player.poll_interval_ms == 0 {
            return Err("player.poll_interval_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Config file named by `ORBITAL_CONFIG_PATH`, else the XDG location.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("ORBITAL_CONFIG_PATH")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `orbital/config.toml` under the XDG config home.
///
/// An empty or relative `XDG_CONFIG_HOME` falls back to `$HOME/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute());
    let home = || env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"));

    xdg.or_else(home).map(|base| base.join("orbital").join("config.toml"))
}
