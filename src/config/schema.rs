use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/orbital/config.toml` or `~/.config/orbital/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ORBITAL__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub device: DeviceSettings,
    pub player: PlayerSettings,
    pub text: TextSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display: DisplaySettings::default(),
            device: DeviceSettings::default(),
            player: PlayerSettings::default(),
            text: TextSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Display width in characters.
    pub width: usize,
    /// Time between display ticks (milliseconds). Scrolling advances one
    /// character per tick.
    pub tick_interval_ms: f64,
    /// How long each info phase stays on screen (seconds).
    pub phase_hold_seconds: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            width: 20,
            tick_interval_ms: 150.0,
            phase_hold_seconds: 4.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Serial device the LCD is attached to. Line speed is set outside of
    /// orbital, e.g. `stty -F <path> speed 19200 -onlcr`.
    pub path: PathBuf,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/dev/serial/matrix_orbital"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// MPRIS bus name of the player to follow.
    pub bus_name: String,
    /// How often the player is polled (milliseconds).
    pub poll_interval_ms: u64,
    /// Position drift beyond which a jump counts as a seek (milliseconds).
    pub seek_tolerance_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            bus_name: "org.mpris.MediaPlayer2.quodlibet".to_string(),
            poll_interval_ms: 500,
            seek_tolerance_ms: 2000,
        }
    }
}

/// Fixed texts. Non-ASCII characters are transliterated before display.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Shown centered on the top row of status screens.
    pub header: String,
    pub now_playing: String,
    pub paused: String,
    pub not_playing: String,
    pub seeking: String,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            header: "orbital".to_string(),
            now_playing: "* now playing *".to_string(),
            paused: "* paused *".to_string(),
            not_playing: "* not playing *".to_string(),
            seeking: "Seeking...".to_string(),
        }
    }
}
