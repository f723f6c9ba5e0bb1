use tracing::{debug, warn};

use crate::config::{self, Settings};

/// Settings for this run. A broken config never keeps the display dark:
/// anything unusable is replaced by the defaults.
pub fn load_settings() -> Settings {
    let path = config::resolve_config_path();
    debug!(path = ?path, "loading config");

    let settings = match Settings::load_from(path.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            warn!("failed to load config, using defaults: {e}");
            return Settings::default();
        }
    };

    match settings.validate() {
        Ok(()) => settings,
        Err(msg) => {
            warn!("invalid config, using defaults: {msg}");
            Settings::default()
        }
    }
}
