use std::env;
use std::path::PathBuf;

use tracing::{error, info};

use crate::config;
use crate::device::SerialDevice;
use crate::display::Lcd;
use crate::format::Banners;
use crate::phase::PhaseConfig;
use crate::session::Session;

/// Device path from the first argument, else from settings.
pub fn device_path(settings: &config::Settings) -> PathBuf {
    env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.device.path.clone())
}

/// Build the session around the configured device.
///
/// A device that cannot be opened leaves the session detached: everything
/// keeps running, nothing reaches the display.
pub fn open_session(settings: &config::Settings) -> Session<SerialDevice> {
    let width = settings.display.width;
    let path = device_path(settings);

    let lcd = match SerialDevice::open(&path) {
        Ok(device) => {
            info!(path = %path.display(), width, "LCD device opened");
            Lcd::new(device, width)
        }
        Err(e) => {
            error!("{e}");
            Lcd::detached(width)
        }
    };

    Session::new(
        lcd,
        PhaseConfig::from(&settings.display),
        Banners::from(&settings.text),
    )
}
