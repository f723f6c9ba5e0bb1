//! Player events in, display updates out.
//!
//! A [`Session`] lives from display power-on to power-off. It reacts to
//! playback events with immediate status screens and leaves everything else
//! to the phase machine, which it feeds with ticks.

use tracing::{debug, info};

use crate::display::{DisplayError, DisplaySink, Lcd};
use crate::format::{Banners, TrackMetadata, seek_percent};
use crate::phase::{PhaseConfig, PhaseMachine};
use crate::protocol;

/// How long the seek bar stays up before the phases resume.
const SEEK_HOLD_SECONDS: f64 = 1.0;

/// Playback events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    TrackStarted(TrackMetadata),
    TrackEnded,
    Paused,
    Unpaused,
    /// Playback jumped to `elapsed_ms` of a `total_ms` long track.
    Seek { elapsed_ms: u64, total_ms: u64 },
}

pub struct Session<S> {
    machine: PhaseMachine<S>,
    banners: Banners,
    paused: bool,
}

impl<S: DisplaySink> Session<S> {
    pub fn new(lcd: Lcd<S>, config: PhaseConfig, banners: Banners) -> Self {
        let banners = banners.fitted(config.width);
        Self {
            machine: PhaseMachine::new(lcd, config, banners.clone()),
            banners,
            paused: false,
        }
    }

    /// Power the display up and show the header.
    pub fn start(&mut self) -> Result<(), DisplayError> {
        info!("starting display session");
        let lcd = self.machine.lcd_mut();
        lcd.clear()?;
        lcd.write_raw(&protocol::READY_HORIZONTAL_BARS)?;
        lcd.write_raw(&protocol::BACKLIGHT_ON)?;
        lcd.write_header(&self.banners.header)
    }

    /// Blank the display and switch the backlight off.
    pub fn stop(&mut self) -> Result<(), DisplayError> {
        info!("stopping display session");
        let lcd = self.machine.lcd_mut();
        lcd.clear()?;
        lcd.write_raw(&protocol::BACKLIGHT_OFF)
    }

    pub fn handle(&mut self, event: PlayerEvent) -> Result<(), DisplayError> {
        match event {
            PlayerEvent::TrackStarted(track) => self.on_track_start(&track),
            PlayerEvent::TrackEnded => self.on_track_end(),
            PlayerEvent::Paused => self.on_pause(),
            PlayerEvent::Unpaused => self.on_unpause(),
            PlayerEvent::Seek {
                elapsed_ms,
                total_ms,
            } => self.on_seek(elapsed_ms, total_ms),
        }
    }

    pub fn on_track_start(&mut self, track: &TrackMetadata) -> Result<(), DisplayError> {
        info!(
            artist = track.artist.as_deref().unwrap_or(""),
            title = track.title.as_deref().unwrap_or(""),
            "track started"
        );
        self.paused = false;
        self.machine.reset();
        self.machine.set_track(track);
        self.machine.lcd_mut().clear()
    }

    pub fn on_track_end(&mut self) -> Result<(), DisplayError> {
        info!("track ended");
        self.paused = false;
        self.machine.reset();
        self.machine
            .lcd_mut()
            .header_with_text(&self.banners.header, &self.banners.not_playing)
    }

    /// Show the paused banner and hold it until playback resumes.
    pub fn on_pause(&mut self) -> Result<(), DisplayError> {
        debug!("playback paused");
        self.paused = true;
        self.machine.suppress(-1.0);
        self.machine
            .lcd_mut()
            .header_with_text(&self.banners.header, &self.banners.paused)
    }

    pub fn on_unpause(&mut self) -> Result<(), DisplayError> {
        debug!("playback resumed");
        self.paused = false;
        self.machine.force_update();
        Ok(())
    }

    /// Flash a progress bar for the new position, then resume the phases.
    ///
    /// While paused the bar stays up until playback resumes.
    pub fn on_seek(&mut self, elapsed_ms: u64, total_ms: u64) -> Result<(), DisplayError> {
        let percent = seek_percent(elapsed_ms, total_ms);
        debug!(elapsed_ms, total_ms, percent, "seek");
        if !self.paused {
            self.machine.suppress(SEEK_HOLD_SECONDS);
        }
        let lcd = self.machine.lcd_mut();
        lcd.clear()?;
        lcd.write_header(&self.banners.seeking)?;
        lcd.progress_bar(percent)
    }

    pub fn on_tick(&mut self) -> Result<(), DisplayError> {
        self.machine.on_tick()
    }

    #[cfg(test)]
    pub fn lcd(&self) -> &Lcd<S> {
        self.machine.lcd()
    }
}
