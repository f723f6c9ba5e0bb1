//! Tick-driven presentation of the current track.
//!
//! [`PhaseMachine`] owns the display and decides on every tick whether to
//! repaint and what. Phases cycle
//! `BasicInfo -> BasicScroll -> BasicInfo2 -> BasicScroll2 -> DiscInfo -> Header`
//! and back. Scroll phases run until both long fields have scrolled through
//! once, even past the hold time; the header phase lasts half as long.

use tracing::debug;

use crate::display::{DisplayError, DisplaySink, Lcd};
use crate::format::{BasicInfo, Banners, DiscInfo, TrackMetadata, scroll_window};
use crate::protocol::{HAlign, Row};

mod model;

pub use model::*;

pub struct PhaseMachine<S> {
    lcd: Lcd<S>,
    config: PhaseConfig,
    ticks_per_phase: u32,
    banners: Banners,

    /// `None` until a track is loaded; ticks are ignored meanwhile.
    basic: Option<BasicInfo>,
    disc: DiscInfo,

    phase: Phase,
    tick_count: u32,
    suppression: Suppression,
    /// Character offsets of running scrolls. `None` once done or when the
    /// field fits the display.
    scroll_artist: Option<usize>,
    scroll_title: Option<usize>,
    force_refresh: bool,
}

impl<S: DisplaySink> PhaseMachine<S> {
    pub fn new(lcd: Lcd<S>, config: PhaseConfig, banners: Banners) -> Self {
        let mut machine = Self {
            lcd,
            config,
            ticks_per_phase: config.ticks_per_phase(),
            banners,
            basic: None,
            disc: DiscInfo::default(),
            phase: Phase::BasicInfo,
            tick_count: 0,
            suppression: Suppression::Off,
            scroll_artist: None,
            scroll_title: None,
            force_refresh: true,
        };
        machine.reset();
        machine
    }

    pub fn lcd_mut(&mut self) -> &mut Lcd<S> {
        &mut self.lcd
    }

    #[cfg(test)]
    pub fn lcd(&self) -> &Lcd<S> {
        &self.lcd
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Forget the track and start over from `BasicInfo`.
    pub fn reset(&mut self) {
        self.basic = None;
        self.disc = DiscInfo::default();
        self.phase = Phase::BasicInfo;
        self.tick_count = 0;
        self.suppression = Suppression::Off;
        self.scroll_artist = None;
        self.scroll_title = None;
        self.force_refresh = true;
    }

    pub fn set_basic_info(&mut self, artist: Option<&str>, title: Option<&str>) {
        self.basic = Some(BasicInfo::new(artist, title, self.config.width));
        self.restart_scroll();
    }

    pub fn set_disc_info(
        &mut self,
        album: Option<&str>,
        disc_number: Option<&str>,
        track_number: Option<&str>,
    ) {
        self.disc = DiscInfo::new(album, disc_number, track_number, self.config.width);
    }

    pub fn set_track(&mut self, track: &TrackMetadata) {
        self.set_basic_info(track.artist.as_deref(), track.title.as_deref());
        self.set_disc_info(
            track.album.as_deref(),
            track.disc_number.as_deref(),
            track.track_number.as_deref(),
        );
    }

    /// Hold off drawing for `seconds`, or until further notice when negative.
    ///
    /// Scroll positions are kept; drawing resumes with a full repaint.
    pub fn suppress(&mut self, seconds: f64) {
        self.suppression = if seconds < 0.0 {
            Suppression::Indefinite
        } else {
            match self.config.seconds_to_ticks(seconds) {
                0 => Suppression::Off,
                n => Suppression::Ticks(n),
            }
        };
        debug!(suppression = ?self.suppression, "display updates suppressed");
    }

    /// Repaint on the next tick. Lifts an indefinite suppression.
    pub fn force_update(&mut self) {
        self.force_refresh = true;
        if self.suppression == Suppression::Indefinite {
            self.suppression = Suppression::Off;
        }
    }

    pub fn on_tick(&mut self) -> Result<(), DisplayError> {
        if self.basic.is_none() {
            return Ok(());
        }

        match self.suppression {
            Suppression::Indefinite => return Ok(()),
            Suppression::Ticks(n) => {
                let left = n.saturating_sub(1);
                if left == 0 {
                    // Whatever interrupted us left garbage on the screen.
                    self.suppression = Suppression::Off;
                    self.force_refresh = true;
                } else {
                    self.suppression = Suppression::Ticks(left);
                }
                return Ok(());
            }
            Suppression::Off => {}
        }

        self.tick_count += 1;

        match self.phase {
            Phase::BasicInfo | Phase::BasicInfo2 => self.tick_basic_info(),
            Phase::BasicScroll | Phase::BasicScroll2 => self.tick_basic_scroll(),
            Phase::DiscInfo => self.tick_disc_info(),
            Phase::Header => self.tick_header(),
        }
    }

    fn tick_basic_info(&mut self) -> Result<(), DisplayError> {
        if self.force_refresh {
            self.force_refresh = false;
            self.lcd.clear()?;
            self.draw_artist()?;
            self.draw_title()?;
        }

        if self.tick_count > self.ticks_per_phase {
            self.advance_phase();
        }
        Ok(())
    }

    fn tick_basic_scroll(&mut self) -> Result<(), DisplayError> {
        let refresh_artist = self.scroll_artist.is_some() || self.force_refresh;
        let refresh_title = self.scroll_title.is_some() || self.force_refresh;

        if self.tick_count > self.ticks_per_phase
            && self.scroll_artist.is_none()
            && self.scroll_title.is_none()
        {
            self.advance_phase();
            return Ok(());
        }

        if self.force_refresh {
            self.force_refresh = false;
            self.lcd.clear()?;
        }

        let (artist_len, title_len) = self.field_lengths();
        self.scroll_artist = step_scroll(self.scroll_artist, artist_len);
        self.scroll_title = step_scroll(self.scroll_title, title_len);

        if refresh_artist {
            self.draw_artist()?;
        }
        if refresh_title {
            self.draw_title()?;
        }
        Ok(())
    }

    fn tick_disc_info(&mut self) -> Result<(), DisplayError> {
        if self.force_refresh {
            self.force_refresh = false;
            self.lcd.clear()?;
            let width = self.config.width;
            self.lcd
                .write_text(&scroll_window(&self.disc.top, None, width), HAlign::Left, Row::Top)?;
            self.lcd.write_text(
                &scroll_window(&self.disc.bottom, None, width),
                HAlign::Left,
                Row::Bottom,
            )?;
        }

        if self.tick_count > self.ticks_per_phase {
            self.advance_phase();
        }
        Ok(())
    }

    fn tick_header(&mut self) -> Result<(), DisplayError> {
        if self.force_refresh {
            self.force_refresh = false;
            self.lcd
                .header_with_text(&self.banners.header, &self.banners.now_playing)?;
        }

        if self.tick_count > self.ticks_per_phase / 2 {
            self.advance_phase();
        }
        Ok(())
    }

    fn advance_phase(&mut self) {
        self.tick_count = 0;
        self.restart_scroll();
        let next = self.phase.next();
        debug!(from = ?self.phase, to = ?next, "advancing display phase");
        self.phase = next;
        self.force_refresh = true;
    }

    /// Rewind both scrolls, skipping fields that fit the display.
    fn restart_scroll(&mut self) {
        let width = self.config.width;
        let (artist_len, title_len) = self.field_lengths();
        self.scroll_artist = (artist_len > width).then_some(0);
        self.scroll_title = (title_len > width).then_some(0);
    }

    fn field_lengths(&self) -> (usize, usize) {
        self.basic
            .as_ref()
            .map(|b| (b.artist.chars().count(), b.title.chars().count()))
            .unwrap_or((0, 0))
    }

    fn draw_artist(&mut self) -> Result<(), DisplayError> {
        let Some(basic) = self.basic.as_ref() else {
            return Ok(());
        };
        let text = scroll_window(&basic.artist, self.scroll_artist, self.config.width);
        self.lcd.write_text(&text, HAlign::Left, Row::Top)
    }

    fn draw_title(&mut self) -> Result<(), DisplayError> {
        let Some(basic) = self.basic.as_ref() else {
            return Ok(());
        };
        let text = scroll_window(&basic.title, self.scroll_title, self.config.width);
        self.lcd.write_text(&text, HAlign::Left, Row::Bottom)
    }
}

/// Move a running scroll one character on; it ends after passing `len`.
fn step_scroll(offset: Option<usize>, len: usize) -> Option<usize> {
    offset.map(|o| o + 1).filter(|&o| o <= len)
}
