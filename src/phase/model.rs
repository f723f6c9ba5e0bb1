//! Phase machine value types: the phase cycle, suppression and timing config.

use crate::config::DisplaySettings;

/// Presentation phases, visited in a fixed cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    BasicInfo,
    BasicScroll,
    BasicInfo2,
    BasicScroll2,
    DiscInfo,
    Header,
}

impl Phase {
    /// The phase that follows `self`. The cycle has no end.
    pub fn next(self) -> Self {
        match self {
            Phase::BasicInfo => Phase::BasicScroll,
            Phase::BasicScroll => Phase::BasicInfo2,
            Phase::BasicInfo2 => Phase::BasicScroll2,
            Phase::BasicScroll2 => Phase::DiscInfo,
            Phase::DiscInfo => Phase::Header,
            Phase::Header => Phase::BasicInfo,
        }
    }
}

/// Whether ticks currently reach the phase logic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Suppression {
    Off,
    /// Swallow this many more ticks, then repaint.
    Ticks(u32),
    /// Swallow every tick until reset or forced.
    Indefinite,
}

/// Timing and geometry the phase machine runs with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhaseConfig {
    /// Display width in characters.
    pub width: usize,
    pub tick_interval_ms: f64,
    /// How long a regular phase stays on screen.
    pub phase_hold_seconds: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self::from(&DisplaySettings::default())
    }
}

impl From<&DisplaySettings> for PhaseConfig {
    fn from(display: &DisplaySettings) -> Self {
        Self {
            width: display.width,
            tick_interval_ms: display.tick_interval_ms,
            phase_hold_seconds: display.phase_hold_seconds,
        }
    }
}

impl PhaseConfig {
    /// Number of ticks covering `seconds`, rounded half to even.
    pub fn seconds_to_ticks(&self, seconds: f64) -> u32 {
        if !(self.tick_interval_ms > 0.0) || !(seconds > 0.0) {
            return 0;
        }
        let ticks = (seconds * 1000.0 / self.tick_interval_ms).round_ties_even();
        ticks.min(u32::MAX as f64) as u32
    }

    pub fn ticks_per_phase(&self) -> u32 {
        self.seconds_to_ticks(self.phase_hold_seconds)
    }
}
