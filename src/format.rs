//! Text payloads for each presentation phase.
//!
//! Everything produced here is plain ASCII sized for a `width` column display:
//! metadata is transliterated first, then padded, truncated or justified.

use deunicode::deunicode;

use crate::config::TextSettings;

/// Marker appended to truncated album titles.
const ELLIPSIS: &str = "...";

/// Replace any non-ASCII text with its closest ASCII spelling.
pub fn transliterate(text: &str) -> String {
    deunicode(text)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Metadata of the track currently playing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub disc_number: Option<String>,
    pub track_number: Option<String>,
}

/// Artist and title rows.
///
/// A field wider than the display gets `width` blanks appended, so a scroll
/// runs the text off the left edge, shows an empty gap and starts over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    pub artist: String,
    pub title: String,
}

impl BasicInfo {
    pub fn new(artist: Option<&str>, title: Option<&str>, width: usize) -> Self {
        Self {
            artist: pad_for_scroll(transliterate(artist.unwrap_or_default()), width),
            title: pad_for_scroll(transliterate(title.unwrap_or_default()), width),
        }
    }
}

fn pad_for_scroll(mut text: String, width: usize) -> String {
    if char_len(&text) > width {
        text.extend(std::iter::repeat_n(' ', width));
    }
    text
}

/// Album on the top row; disc and track numbers on the bottom row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscInfo {
    pub top: String,
    pub bottom: String,
}

impl DiscInfo {
    pub fn new(
        album: Option<&str>,
        disc_number: Option<&str>,
        track_number: Option<&str>,
        width: usize,
    ) -> Self {
        let top = album
            .map(|a| truncate_with_ellipsis(&transliterate(a), width))
            .unwrap_or_default();

        let mut bottom = String::new();
        if let Some(disc) = disc_number {
            bottom = format!("Disc {} ", transliterate(disc));
        }
        if let Some(track) = track_number {
            let track = format!("Track {}", transliterate(track));
            let room = width.saturating_sub(char_len(&bottom));
            bottom.push_str(&format!("{track:>room$}"));
        }

        Self { top, bottom }
    }
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
///
/// Displays too narrow to hold the marker get a plain cut.
pub fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    if char_len(text) <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// The visible part of `text` scrolled left by `offset` characters.
///
/// A positive offset rotates the text, `text[offset..] + text`; the result is
/// then cut to `width`.
pub fn scroll_window(text: &str, offset: Option<usize>, width: usize) -> String {
    match offset {
        Some(offset) if offset > 0 => text
            .chars()
            .skip(offset)
            .chain(text.chars())
            .take(width)
            .collect(),
        _ => text.chars().take(width).collect(),
    }
}

/// Playback position as a 0-100 bar length. A zero-length track reads as 0.
pub fn seek_percent(elapsed_ms: u64, total_ms: u64) -> u8 {
    if total_ms == 0 {
        return 0;
    }
    let percent = (elapsed_ms as f64 * 100.0 / total_ms as f64).round_ties_even();
    percent.clamp(0.0, 100.0) as u8
}

/// Fixed status texts shown around the metadata phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banners {
    /// Top row of every status screen.
    pub header: String,
    pub now_playing: String,
    pub paused: String,
    pub not_playing: String,
    pub seeking: String,
}

impl Default for Banners {
    fn default() -> Self {
        Self::from(&TextSettings::default())
    }
}

impl From<&TextSettings> for Banners {
    fn from(text: &TextSettings) -> Self {
        Self {
            header: transliterate(&text.header),
            now_playing: transliterate(&text.now_playing),
            paused: transliterate(&text.paused),
            not_playing: transliterate(&text.not_playing),
            seeking: transliterate(&text.seeking),
        }
    }
}

impl Banners {
    /// Cut every banner to the display width.
    pub fn fitted(self, width: usize) -> Self {
        let fit = |s: String| -> String { s.chars().take(width).collect() };
        Self {
            header: fit(self.header),
            now_playing: fit(self.now_playing),
            paused: fit(self.paused),
            not_playing: fit(self.not_playing),
            seeking: fit(self.seeking),
        }
    }
}
