//! Turning polled MPRIS properties into playback events.

use std::collections::HashMap;
use std::time::Duration;

use zvariant::{OwnedValue, Value};

use crate::format::TrackMetadata;
use crate::session::PlayerEvent;

/// Track id players use when nothing is loaded.
const NO_TRACK: &str = "/org/mpris/MediaPlayer2/TrackList/NoTrack";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Playing,
    Paused,
    Stopped,
}

impl Status {
    /// Map an MPRIS `PlaybackStatus` string. Unknown values count as stopped.
    pub fn parse(status: &str) -> Self {
        match status {
            "Playing" => Status::Playing,
            "Paused" => Status::Paused,
            _ => Status::Stopped,
        }
    }
}

/// Player state at one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status: Status,
    pub track_id: Option<String>,
    pub track: TrackMetadata,
    pub length_ms: Option<u64>,
    pub position_ms: Option<u64>,
}

impl Snapshot {
    /// The player is gone or not answering.
    pub fn absent() -> Self {
        Self {
            status: Status::Stopped,
            track_id: None,
            track: TrackMetadata::default(),
            length_ms: None,
            position_ms: None,
        }
    }

    pub fn from_properties(
        status: &str,
        metadata: &HashMap<String, OwnedValue>,
        position_us: Option<i64>,
    ) -> Self {
        let text = |key: &str| metadata.get(key).and_then(|v| string_of(v));
        let track = TrackMetadata {
            artist: text("xesam:artist"),
            title: text("xesam:title"),
            album: text("xesam:album"),
            disc_number: text("xesam:discNumber"),
            track_number: text("xesam:trackNumber"),
        };

        Self {
            status: Status::parse(status),
            track_id: text("mpris:trackid").filter(|id| id != NO_TRACK),
            track,
            length_ms: metadata
                .get("mpris:length")
                .and_then(|v| integer_of(v))
                .map(micros_to_millis),
            position_ms: position_us.map(micros_to_millis),
        }
    }

    /// What makes two polls "the same track".
    fn identity(&self) -> String {
        match &self.track_id {
            Some(id) => id.clone(),
            None => {
                let t = &self.track;
                format!(
                    "{}\u{1f}{}\u{1f}{}",
                    t.artist.as_deref().unwrap_or(""),
                    t.title.as_deref().unwrap_or(""),
                    t.album.as_deref().unwrap_or("")
                )
            }
        }
    }
}

fn micros_to_millis(us: i64) -> u64 {
    (us.max(0) / 1000) as u64
}

/// Render a metadata value as display text. String lists are joined.
pub(crate) fn string_of(value: &Value<'_>) -> Option<String> {
    let text = match value {
        Value::Str(s) => s.as_str().trim().to_string(),
        Value::ObjectPath(p) => p.as_str().to_string(),
        Value::Value(inner) => return string_of(inner),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(string_of).collect();
            parts.join(", ")
        }
        other => integer_of(other)?.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

pub(crate) fn integer_of(value: &Value<'_>) -> Option<i64> {
    match value {
        Value::U8(n) => Some(i64::from(*n)),
        Value::I16(n) => Some(i64::from(*n)),
        Value::U16(n) => Some(i64::from(*n)),
        Value::I32(n) => Some(i64::from(*n)),
        Value::U32(n) => Some(i64::from(*n)),
        Value::I64(n) => Some(*n),
        Value::U64(n) => i64::try_from(*n).ok(),
        Value::Value(inner) => integer_of(inner),
        _ => None,
    }
}

#[derive(Debug)]
struct Current {
    identity: String,
    status: Status,
    position_ms: Option<u64>,
}

/// Remembers the previous poll and reports what changed since.
#[derive(Debug)]
pub struct Tracker {
    current: Option<Current>,
    seek_tolerance_ms: u64,
}

impl Tracker {
    pub fn new(seek_tolerance_ms: u64) -> Self {
        Self {
            current: None,
            seek_tolerance_ms,
        }
    }

    /// Events for `snapshot`, taken `elapsed` after the previous one.
    pub fn update(&mut self, snapshot: &Snapshot, elapsed: Duration) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if snapshot.status == Status::Stopped {
            if self.current.take().is_some() {
                events.push(PlayerEvent::TrackEnded);
            }
            return events;
        }

        let identity = snapshot.identity();
        if let Some(current) = self.current.as_mut().filter(|c| c.identity == identity) {
            match (current.status, snapshot.status) {
                (Status::Playing, Status::Paused) => events.push(PlayerEvent::Paused),
                (Status::Paused, Status::Playing) => events.push(PlayerEvent::Unpaused),
                _ => {}
            }

            if let (Some(before), Some(now)) = (current.position_ms, snapshot.position_ms) {
                let expected = if current.status == Status::Playing {
                    before.saturating_add(elapsed.as_millis() as u64)
                } else {
                    before
                };
                if now.abs_diff(expected) > self.seek_tolerance_ms {
                    events.push(PlayerEvent::Seek {
                        elapsed_ms: now,
                        total_ms: snapshot.length_ms.unwrap_or(0),
                    });
                }
            }

            current.status = snapshot.status;
            current.position_ms = snapshot.position_ms;
            return events;
        }

        events.push(PlayerEvent::TrackStarted(snapshot.track.clone()));
        if snapshot.status == Status::Paused {
            events.push(PlayerEvent::Paused);
        }
        self.current = Some(Current {
            identity,
            status: snapshot.status,
            position_ms: snapshot.position_ms,
        });

        events
    }
}
