//! Display sink abstraction and the `Lcd` front end used by the phase machine.
//!
//! A [`DisplaySink`] only knows how to push bytes to the device. [`Lcd`] sits
//! on top of it and turns "clear", "write this text there" and friends into the
//! controller's byte protocol.

use thiserror::Error;
use tracing::warn;

use crate::protocol::{self, HAlign, Row};

/// Errors raised while talking to the display.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The transport refused the write. The session cannot recover from this.
    #[error("display write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw byte destination, usually a serial device.
pub trait DisplaySink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;
}

/// A character display of `width` columns, possibly without a device behind it.
///
/// Writes to a detached `Lcd` are dropped; the first one is reported.
pub struct Lcd<S> {
    sink: Option<S>,
    width: usize,
    reported_detached: bool,
}

impl<S: DisplaySink> Lcd<S> {
    pub fn new(sink: S, width: usize) -> Self {
        Self {
            sink: Some(sink),
            width,
            reported_detached: false,
        }
    }

    /// An `Lcd` with no device. Used when the device could not be opened.
    pub fn detached(width: usize) -> Self {
        Self {
            sink: None,
            width,
            reported_detached: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Send bytes as-is.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        match self.sink.as_mut() {
            Some(sink) => sink.write_bytes(bytes),
            None => {
                if !self.reported_detached {
                    self.reported_detached = true;
                    warn!("LCD not initialized correctly, dropping display output");
                }
                Ok(())
            }
        }
    }

    /// Empty the screen and send the cursor home.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.write_raw(&protocol::clear_and_home())
    }

    pub fn write_text(&mut self, text: &str, align: HAlign, row: Row) -> Result<(), DisplayError> {
        let bytes = protocol::encode(text, align, row, self.width);
        self.write_raw(&bytes)
    }

    /// Centered text on the top row.
    pub fn write_header(&mut self, header: &str) -> Result<(), DisplayError> {
        self.write_text(header, HAlign::Center, Row::Top)
    }

    /// Fresh screen with `header` on top and `text` centered below it.
    pub fn header_with_text(&mut self, header: &str, text: &str) -> Result<(), DisplayError> {
        self.clear()?;
        self.write_header(header)?;
        self.write_text(text, HAlign::Center, Row::Bottom)
    }

    pub fn progress_bar(&mut self, percent: u8) -> Result<(), DisplayError> {
        self.write_raw(&protocol::progress_bar(percent))
    }

    #[cfg(test)]
    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    #[cfg(test)]
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{DisplayError, DisplaySink};

    /// A text run decoded from a cursor positioning write.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Drawn {
        pub column: u8,
        pub row: u8,
        pub text: String,
    }

    /// Test double that keeps every write.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub writes: Vec<Vec<u8>>,
        /// When set, every write fails with a broken pipe.
        pub fail: bool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Everything written so far, concatenated.
        pub fn bytes(&self) -> Vec<u8> {
            self.writes.concat()
        }

        /// Forget recorded writes.
        pub fn clear(&mut self) {
            self.writes.clear();
        }

        pub fn clears(&self) -> usize {
            self.writes
                .iter()
                .filter(|w| w.as_slice() == crate::protocol::CLEAR_AND_HOME)
                .count()
        }

        /// Text runs in write order.
        pub fn drawn(&self) -> Vec<Drawn> {
            self.writes
                .iter()
                .filter_map(|w| match w.as_slice() {
                    [0xFE, 0x47, column, row, text @ ..] => Some(Drawn {
                        column: *column,
                        row: *row,
                        text: String::from_utf8_lossy(text).into_owned(),
                    }),
                    _ => None,
                })
                .collect()
        }

        /// Texts drawn on the given row selector, in order.
        pub fn drawn_on(&self, row: u8) -> Vec<String> {
            self.drawn()
                .into_iter()
                .filter(|d| d.row == row)
                .map(|d| d.text)
                .collect()
        }
    }

    impl DisplaySink for RecordingSink {
        fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
            if self.fail {
                return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into());
            }
            self.writes.push(bytes.to_vec());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
