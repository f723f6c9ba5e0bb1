//! Serial device transport.
//!
//! The LCD shows up as a character device; line settings are expected to be
//! configured already, so this is nothing more than an unbuffered writer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::display::{DisplayError, DisplaySink};

#[derive(Debug, Error)]
#[error("LCD device not found at {}: {source}", .path.display())]
pub struct OpenError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub struct SerialDevice<W = File> {
    port: W,
}

impl SerialDevice {
    /// Open `path` for writing.
    pub fn open(path: &Path) -> Result<Self, OpenError> {
        let port = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| OpenError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { port })
    }
}

impl<W: Write> SerialDevice<W> {
    pub fn from_writer(port: W) -> Self {
        Self { port }
    }
}

impl<W: Write> DisplaySink for SerialDevice<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}
