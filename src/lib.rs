//! Now-playing display for Matrix Orbital character LCDs.
//!
//! Follows an MPRIS media player and cycles track details across a two-row
//! serial LCD: artist and title, scrolled when too long, then album, disc
//! and track number, then a header banner.

pub mod config;
pub mod device;
pub mod display;
pub mod format;
pub mod mpris;
pub mod phase;
pub mod protocol;
pub mod runtime;
pub mod session;
