//! vidscii library crate.
//!
//! Decodes a video with ffmpeg and plays it back as colored ASCII art sized to
//! the terminal. The modules are exposed for the binary and for integration
//! testing.

pub mod ascii;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod playback;
pub mod signal;
pub mod terminal;
pub mod video;
