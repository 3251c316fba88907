//! Video sources: frame types, the [`FrameSource`] trait, and the ffmpeg adapter.

mod errors;
mod ffmpeg;
mod frame;
mod probe;

pub use errors::VideoError;
pub use ffmpeg::FfmpegSource;
pub use frame::{Frame, Rgba16};
pub use probe::{parse_probe_output, parse_rational, probe};

/// Stream metadata reported by a frame source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoInfo {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Total number of frames (0 if unknown)
    pub frame_count: u64,
    /// Duration in seconds (0.0 if unknown)
    pub duration: f64,
    /// Nominal frames per second (0.0 if unknown)
    pub frame_rate: f64,
}

/// A sequential source of decoded frames.
pub trait FrameSource {
    /// Metadata for the stream being decoded.
    fn info(&self) -> &VideoInfo;

    /// Decode the next frame.
    ///
    /// Returns `Ok(None)` at end of stream. The frame is borrowed until the
    /// next call.
    fn read_next_frame(&mut self) -> Result<Option<&Frame>, VideoError>;
}
