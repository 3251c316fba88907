//! Error types for video probing and decoding.

use std::path::PathBuf;

/// Errors that can occur while opening or decoding a video.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("FFmpeg not found. Install ffmpeg (which provides ffprobe) and make sure it is on PATH")]
    FfmpegNotFound,

    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to probe {}: {message}", path.display())]
    ProbeFailed { path: PathBuf, message: String },

    #[error("No video stream found in {}", path.display())]
    NoVideoStream { path: PathBuf },

    #[error("Invalid video dimensions {width}x{height} in {}", path.display())]
    InvalidDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("Decoder exited with code {exit_code:?}: {stderr}")]
    DecoderFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error while decoding: {0}")]
    Io(#[from] std::io::Error),
}

impl VideoError {
    /// Map a spawn failure, singling out a missing executable.
    pub(crate) fn spawn(program: &'static str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            VideoError::FfmpegNotFound
        } else {
            VideoError::SpawnFailed { program, source }
        }
    }
}
