//! Input path checks performed before playback starts.

use std::path::{Path, PathBuf};

use crate::fetch::{is_url, FetchError, VideoFetcher};

/// Problems with the video argument.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Specify a video to play: vidscii <FILE.mp4 | URL>")]
    Missing,

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not an .mp4 file: {}", .0.display())]
    NotMp4(PathBuf),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Check that `path` names an existing `.mp4` file.
///
/// The extension check is case-insensitive.
pub fn validate_input(path: &Path) -> Result<(), InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let is_mp4 = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));
    if !is_mp4 {
        return Err(InputError::NotMp4(path.to_path_buf()));
    }
    Ok(())
}

/// Turn the video argument into a local, validated path.
///
/// URLs are downloaded through `fetcher` (or taken from its cache); anything
/// else is treated as a file path.
pub fn resolve_input(input: Option<&str>, fetcher: &VideoFetcher) -> Result<PathBuf, InputError> {
    let input = input.ok_or(InputError::Missing)?;

    let path = if is_url(input) {
        fetcher.fetch_blocking(input)?
    } else {
        PathBuf::from(input)
    };

    validate_input(&path)?;
    Ok(path)
}
