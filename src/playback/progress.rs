//! Progress line shown beneath the video.

use crate::video::VideoInfo;

/// Clear the current line and return to column 0.
const CLEAR_LINE: &str = "\x1b[2K\r";

/// Format whole seconds as `HH:MM:SS`.
pub fn format_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Seconds left after `frames_read` frames.
///
/// Uses the frame count when known, else the playback rate.
pub fn remaining_seconds(frames_read: u64, info: &VideoInfo, frame_rate: f64) -> f64 {
    let elapsed = if info.frame_count > 0 {
        frames_read as f64 / info.frame_count as f64 * info.duration
    } else if frame_rate > 0.0 {
        frames_read as f64 / frame_rate
    } else {
        0.0
    };
    (info.duration - elapsed).max(0.0)
}

/// Remaining time and frame counter, e.g. `00:01:05\t120/3000 Frames`.
#[derive(Debug, Clone)]
pub struct ProgressLine {
    info: VideoInfo,
    frame_rate: f64,
}

impl ProgressLine {
    pub fn new(info: VideoInfo, frame_rate: f64) -> Self {
        Self { info, frame_rate }
    }

    /// Text of the line after `frames_read` frames.
    pub fn format(&self, frames_read: u64) -> String {
        let remaining = remaining_seconds(frames_read, &self.info, self.frame_rate);
        let time = format_time(remaining as u64);
        if self.info.frame_count > 0 {
            format!("{}\t{}/{} Frames", time, frames_read, self.info.frame_count)
        } else {
            format!("{}\t{} Frames", time, frames_read)
        }
    }

    /// Escape-coded text that moves below the frame and repaints the line.
    pub fn render(&self, frames_read: u64) -> String {
        format!("\n{}{}", CLEAR_LINE, self.format(frames_read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(frame_count: u64, duration: f64) -> VideoInfo {
        VideoInfo {
            width: 640,
            height: 480,
            frame_count,
            duration,
            frame_rate: 30.0,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(65), "00:01:05");
        assert_eq!(format_time(3600 + 120 + 3), "01:02:03");
    }

    #[test]
    fn test_remaining_from_frame_count() {
        let remaining = remaining_seconds(150, &info(300, 10.0), 30.0);
        assert!((remaining - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_remaining_without_frame_count_uses_rate() {
        let remaining = remaining_seconds(60, &info(0, 10.0), 30.0);
        assert!((remaining - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_remaining_never_negative() {
        assert_eq!(remaining_seconds(1000, &info(300, 10.0), 30.0), 0.0);
    }

    #[test]
    fn test_progress_line_format() {
        let line = ProgressLine::new(info(3000, 100.0), 30.0);
        assert_eq!(line.format(1500), "00:00:50\t1500/3000 Frames");
    }

    #[test]
    fn test_progress_line_unknown_count() {
        let line = ProgressLine::new(info(0, 0.0), 30.0);
        assert_eq!(line.format(7), "00:00:00\t7 Frames");
    }

    #[test]
    fn test_render_clears_line_on_next_row() {
        let line = ProgressLine::new(info(10, 1.0), 10.0);
        assert!(line.render(0).starts_with("\n\x1b[2K\r"));
    }
}
