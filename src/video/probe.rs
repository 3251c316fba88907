//! Stream metadata via `ffprobe`.

use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};

use super::{VideoError, VideoInfo};

/// Arguments passed to `ffprobe` ahead of the input path.
const PROBE_ARGS: &[&str] = &[
    "-v",
    "error",
    "-select_streams",
    "v:0",
    "-show_entries",
    "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames,duration\
     :stream_side_data=rotation:stream_tags=rotate:format=duration",
    "-of",
    "json",
];

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    #[serde(default)]
    tags: Option<ProbeTags>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Display rotation in degrees from the display matrix, or the legacy
    /// `rotate` tag.
    fn rotation(&self) -> i64 {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse().ok())
            })
            .map(|r: f64| r.round() as i64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Run `ffprobe` on `path` and collect the first video stream's metadata.
pub fn probe(path: &Path) -> Result<VideoInfo, VideoError> {
    log::debug!("Probing {}", path.display());

    let output = Command::new("ffprobe")
        .args(PROBE_ARGS)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| VideoError::spawn("ffprobe", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VideoError::ProbeFailed {
            path: path.to_path_buf(),
            message: first_line(&stderr),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&stdout, path)
}

/// Parse `ffprobe -of json` output into [`VideoInfo`].
pub fn parse_probe_output(json: &str, path: &Path) -> Result<VideoInfo, VideoError> {
    let parsed: ProbeOutput =
        serde_json::from_str(json).map_err(|e| VideoError::ProbeFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| VideoError::NoVideoStream {
            path: path.to_path_buf(),
        })?;

    let coded_width = stream.width.unwrap_or(0);
    let coded_height = stream.height.unwrap_or(0);
    // ffmpeg applies the display rotation while decoding, so quarter turns
    // deliver frames with the axes swapped.
    let (width, height) = if stream.rotation().rem_euclid(180) == 90 {
        (coded_height, coded_width)
    } else {
        (coded_width, coded_height)
    };
    if width == 0 || height == 0 {
        return Err(VideoError::InvalidDimensions {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    let frame_rate = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_rational)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(parse_rational))
        .unwrap_or(0.0);

    let duration = stream
        .duration
        .as_deref()
        .and_then(parse_seconds)
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
                .and_then(parse_seconds)
        });

    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&n| n > 0)
        .or_else(|| match duration {
            Some(d) if frame_rate > 0.0 => Some((d * frame_rate).round() as u64),
            _ => None,
        })
        .unwrap_or(0);

    let duration = duration.unwrap_or_else(|| {
        if frame_rate > 0.0 {
            frame_count as f64 / frame_rate
        } else {
            0.0
        }
    });

    Ok(VideoInfo {
        width,
        height,
        frame_count,
        duration,
        frame_rate,
    })
}

/// Parse an ffprobe rational such as `30000/1001` or a plain number.
///
/// Returns `None` for zero, negative, or malformed rates (ffprobe reports
/// `0/0` when a rate is unknown).
pub fn parse_rational(s: &str) -> Option<f64> {
    let value = match s.trim().split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => s.trim().parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn parse_seconds(s: &str) -> Option<f64> {
    let value: f64 = s.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("ffprobe failed")
        .to_string()
}
