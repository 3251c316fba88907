//! FFmpeg-backed frame source.
//!
//! Spawns `ffmpeg` to decode the input into raw RGBA frames on stdout and
//! reads them one frame-sized chunk at a time.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::probe::probe;
use super::{Frame, FrameSource, VideoError, VideoInfo};

/// How long to wait for ffmpeg to exit after an interrupt before killing it.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// A running ffmpeg decode of a single video file.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    child: Child,
    stdout: BufReader<ChildStdout>,
    /// Collects ffmpeg's stderr so the pipe never fills up
    stderr_thread: Option<JoinHandle<Vec<String>>>,
    frame: Frame,
    frames_read: u64,
    finished: bool,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        let info = probe(path)?;
        log::info!(
            "Opened {}: {}x{} @ {:.3} fps, {} frames, {:.2}s",
            path.display(),
            info.width,
            info.height,
            info.frame_rate,
            info.frame_count,
            info.duration
        );

        let mut command = Command::new("ffmpeg");
        command
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Keep the terminal's ctrl-c away from the decoder; only `shutdown`
        // signals it.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command
            .spawn()
            .map_err(|e| VideoError::spawn("ffmpeg", e))?;

        Self::from_child(path, info, child)
    }

    /// Wrap an already spawned decoder that writes `info`-sized RGBA frames
    /// to its piped stdout.
    pub(crate) fn from_child(
        path: &Path,
        info: VideoInfo,
        mut child: Child,
    ) -> Result<Self, VideoError> {
        let stdout = child.stdout.take().ok_or_else(|| {
            VideoError::Io(std::io::Error::other("ffmpeg stdout was not captured"))
        })?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let reader = BufReader::new(stderr);
                let mut lines = Vec::new();
                for line in reader.lines() {
                    match line {
                        Ok(l) => {
                            log::debug!("[ffmpeg] {}", l);
                            lines.push(l);
                        }
                        Err(_) => break,
                    }
                }
                lines
            })
        });

        let frame = Frame::new(info.width, info.height);
        let capacity = frame.data.len();
        Ok(Self {
            path: path.to_path_buf(),
            info,
            child,
            stdout: BufReader::with_capacity(capacity, stdout),
            stderr_thread,
            frame,
            frames_read: 0,
            finished: false,
        })
    }

    /// Number of frames decoded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Reap the finished child and turn a failed exit into an error.
    fn finish(&mut self) -> Result<(), VideoError> {
        self.finished = true;
        let status = self.child.wait()?;
        let stderr = self
            .stderr_thread
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if status.success() {
            log::info!("Decoder finished after {} frames", self.frames_read);
            return Ok(());
        }
        Err(VideoError::DecoderFailed {
            exit_code: status.code(),
            stderr: stderr.join(" "),
        })
    }

    /// Interrupt ffmpeg and wait for it to exit.
    fn shutdown(&mut self) {
        stop_child(&mut self.child, SHUTDOWN_TIMEOUT);
    }
}

/// Send SIGINT to `child` and reap it, killing it if it is still running
/// after `timeout`.
fn stop_child(child: &mut Child, timeout: Duration) {
    #[cfg(unix)]
    {
        // SAFETY: the pid belongs to a child we spawned and have not reaped.
        unsafe {
            libc::kill(child.id() as libc::pid_t, libc::SIGINT);
        }
    }

    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) if start.elapsed() > timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return;
            }
            Ok(None) => thread::sleep(Duration::from_millis(20)),
            Err(_) => return,
        }
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn read_next_frame(&mut self) -> Result<Option<&Frame>, VideoError> {
        if self.finished {
            return Ok(None);
        }

        match self.stdout.read_exact(&mut self.frame.data) {
            Ok(()) => {
                self.frames_read += 1;
                Ok(Some(&self.frame))
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // A truncated trailing frame is dropped along with the stream end.
                self.finish()?;
                Ok(None)
            }
            Err(e) => Err(VideoError::Io(e)),
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if !self.finished && matches!(self.child.try_wait(), Ok(None)) {
            log::debug!("Stopping decoder for {}", self.path.display());
            self.shutdown();
        }
    }
}
