//! Playback scheduler.
//!
//! Drives the read → render → write → pace cycle on a single thread:
//!
//! ```text
//! Idle ──open──▶ Reading ──frame──▶ Rendering ──flushed──▶ Pacing ──slept──▶ Reading
//!   │               │ end of stream / stop flag                                │
//!   └── error ──────┴──────────────────────────▶ Stopped ◀─────────────────────┘
//! ```
//!
//! The terminal size is queried every frame, so resizing takes effect on the
//! next frame. A stop flag set from another thread is honored between frames.

mod clock;
mod progress;

pub use clock::{
    effective_frame_rate, Clock, ManualClock, PlaybackClock, SystemClock, DEFAULT_FRAME_RATE,
};
pub use progress::{format_time, remaining_seconds, ProgressLine};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::ascii::{fit, FrameRenderer, ViewportGeometry};
use crate::terminal::Terminal;
use crate::video::{FrameSource, VideoError};

/// Scheduler states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Reading,
    Rendering,
    Pacing,
    Stopped,
}

/// Why playback ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source ran out of frames
    EndOfStream,
    /// The stop flag was raised
    Interrupted,
}

/// Errors that end playback.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Not a terminal")]
    NotInteractive,

    #[error("{0}")]
    Open(#[source] VideoError),

    #[error("Failed to decode frame: {0}")]
    Read(#[source] VideoError),

    #[error("Failed to write to terminal: {0}")]
    Write(#[source] std::io::Error),
}

/// Construction-time playback choices.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOptions {
    /// Render one frame out of every `n` (1 renders all of them)
    pub every_nth_frame: u32,
    /// Frame rate to assume when the source does not report one
    pub fallback_fps: f64,
    /// Show the progress line on the terminal's last row
    pub show_progress: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            every_nth_frame: 1,
            fallback_fps: DEFAULT_FRAME_RATE,
            show_progress: true,
        }
    }
}

/// Counters describing a finished playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSummary {
    pub reason: StopReason,
    /// Frames pulled from the source
    pub frames_read: u64,
    /// Frames written to the terminal
    pub frames_rendered: u64,
    /// Frames not drawn because the terminal size was unusable
    pub frames_skipped: u64,
    /// Frames passed over by the every-nth policy
    pub frames_dropped: u64,
    /// Total time frames overran their interval
    pub drift: Duration,
}

/// Plays a frame source onto a terminal in real time.
pub struct Player<T: Terminal, C: Clock> {
    terminal: T,
    clock: C,
    renderer: FrameRenderer,
    options: PlaybackOptions,
    stop: Arc<AtomicBool>,
    state: PlaybackState,
    buffer: String,
}

impl<T: Terminal, C: Clock> Player<T, C> {
    pub fn new(terminal: T, clock: C, renderer: FrameRenderer, options: PlaybackOptions) -> Self {
        Self {
            terminal,
            clock,
            renderer,
            options,
            stop: Arc::new(AtomicBool::new(false)),
            state: PlaybackState::Idle,
            buffer: String::new(),
        }
    }

    /// Share an externally owned stop flag (e.g. one set by a signal handler).
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// A handle that stops playback at the next frame boundary when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            log::trace!("playback {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Open a source with `open` and play it to the end.
    ///
    /// A non-interactive terminal or an open failure stops playback before
    /// any frame is read.
    pub fn run<S, F>(&mut self, open: F) -> Result<PlaybackSummary, PlaybackError>
    where
        S: FrameSource,
        F: FnOnce() -> Result<S, VideoError>,
    {
        self.transition(PlaybackState::Idle);

        if !self.terminal.is_interactive() {
            self.transition(PlaybackState::Stopped);
            return Err(PlaybackError::NotInteractive);
        }

        let mut source = match open() {
            Ok(source) => source,
            Err(e) => {
                self.transition(PlaybackState::Stopped);
                return Err(PlaybackError::Open(e));
            }
        };

        self.play(&mut source)
    }

    /// Play an already opened source to the end.
    pub fn play<S: FrameSource>(
        &mut self,
        source: &mut S,
    ) -> Result<PlaybackSummary, PlaybackError> {
        let result = self.play_inner(source);
        self.transition(PlaybackState::Stopped);
        result
    }

    fn play_inner<S: FrameSource>(
        &mut self,
        source: &mut S,
    ) -> Result<PlaybackSummary, PlaybackError> {
        let info = *source.info();
        let frame_rate = effective_frame_rate(info.frame_rate, self.options.fallback_fps);
        let every_nth = self.options.every_nth_frame.max(1) as u64;
        let progress = self
            .options
            .show_progress
            .then(|| ProgressLine::new(info, frame_rate));

        let mut pacing = PlaybackClock::new(frame_rate, every_nth as u32);
        let mut frames_rendered = 0;
        let mut frames_skipped = 0;
        let mut frames_dropped = 0;

        log::info!(
            "Playing {}x{} at {:.3} fps (interval {:?}, every {} frame(s))",
            info.width,
            info.height,
            frame_rate,
            pacing.target_interval(),
            every_nth
        );

        let mut slot_start = self.clock.now();

        let reason = loop {
            if self.stop.load(Ordering::SeqCst) {
                log::info!("Stop requested after {} frames", pacing.iterations());
                break StopReason::Interrupted;
            }

            self.transition(PlaybackState::Reading);
            let index = pacing.iterations();
            let frame = match source.read_next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::EndOfStream,
                // A decoder torn down by the interrupt is not a failure.
                Err(e) if self.stop.load(Ordering::SeqCst) => {
                    log::debug!("Decoder stopped during interrupt: {}", e);
                    break StopReason::Interrupted;
                }
                Err(e) => return Err(PlaybackError::Read(e)),
            };
            pacing.tick();

            if index % every_nth != 0 {
                frames_dropped += 1;
                continue;
            }

            self.transition(PlaybackState::Rendering);
            match self.viewport(frame.width, frame.height) {
                Some(geometry) => {
                    self.renderer.render_into(frame, &geometry, &mut self.buffer);
                    self.terminal
                        .write(&self.buffer)
                        .map_err(PlaybackError::Write)?;
                    frames_rendered += 1;

                    if let Some(ref line) = progress {
                        if let Err(e) = self.terminal.write(&line.render(pacing.iterations())) {
                            log::warn!("Failed to write progress: {}", e);
                        }
                    }
                }
                None => {
                    frames_skipped += 1;
                    log::debug!("Skipping frame {}: no usable terminal size", index);
                }
            }

            self.transition(PlaybackState::Pacing);
            let elapsed = self.clock.now().saturating_duration_since(slot_start);
            let sleep = pacing.pace(elapsed);
            if !sleep.is_zero() {
                self.clock.sleep(sleep);
            }
            slot_start = self.clock.now();
        };

        Ok(PlaybackSummary {
            reason,
            frames_read: pacing.iterations(),
            frames_rendered,
            frames_skipped,
            frames_dropped,
            drift: pacing.drift(),
        })
    }

    /// Current sampling geometry, or `None` to skip this frame.
    ///
    /// With progress enabled the last terminal row is left for the progress line.
    fn viewport(&self, width: u32, height: u32) -> Option<ViewportGeometry> {
        let (columns, rows) = match self.terminal.size() {
            Ok(size) => size,
            Err(e) => {
                log::debug!("Terminal size unavailable: {}", e);
                return None;
            }
        };
        let rows = if self.options.show_progress {
            rows.saturating_sub(1)
        } else {
            rows
        };
        fit(width, height, columns, rows)
    }
}
