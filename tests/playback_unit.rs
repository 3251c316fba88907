//! Scheduler tests with a scripted frame source, a fake terminal, and a
//! manual clock.
//!
//! These tests cover:
//! - Frame pacing
//! - Terminal size changes and unusable sizes
//! - Stop conditions and error handling
//! - Frame skipping and the progress line

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vidscii::ascii::{BoundaryGlyph, ColorMode, FrameRenderer, GlyphSet, CURSOR_HOME};
use vidscii::playback::{
    ManualClock, PlaybackError, PlaybackOptions, PlaybackState, Player, StopReason,
};
use vidscii::terminal::Terminal;
use vidscii::video::{Frame, FrameSource, VideoError, VideoInfo};

const PROGRESS_PREFIX: &str = "\n\x1b[2K\r";

// ==================== Fakes ====================

struct ScriptedSource {
    info: VideoInfo,
    frames: Vec<Frame>,
    next: usize,
    fail_at: Option<usize>,
    /// Raise this flag and fail the way an interrupted decoder does
    interrupt_at: Option<(usize, Arc<AtomicBool>)>,
}

impl ScriptedSource {
    fn new(count: usize, frame_rate: f64) -> Self {
        let frames = (0..count)
            .map(|_| Frame::filled(16, 9, [255, 255, 255, 255]))
            .collect();
        Self {
            info: VideoInfo {
                width: 16,
                height: 9,
                frame_count: count as u64,
                duration: count as f64 / frame_rate.max(1.0),
                frame_rate,
            },
            frames,
            next: 0,
            fail_at: None,
            interrupt_at: None,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn read_next_frame(&mut self) -> Result<Option<&Frame>, VideoError> {
        if let Some((at, ref stop)) = self.interrupt_at {
            if at == self.next {
                stop.store(true, Ordering::SeqCst);
                return Err(VideoError::DecoderFailed {
                    exit_code: Some(255),
                    stderr: "Exiting normally, received signal 2.".to_string(),
                });
            }
        }
        if self.fail_at == Some(self.next) {
            return Err(VideoError::DecoderFailed {
                exit_code: Some(1),
                stderr: "corrupt packet".to_string(),
            });
        }
        if self.next >= self.frames.len() {
            return Ok(None);
        }
        self.next += 1;
        Ok(self.frames.get(self.next - 1))
    }
}

struct FakeTerminal {
    interactive: bool,
    /// Sizes reported in order; the last one repeats
    sizes: RefCell<VecDeque<(u16, u16)>>,
    size_error: bool,
    writes: Vec<String>,
    clock: ManualClock,
    write_cost: Duration,
    fail_frames: bool,
    fail_progress: bool,
    stop_after_writes: Option<(usize, Arc<AtomicBool>)>,
}

impl FakeTerminal {
    fn new(clock: &ManualClock, columns: u16, rows: u16) -> Self {
        Self {
            interactive: true,
            sizes: RefCell::new(VecDeque::from([(columns, rows)])),
            size_error: false,
            writes: Vec::new(),
            clock: clock.clone(),
            write_cost: Duration::ZERO,
            fail_frames: false,
            fail_progress: false,
            stop_after_writes: None,
        }
    }

    fn frame_writes(&self) -> Vec<&String> {
        self.writes
            .iter()
            .filter(|w| w.starts_with(CURSOR_HOME))
            .collect()
    }

    fn progress_writes(&self) -> Vec<&String> {
        self.writes
            .iter()
            .filter(|w| w.starts_with(PROGRESS_PREFIX))
            .collect()
    }
}

impl Terminal for FakeTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        if self.size_error {
            return Err(io::Error::new(io::ErrorKind::Other, "no tty"));
        }
        let mut sizes = self.sizes.borrow_mut();
        let size = sizes.front().copied().unwrap_or((0, 0));
        if sizes.len() > 1 {
            sizes.pop_front();
        }
        Ok(size)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let is_progress = text.starts_with(PROGRESS_PREFIX);
        if is_progress && self.fail_progress {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "progress"));
        }
        if !is_progress && self.fail_frames {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "frame"));
        }
        if !is_progress {
            self.clock.advance(self.write_cost);
        }
        self.writes.push(text.to_string());
        if let Some((n, ref stop)) = self.stop_after_writes {
            if self.writes.len() >= n {
                stop.store(true, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

fn renderer() -> FrameRenderer {
    FrameRenderer::new(
        GlyphSet::from_str_glyphs(" .#").unwrap(),
        ColorMode::Monochrome,
        BoundaryGlyph::Blank,
    )
}

fn options(every_nth_frame: u32, show_progress: bool) -> PlaybackOptions {
    PlaybackOptions {
        every_nth_frame,
        show_progress,
        ..PlaybackOptions::default()
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

// ==================== Pacing Tests ====================

#[test]
fn test_pacing_subtracts_render_time() {
    let clock = ManualClock::new();
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.write_cost = Duration::from_millis(10);

    let mut player = Player::new(terminal, clock.clone(), renderer(), options(1, false));
    let mut source = ScriptedSource::new(4, 30.0);
    let summary = player.play(&mut source).unwrap();

    assert_eq!(summary.reason, StopReason::EndOfStream);
    assert_eq!(summary.frames_read, 4);
    assert_eq!(summary.frames_rendered, 4);

    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 4);
    for sleep in sleeps {
        assert!((millis(sleep) - 23.333).abs() < 0.01, "{:?}", sleep);
    }
}

#[test]
fn test_overrun_does_not_sleep() {
    let clock = ManualClock::new();
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.write_cost = Duration::from_millis(50);

    let mut player = Player::new(terminal, clock.clone(), renderer(), options(1, false));
    let summary = player.play(&mut ScriptedSource::new(3, 30.0)).unwrap();

    assert!(clock.sleeps().is_empty());
    let drift = millis(summary.drift);
    assert!((drift - 3.0 * 16.667).abs() < 0.05, "{}", drift);
}

#[test]
fn test_missing_frame_rate_uses_fallback() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);
    let mut opts = options(1, false);
    opts.fallback_fps = 10.0;

    let mut player = Player::new(terminal, clock.clone(), renderer(), opts);
    player.play(&mut ScriptedSource::new(2, 0.0)).unwrap();

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(100); 2]);
}

// ==================== Terminal Size Tests ====================

#[test]
fn test_zero_size_skips_frames_but_keeps_pacing() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 0, 0);

    let mut player = Player::new(terminal, clock.clone(), renderer(), options(1, true));
    let summary = player.play(&mut ScriptedSource::new(3, 30.0)).unwrap();

    assert_eq!(summary.reason, StopReason::EndOfStream);
    assert_eq!(summary.frames_rendered, 0);
    assert_eq!(summary.frames_skipped, 3);
    assert!(player.terminal().writes.is_empty());
    assert_eq!(clock.sleeps().len(), 3);
}

#[test]
fn test_size_error_skips_frame() {
    let clock = ManualClock::new();
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.size_error = true;

    let mut player = Player::new(terminal, clock, renderer(), options(1, false));
    let summary = player.play(&mut ScriptedSource::new(2, 30.0)).unwrap();

    assert_eq!(summary.frames_skipped, 2);
    assert_eq!(summary.frames_rendered, 0);
}

#[test]
fn test_frame_fills_terminal_grid() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 30, 10);

    let mut player = Player::new(terminal, clock, renderer(), options(1, false));
    player.play(&mut ScriptedSource::new(1, 30.0)).unwrap();

    let frames = player.terminal().frame_writes();
    assert_eq!(frames.len(), 1);
    let lines: Vec<&str> = frames[0][CURSOR_HOME.len()..].split('\n').collect();
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|l| l.chars().count() == 30));
}

#[test]
fn test_resize_applies_to_next_frame() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 30, 10);
    terminal.sizes.borrow_mut().extend([(0, 0), (20, 5)]);

    let mut player = Player::new(terminal, clock, renderer(), options(1, false));
    let summary = player.play(&mut ScriptedSource::new(3, 30.0)).unwrap();

    assert_eq!(summary.frames_rendered, 2);
    assert_eq!(summary.frames_skipped, 1);
    let frames = player.terminal().frame_writes();
    assert_eq!(frames[0][CURSOR_HOME.len()..].split('\n').count(), 10);
    let last: Vec<&str> = frames[1][CURSOR_HOME.len()..].split('\n').collect();
    assert_eq!(last.len(), 5);
    assert!(last.iter().all(|l| l.chars().count() == 20));
}

#[test]
fn test_progress_reserves_last_row() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 30, 10);

    let mut player = Player::new(terminal, clock, renderer(), options(1, true));
    player.play(&mut ScriptedSource::new(1, 30.0)).unwrap();

    let frames = player.terminal().frame_writes();
    assert_eq!(frames[0][CURSOR_HOME.len()..].split('\n').count(), 9);
}

// ==================== Stop Condition Tests ====================

#[test]
fn test_empty_source_ends_normally() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);

    let mut player = Player::new(terminal, clock.clone(), renderer(), options(1, true));
    let summary = player.play(&mut ScriptedSource::new(0, 30.0)).unwrap();

    assert_eq!(summary.reason, StopReason::EndOfStream);
    assert_eq!(summary.frames_read, 0);
    assert!(clock.sleeps().is_empty());
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_stop_flag_interrupts_between_frames() {
    let clock = ManualClock::new();
    let stop = Arc::new(AtomicBool::new(false));
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.stop_after_writes = Some((1, Arc::clone(&stop)));

    let mut player =
        Player::new(terminal, clock, renderer(), options(1, false)).with_stop_flag(stop);
    let summary = player.play(&mut ScriptedSource::new(10, 30.0)).unwrap();

    assert_eq!(summary.reason, StopReason::Interrupted);
    assert_eq!(summary.frames_read, 1);
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_stop_handle_shares_flag() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);
    let mut player = Player::new(terminal, clock, renderer(), options(1, false));

    player.stop_handle().store(true, Ordering::SeqCst);
    let summary = player.play(&mut ScriptedSource::new(5, 30.0)).unwrap();

    assert_eq!(summary.reason, StopReason::Interrupted);
    assert_eq!(summary.frames_read, 0);
}

#[test]
fn test_non_interactive_terminal_rejected_before_open() {
    let clock = ManualClock::new();
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.interactive = false;

    let mut player = Player::new(terminal, clock, renderer(), options(1, true));
    let mut opened = false;
    let result = player.run(|| {
        opened = true;
        Ok(ScriptedSource::new(1, 30.0))
    });

    assert!(matches!(result, Err(PlaybackError::NotInteractive)));
    assert!(!opened);
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(player.terminal().writes.is_empty());
}

#[test]
fn test_open_failure_stops() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);

    let mut player = Player::new(terminal, clock, renderer(), options(1, true));
    let result = player.run(|| -> Result<ScriptedSource, VideoError> {
        Err(VideoError::NoVideoStream {
            path: PathBuf::from("clip.mp4"),
        })
    });

    match result {
        Err(PlaybackError::Open(VideoError::NoVideoStream { path })) => {
            assert_eq!(path, PathBuf::from("clip.mp4"));
        }
        other => panic!("Expected open failure, got {:?}", other),
    }
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_run_plays_opened_source() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);

    let mut player = Player::new(terminal, clock, renderer(), options(1, false));
    let summary = player.run(|| Ok(ScriptedSource::new(3, 30.0))).unwrap();

    assert_eq!(summary.frames_rendered, 3);
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_decode_error_mid_stream() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);
    let mut source = ScriptedSource::new(5, 30.0);
    source.fail_at = Some(2);

    let mut player = Player::new(terminal, clock, renderer(), options(1, false));
    let result = player.play(&mut source);

    assert!(matches!(result, Err(PlaybackError::Read(_))));
    assert_eq!(player.terminal().frame_writes().len(), 2);
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_decoder_exit_during_interrupt_is_not_an_error() {
    let clock = ManualClock::new();
    let stop = Arc::new(AtomicBool::new(false));
    let terminal = FakeTerminal::new(&clock, 80, 24);
    let mut source = ScriptedSource::new(5, 30.0);
    source.interrupt_at = Some((2, Arc::clone(&stop)));

    let mut player =
        Player::new(terminal, clock, renderer(), options(1, false)).with_stop_flag(stop);
    let summary = player.play(&mut source).unwrap();

    assert_eq!(summary.reason, StopReason::Interrupted);
    assert_eq!(summary.frames_read, 2);
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn test_frame_write_failure_is_fatal() {
    let clock = ManualClock::new();
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.fail_frames = true;

    let mut player = Player::new(terminal, clock, renderer(), options(1, false));
    let result = player.play(&mut ScriptedSource::new(3, 30.0));

    assert!(matches!(result, Err(PlaybackError::Write(_))));
}

// ==================== Frame Skipping Tests ====================

#[test]
fn test_every_nth_frame_renders_subset() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);

    let mut player = Player::new(terminal, clock.clone(), renderer(), options(2, false));
    let summary = player.play(&mut ScriptedSource::new(5, 30.0)).unwrap();

    assert_eq!(summary.frames_read, 5);
    assert_eq!(summary.frames_rendered, 3);
    assert_eq!(summary.frames_dropped, 2);

    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 3);
    for sleep in sleeps {
        assert!((millis(sleep) - 66.667).abs() < 0.01, "{:?}", sleep);
    }
}

// ==================== Progress Line Tests ====================

#[test]
fn test_progress_written_after_each_frame() {
    let clock = ManualClock::new();
    let terminal = FakeTerminal::new(&clock, 80, 24);

    let mut player = Player::new(terminal, clock, renderer(), options(1, true));
    player.play(&mut ScriptedSource::new(3, 30.0)).unwrap();

    let writes = &player.terminal().writes;
    assert_eq!(writes.len(), 6);
    assert!(writes[0].starts_with(CURSOR_HOME));
    assert!(writes[1].starts_with(PROGRESS_PREFIX));

    let progress = player.terminal().progress_writes();
    assert_eq!(
        progress.last().map(|s| s.as_str()),
        Some("\n\x1b[2K\r00:00:00\t3/3 Frames")
    );
}

#[test]
fn test_progress_write_failure_is_not_fatal() {
    let clock = ManualClock::new();
    let mut terminal = FakeTerminal::new(&clock, 80, 24);
    terminal.fail_progress = true;

    let mut player = Player::new(terminal, clock, renderer(), options(1, true));
    let summary = player.play(&mut ScriptedSource::new(3, 30.0)).unwrap();

    assert_eq!(summary.reason, StopReason::EndOfStream);
    assert_eq!(summary.frames_rendered, 3);
    assert!(player.terminal().progress_writes().is_empty());
}
