//! Playback screen session with panic-safe cleanup.

use crossterm::{cursor, style, terminal};
use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether a session has the screen (for the panic handler)
pub(crate) static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard that prepares the screen for playback and restores it on drop.
///
/// Entering clears the screen and hides the cursor. Dropping resets colors,
/// shows the cursor, and moves to a fresh line. This holds for normal exits,
/// interrupts, and panics.
pub struct TerminalSession {
    /// Whether this guard is responsible for cleanup
    active: bool,
}

impl TerminalSession {
    /// Take over the screen.
    ///
    /// # Errors
    /// Returns an error if the setup sequences cannot be written
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide,
        )?;
        SESSION_ACTIVE.store(true, Ordering::SeqCst);

        Ok(Self { active: true })
    }

    /// Restore the screen without dropping the guard.
    /// After calling this, the guard's drop will be a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
            restore(&mut io::stdout())?;
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
            // Best-effort cleanup - ignore errors during drop
            let _ = restore(&mut io::stdout());
        }
    }
}

fn restore(out: &mut impl Write) -> io::Result<()> {
    crossterm::execute!(out, style::ResetColor, cursor::Show)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Install a panic hook that restores the terminal before the panic message prints.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if SESSION_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = restore(&mut io::stdout());
        }
        original_hook(panic_info);
    }));
}
