//! Terminal access: the [`Terminal`] trait, its stdout implementation, and
//! the playback screen session.

mod session;

pub use session::TerminalSession;

use std::io::{self, IsTerminal, Stdout, Write};

/// The terminal operations the player needs.
pub trait Terminal {
    /// Whether output goes to an interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Current size as `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Write fully composed text and flush it.
    fn write(&mut self, text: &str) -> io::Result<()>;
}

/// [`Terminal`] backed by the process's stdout.
pub struct StdoutTerminal {
    stdout: Stdout,
}

impl Default for StdoutTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutTerminal {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Terminal for StdoutTerminal {
    fn is_interactive(&self) -> bool {
        self.stdout.is_terminal()
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut lock = self.stdout.lock();
        lock.write_all(text.as_bytes())?;
        lock.flush()
    }
}
