//! Ctrl+C handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set up the Ctrl+C handler to raise `stop`.
///
/// This should be called once at program startup. The player checks the flag
/// between frames.
pub fn setup_ctrlc_handler(stop: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
}
