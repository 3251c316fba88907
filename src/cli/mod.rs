//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, input validation,
//! and subcommand handlers.

mod args;
mod commands;
mod enums;
mod input;

pub use args::{Args, CacheAction, Command, ConfigAction};
pub use commands::{handle_cache_action, handle_config_action};
pub use enums::CharacterSet;
pub use input::{resolve_input, validate_input, InputError};
