//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;
use crate::config::Config;

/// Play MP4 videos as colored ASCII art in the terminal
#[derive(Parser, Debug)]
#[command(name = "vidscii")]
#[command(version, about = "Play videos as ASCII art in the terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to an .mp4 file, or an http(s) URL to download one from
    pub input: Option<String>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Glyph preset (overrides the config file)
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Print glyphs without color
    #[arg(long)]
    pub monochrome: bool,

    /// Render only every Nth frame
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub every: Option<u32>,

    /// Hide the progress line
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Layer command-line overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(charset) = self.charset {
            config.render.charset = crate::ascii::CharSet::from(charset).name().to_string();
            config.render.glyphs = None;
        }
        if self.monochrome {
            config.render.color = false;
        }
        if let Some(n) = self.every {
            config.playback.every_nth_frame = n;
        }
        if self.no_progress {
            config.playback.progress = false;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage videos downloaded from URLs
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// List downloaded videos
    List,
    /// Delete all downloaded videos
    Clear,
}
