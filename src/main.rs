use clap::Parser;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use vidscii::cli::{handle_cache_action, handle_config_action, resolve_input, Args, Command};
use vidscii::config::{Config, ConfigError};
use vidscii::fetch::{DownloadCache, VideoFetcher};
use vidscii::playback::{Player, StopReason, SystemClock};
use vidscii::signal::setup_ctrlc_handler;
use vidscii::terminal::{StdoutTerminal, Terminal, TerminalSession};
use vidscii::video::FfmpegSource;

/// Load the config file.
///
/// An explicit `--config` must exist; the default location falls back to
/// built-in settings with a warning if it cannot be read.
fn load_config(args: &Args) -> Config {
    if let Some(ref path) = args.config {
        match Config::load_from_explicit(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match Config::load(None) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        }
    }
}

fn download_cache(cfg: &Config) -> DownloadCache {
    match cfg.fetch.cache_dir {
        Some(ref dir) => DownloadCache::new(dir.clone()),
        None => DownloadCache::with_default_dir(),
    }
}

fn main() {
    let args = Args::parse();

    match args.command {
        Some(Command::Config { ref action }) => {
            handle_config_action(action.clone(), args.config.as_deref());
            return;
        }
        Some(Command::Cache { ref action }) => {
            let cfg = load_config(&args);
            handle_cache_action(action.clone(), &download_cache(&cfg));
            return;
        }
        None => {}
    }

    let mut cfg = load_config(&args);
    args.apply_to(&mut cfg);

    let built: Result<_, ConfigError> = cfg
        .renderer()
        .and_then(|renderer| Ok((renderer, cfg.playback_options()?)));
    let (renderer, options) = match built {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let terminal = StdoutTerminal::new();
    if !terminal.is_interactive() {
        eprintln!("Error: Not a terminal");
        std::process::exit(1);
    }

    let fetcher = VideoFetcher::new(download_cache(&cfg));
    let path = match resolve_input(args.input.as_deref(), &fetcher) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    if let Err(e) = setup_ctrlc_handler(Arc::clone(&stop)) {
        eprintln!("Warning: Could not set up Ctrl+C handler: {}", e);
    }

    let mut session = match TerminalSession::enter() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut player = Player::new(terminal, SystemClock, renderer, options).with_stop_flag(stop);
    let result = player.run(|| FfmpegSource::open(&path));

    let _ = session.exit();

    match result {
        Ok(summary) => {
            log::info!(
                "Playback finished ({:?}): {} read, {} rendered, {} skipped, drift {:?}",
                summary.reason,
                summary.frames_read,
                summary.frames_rendered,
                summary.frames_skipped,
                summary.drift
            );
            if summary.reason == StopReason::Interrupted {
                println!("Stopped.");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
