//! Subcommand handlers for config and cache actions.

use std::path::Path;

use super::args::{CacheAction, ConfigAction};
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG_TOML};
use crate::fetch::DownloadCache;

/// Handle config subcommand actions.
///
/// `config_path` is the `--config` override, if any.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>) {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = match Config::load(Some(&path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            println!("Current configuration:");
            match config.to_toml() {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found, using defaults)", path.display());
            }
        }
        ConfigAction::Init => {
            if path.exists() {
                eprintln!("Config file already exists: {}", path.display());
                eprintln!("Use 'vidscii config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&path, DEFAULT_CONFIG_TOML) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", path.display());
        }
    }
}

/// Handle cache subcommand actions.
pub fn handle_cache_action(action: CacheAction, cache: &DownloadCache) {
    match action {
        CacheAction::List => match cache.entries() {
            Ok(entries) if entries.is_empty() => {
                println!("No downloaded videos in {}", cache.cache_dir().display());
            }
            Ok(entries) => {
                println!("Downloaded videos in {}:", cache.cache_dir().display());
                for entry in entries {
                    let name = entry
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    println!(
                        "  {}  {:>10}  {}",
                        name,
                        format_size(entry.size_bytes),
                        entry.url.as_deref().unwrap_or("-")
                    );
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        CacheAction::Clear => match cache.clear() {
            Ok(removed) => println!("Removed {} downloaded video(s)", removed),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Human-readable byte count.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
