//! Configuration file handling for vidscii.
//!
//! Loads configuration from `~/.config/vidscii/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::{BoundaryGlyph, CharSet, ColorMode, EmptyGlyphSet, FrameRenderer, GlyphSet};
use crate::playback::{PlaybackOptions, DEFAULT_FRAME_RATE};

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Glyph preset name
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Custom glyphs, dark to bright; overrides `charset` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<String>,
    /// Tint glyphs with the pixel color
    #[serde(default = "default_true")]
    pub color: bool,
    /// Glyph for cells outside the image: "blank" or "last-glyph"
    #[serde(default = "default_boundary")]
    pub boundary: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            glyphs: None,
            color: true,
            boundary: default_boundary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_every_nth")]
    pub every_nth_frame: u32,
    #[serde(default = "default_fps")]
    pub fallback_fps: f64,
    #[serde(default = "default_true")]
    pub progress: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            every_nth_frame: default_every_nth(),
            fallback_fps: default_fps(),
            progress: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Where downloaded videos are kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_charset() -> String {
    CharSet::default().name().to_string()
}

fn default_boundary() -> String {
    BoundaryGlyph::default().name().to_string()
}

fn default_every_nth() -> u32 {
    1
}

fn default_fps() -> f64 {
    DEFAULT_FRAME_RATE
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown charset '{0}'. Available: classic, standard, blocks, minimal, solid")]
    UnknownCharset(String),

    #[error("Unknown boundary glyph '{0}'. Available: blank, last-glyph")]
    UnknownBoundary(String),

    #[error("Invalid glyphs: {0}")]
    EmptyGlyphs(#[from] EmptyGlyphSet),

    #[error("every_nth_frame must be at least 1")]
    InvalidEveryNth,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a path the user named explicitly.
    /// Unlike [`load`](Self::load), a missing file is an error.
    pub fn load_from_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load(Some(path))
    }

    /// The glyph set selected by `glyphs` or `charset`.
    pub fn glyph_set(&self) -> Result<GlyphSet, ConfigError> {
        if let Some(ref glyphs) = self.render.glyphs {
            return Ok(GlyphSet::from_str_glyphs(glyphs)?);
        }
        CharSet::from_name(&self.render.charset)
            .map(GlyphSet::from)
            .ok_or_else(|| ConfigError::UnknownCharset(self.render.charset.clone()))
    }

    /// Build the frame renderer described by the `[render]` section.
    pub fn renderer(&self) -> Result<FrameRenderer, ConfigError> {
        let boundary = BoundaryGlyph::from_name(&self.render.boundary)
            .ok_or_else(|| ConfigError::UnknownBoundary(self.render.boundary.clone()))?;
        let color = if self.render.color {
            ColorMode::TrueColor
        } else {
            ColorMode::Monochrome
        };
        Ok(FrameRenderer::new(self.glyph_set()?, color, boundary))
    }

    /// Build playback options from the `[playback]` section.
    pub fn playback_options(&self) -> Result<PlaybackOptions, ConfigError> {
        if self.playback.every_nth_frame == 0 {
            return Err(ConfigError::InvalidEveryNth);
        }
        Ok(PlaybackOptions {
            every_nth_frame: self.playback.every_nth_frame,
            fallback_fps: self.playback.fallback_fps,
            show_progress: self.playback.progress,
        })
    }

    /// Render the config as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("vidscii")
        .join("config.toml")
}

/// Commented default configuration written by `vidscii config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# vidscii configuration

[render]
# Glyph preset: classic, standard, blocks, minimal, solid
charset = "classic"
# Custom glyphs, used instead of the preset when set
# glyphs = " .:-=+*#%@"
# 24-bit colored glyphs
color = true
# Cells outside the picture: "blank" or "last-glyph"
boundary = "blank"

[playback]
# Render one frame out of every N
every_nth_frame = 1
# Frame rate to use when the video does not report one
fallback_fps = 30.0
# Remaining time and frame counter on the last row
progress = true

[fetch]
# Where videos given as URLs are downloaded
# cache_dir = "/path/to/cache"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/vidscii.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.charset, "classic");
        assert!(config.render.color);
        assert_eq!(config.playback.every_nth_frame, 1);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = Config::load_from_explicit(Path::new("/nonexistent/vidscii.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_default_config_toml_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render]\ncharset = \"blocks\"\ncolor = false").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.render.charset, "blocks");
        assert!(!config.render.color);
        assert!(config.playback.progress);
    }

    #[test]
    fn test_parse_error_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render\ncharset = ").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_custom_glyphs_override_charset() {
        let mut config = Config::default();
        config.render.glyphs = Some("ab".to_string());
        assert_eq!(config.glyph_set().unwrap().glyphs(), &['a', 'b']);
    }

    #[test]
    fn test_empty_custom_glyphs_rejected() {
        let mut config = Config::default();
        config.render.glyphs = Some(String::new());
        assert!(matches!(config.glyph_set(), Err(ConfigError::EmptyGlyphs(_))));
    }

    #[test]
    fn test_unknown_names_rejected() {
        let mut config = Config::default();
        config.render.charset = "braille".to_string();
        assert!(matches!(config.glyph_set(), Err(ConfigError::UnknownCharset(_))));

        let mut config = Config::default();
        config.render.boundary = "dots".to_string();
        assert!(matches!(config.renderer(), Err(ConfigError::UnknownBoundary(_))));
    }

    #[test]
    fn test_renderer_from_config() {
        let mut config = Config::default();
        config.render.color = false;
        config.render.boundary = "last-glyph".to_string();
        let renderer = config.renderer().unwrap();
        assert_eq!(renderer.color_mode(), ColorMode::Monochrome);
        assert_eq!(renderer.boundary(), BoundaryGlyph::LastGlyph);
    }

    #[test]
    fn test_zero_every_nth_rejected() {
        let mut config = Config::default();
        config.playback.every_nth_frame = 0;
        assert!(matches!(
            config.playback_options(),
            Err(ConfigError::InvalidEveryNth)
        ));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = Config::default();
        config.fetch.cache_dir = Some(PathBuf::from("/tmp/vidscii"));
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
