//! Glyph sets used to map brightness to characters.

use std::sync::Arc;

/// The 68-glyph ramp the player ships with, dense glyphs first.
pub const CLASSIC_CHARSET: &[char] = &[
    '$', '@', 'B', '%', '8', '&', 'W', 'M', '#', '*', 'o', 'a', 'h', 'k', 'b', 'd', 'p', 'q', 'w',
    'm', 'Z', 'O', '0', 'Q', 'L', 'C', 'J', 'U', 'Y', 'X', 'z', 'c', 'v', 'u', 'n', 'x', 'r', 'j',
    'f', 't', '/', '\\', '|', '(', ')', '1', '{', '}', '[', ']', '?', '-', '_', '+', '~', '<', '>',
    'i', '!', 'l', 'I', ';', ':', ',', '"', '^', '`', '\'',
];

/// Standard ASCII density ramp (10 levels), darkest (space) to brightest (@).
pub const STANDARD_CHARSET: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Block character set (5 levels) using Unicode shading blocks.
pub const BLOCKS_CHARSET: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Minimal character set (4 levels).
pub const MINIMAL_CHARSET: &[char] = &[' ', '.', ':', '#'];

/// A single full block. Paired with color output this paints the frame as
/// solid colored cells.
pub const SOLID_CHARSET: &[char] = &['█'];

/// Named glyph set presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// 68-glyph ramp
    #[default]
    Classic,
    /// 10-level ASCII ramp
    Standard,
    /// Unicode shading blocks
    Blocks,
    /// 4-level clean look
    Minimal,
    /// One repeated full block
    Solid,
}

impl CharSet {
    /// Get the character slice for this preset.
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Classic => CLASSIC_CHARSET,
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
            CharSet::Solid => SOLID_CHARSET,
        }
    }

    /// Get a human-readable name for the preset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Classic => "classic",
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
            CharSet::Solid => "solid",
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Some(CharSet::Classic),
            "standard" => Some(CharSet::Standard),
            "blocks" => Some(CharSet::Blocks),
            "minimal" => Some(CharSet::Minimal),
            "solid" => Some(CharSet::Solid),
            _ => None,
        }
    }
}

/// Error returned when building a glyph set from an empty sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("glyph set must contain at least one character")]
pub struct EmptyGlyphSet;

/// An ordered, non-empty sequence of glyphs.
///
/// Cheap to clone; the glyphs are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSet {
    glyphs: Arc<[char]>,
}

impl GlyphSet {
    /// Build a glyph set, rejecting an empty sequence.
    pub fn new(glyphs: impl Into<Vec<char>>) -> Result<Self, EmptyGlyphSet> {
        let glyphs: Vec<char> = glyphs.into();
        if glyphs.is_empty() {
            return Err(EmptyGlyphSet);
        }
        Ok(Self {
            glyphs: glyphs.into(),
        })
    }

    /// Build a glyph set from the characters of a string.
    pub fn from_str_glyphs(s: &str) -> Result<Self, EmptyGlyphSet> {
        Self::new(s.chars().collect::<Vec<_>>())
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn first(&self) -> char {
        self.glyphs[0]
    }

    pub fn last(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }

    /// Select the glyph for a luminance value: `glyphs[floor(luminance) mod len]`.
    ///
    /// Total for every input. Negative and NaN values saturate to index 0 and
    /// values beyond `u64::MAX` saturate before the modulo.
    pub fn glyph_for(&self, luminance: f64) -> char {
        let level = luminance.floor() as u64;
        self.glyphs[(level % self.glyphs.len() as u64) as usize]
    }
}

impl From<CharSet> for GlyphSet {
    fn from(charset: CharSet) -> Self {
        Self {
            glyphs: charset.chars().into(),
        }
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        CharSet::default().into()
    }
}
