//! Frame rendering: point-sample a frame into a colored glyph grid.

use std::fmt::Write as _;

use super::charset::GlyphSet;
use super::luminance::pixel_luminance;
use super::viewport::ViewportGeometry;
use crate::video::Frame;

/// Move the cursor to the top-left corner.
pub const CURSOR_HOME: &str = "\x1b[H";
/// Reset all SGR attributes.
pub const SGR_RESET: &str = "\x1b[0m";

/// Whether glyphs are tinted with the sampled pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit foreground color per glyph
    #[default]
    TrueColor,
    /// Bare glyphs
    Monochrome,
}

/// Glyph emitted for cells whose sample falls outside the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryGlyph {
    /// A space, leaving letterbox cells blank
    #[default]
    Blank,
    /// The glyph set's last entry
    LastGlyph,
}

impl BoundaryGlyph {
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryGlyph::Blank => "blank",
            BoundaryGlyph::LastGlyph => "last-glyph",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blank" => Some(BoundaryGlyph::Blank),
            "last-glyph" | "last_glyph" => Some(BoundaryGlyph::LastGlyph),
            _ => None,
        }
    }
}

/// Renders frames to escape-coded text.
///
/// Configured once at startup; rendering is a pure function of the frame and
/// geometry.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    glyphs: GlyphSet,
    color: ColorMode,
    boundary: BoundaryGlyph,
}

impl FrameRenderer {
    pub fn new(glyphs: GlyphSet, color: ColorMode, boundary: BoundaryGlyph) -> Self {
        Self {
            glyphs,
            color,
            boundary,
        }
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color
    }

    pub fn boundary(&self) -> BoundaryGlyph {
        self.boundary
    }

    fn boundary_char(&self) -> char {
        match self.boundary {
            BoundaryGlyph::Blank => ' ',
            BoundaryGlyph::LastGlyph => self.glyphs.last(),
        }
    }

    /// Render a frame into a new string.
    pub fn render(&self, frame: &Frame, geometry: &ViewportGeometry) -> String {
        let mut out = String::new();
        self.render_into(frame, geometry, &mut out);
        out
    }

    /// Render a frame into an existing buffer, reusing its allocation.
    ///
    /// The buffer is cleared first. Output starts with a cursor-home sequence
    /// and rows are separated by `\n` with no trailing newline.
    pub fn render_into(&self, frame: &Frame, geometry: &ViewportGeometry, out: &mut String) {
        out.clear();
        let cells = geometry.columns as usize * geometry.rows as usize;
        let per_cell = match self.color {
            // ESC[38;2;RRR;GGG;BBBm + glyph + ESC[0m
            ColorMode::TrueColor => 24,
            ColorMode::Monochrome => 1,
        };
        out.reserve(CURSOR_HOME.len() + cells * per_cell + geometry.rows as usize);
        out.push_str(CURSOR_HOME);

        let x_stride = geometry.x_stride as i64;
        let y_stride = geometry.y_stride as i64;
        let boundary = self.boundary_char();

        for y in 0..geometry.rows as i64 {
            let sy = y * y_stride - y_stride / 2;
            for x in 0..geometry.columns as i64 {
                let sx = x * x_stride - x_stride / 2;

                let Some(pixel) = frame.pixel(sx, sy) else {
                    out.push(boundary);
                    continue;
                };

                let ((r, g, b), luma) = pixel_luminance(pixel);
                let glyph = self.glyphs.glyph_for(luma);

                match self.color {
                    ColorMode::TrueColor => {
                        let _ = write!(
                            out,
                            "\x1b[38;2;{};{};{}m{}{}",
                            r.min(255),
                            g.min(255),
                            b.min(255),
                            glyph,
                            SGR_RESET
                        );
                    }
                    ColorMode::Monochrome => out.push(glyph),
                }
            }
            if y != geometry.rows as i64 - 1 {
                out.push('\n');
            }
        }
    }
}
