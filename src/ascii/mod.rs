//! Frame-to-glyph rendering pipeline.
//!
//! 1. **Luminance** - BT.709-weighted brightness of an un-premultiplied pixel
//! 2. **Viewport fitting** - aspect-correct sampling strides for the terminal
//! 3. **Rendering** - point sampling into a (optionally colored) glyph grid
//!
//! # Glyph Sets
//!
//! Presets are available via [`CharSet`]; arbitrary sets via [`GlyphSet`].

mod charset;
mod luminance;
mod render;
mod viewport;

pub use charset::{
    CharSet, EmptyGlyphSet, GlyphSet, BLOCKS_CHARSET, CLASSIC_CHARSET, MINIMAL_CHARSET,
    SOLID_CHARSET, STANDARD_CHARSET,
};
pub use luminance::{luminance, pixel_luminance, LUMA_B, LUMA_G, LUMA_R};
pub use render::{BoundaryGlyph, ColorMode, FrameRenderer, CURSOR_HOME, SGR_RESET};
pub use viewport::{fit, ViewportGeometry, CELL_ASPECT_DIVISOR};
