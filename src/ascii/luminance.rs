//! Perceptual luminance using ITU-R BT.709 weights.

use crate::video::Rgba16;

/// Red channel weight.
pub const LUMA_R: f64 = 0.2126;
/// Green channel weight.
pub const LUMA_G: f64 = 0.7152;
/// Blue channel weight.
pub const LUMA_B: f64 = 0.0722;

/// Compute the luminance of an RGB triple.
///
/// The formula is: Y = 0.2126*R + 0.7152*G + 0.0722*B
///
/// Channels can be on any consistent scale; the result is on the same scale
/// and is monotonically non-decreasing in each channel.
pub fn luminance(r: u32, g: u32, b: u32) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Un-premultiply a pixel and compute its luminance.
///
/// Returns the corrected channels alongside the luminance so callers can
/// reuse them for color output.
pub fn pixel_luminance(pixel: Rgba16) -> ((u32, u32, u32), f64) {
    let (r, g, b) = pixel.unpremultiply();
    ((r, g, b), luminance(r, g, b))
}
