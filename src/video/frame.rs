//! Decoded frame types.

/// A single pixel widened to the 16-bit channel scale (0-65535).
///
/// Channels may be alpha-premultiplied, depending on the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba16 {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub a: u32,
}

impl Rgba16 {
    /// Widen an 8-bit RGBA pixel (`v * 257`, so 255 maps to 65535).
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as u32 * 257,
            g: g as u32 * 257,
            b: b as u32 * 257,
            a: a as u32 * 257,
        }
    }

    /// Undo alpha premultiplication, scaling channels to `channel * 255 / alpha`.
    ///
    /// A fully opaque pixel comes back on the 8-bit scale. A pixel with zero
    /// alpha is returned untouched.
    pub fn unpremultiply(self) -> (u32, u32, u32) {
        if self.a == 0 {
            return (self.r, self.g, self.b);
        }
        (
            self.r * 255 / self.a,
            self.g * 255 / self.a,
            self.b * 255 / self.a,
        )
    }
}

/// A decoded video frame in packed RGBA8 layout (4 bytes per pixel, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Create a zeroed (transparent black) frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; Self::byte_len(width, height)],
            width,
            height,
        }
    }

    /// Create a frame filled with a single RGBA8 color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * Self::BYTES_PER_PIXEL);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Number of bytes a frame of the given size occupies.
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::BYTES_PER_PIXEL
    }

    /// Whether `(x, y)` lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Read the pixel at `(x, y)` on the 16-bit scale.
    ///
    /// Returns `None` for coordinates outside the frame or when the buffer is
    /// shorter than its dimensions claim.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba16> {
        if !self.contains(x, y) {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        let px = self.data.get(offset..offset + Self::BYTES_PER_PIXEL)?;
        Some(Rgba16::from_rgba8(px[0], px[1], px[2], px[3]))
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        if let Some(px) = self.data.get_mut(offset..offset + Self::BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }
}
