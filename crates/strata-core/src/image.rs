//! RGBA8 image buffer.
//!
//! [`RgbaImage`] is the only pixel container in strata. Every layer's source
//! pixels, every intermediate pipeline result and the final composite are
//! `RgbaImage`s.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with straight
//! (non-premultiplied) alpha interleaved:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! # Sharing
//!
//! Layers hold their buffers behind `Arc<RgbaImage>` and never mutate them
//! in place; edits produce a new buffer. The type itself is a plain owned
//! value so off-screen surfaces can write into it freely.
//!
//! # Usage
//!
//! ```rust
//! use strata_core::RgbaImage;
//!
//! let mut img = RgbaImage::filled(4, 2, [255, 255, 255, 255]);
//! img.set_pixel(1, 1, [255, 0, 0, 128]);
//! assert_eq!(img.pixel(1, 1), [255, 0, 0, 128]);
//! assert_eq!(img.as_raw().len(), 4 * 2 * 4);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// Owned RGBA8 pixel buffer with straight alpha.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawImage")]
pub struct RgbaImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Unvalidated wire form of [`RgbaImage`].
#[derive(Deserialize)]
struct RawImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl TryFrom<RawImage> for RgbaImage {
    type Error = Error;

    fn try_from(raw: RawImage) -> Result<Self> {
        Self::from_raw(raw.width, raw.height, raw.data)
    }
}

impl RgbaImage {
    /// Creates a fully transparent black image.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_core::RgbaImage;
    ///
    /// let img = RgbaImage::new(16, 9);
    /// assert_eq!(img.dimensions(), (16, 9));
    /// assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; Self::sample_count(width, height)],
        }
    }

    /// Creates an image with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self { width, height, data }
    }

    /// Wraps existing RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 4` or the size overflows.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "image size overflows"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self { width, height, data })
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(Self::sample_count(width, height));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, data }
    }

    #[inline]
    fn sample_count(width: u32, height: u32) -> usize {
        width as usize * height as usize * CHANNELS
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns `true` if the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image, returning its samples.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Reads one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Writes one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Reads one pixel, `None` when outside the image.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    /// Samples of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.offset(0, y);
        &self.data[start..start + self.width as usize * CHANNELS]
    }

    /// Iterator over pixels as 4-byte chunks.
    #[inline]
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(CHANNELS)
    }

    /// Returns `true` if every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.pixels().all(|px| px[3] == 255)
    }

    /// Checks that `other` has the same dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn ensure_same_size(&self, other: &RgbaImage) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }
}
