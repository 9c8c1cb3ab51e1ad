// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The CPU-side atlas surface that glyph coverage is blitted into.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use crate::shaper::TextureType;

/// Pixel layout of an [`AtlasBitmap`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Four bytes per pixel: red, green, blue, alpha.
    #[default]
    Rgba8,
    /// One coverage byte per pixel.
    Alpha8,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Alpha8 => 1,
        }
    }
}

/// A fixed-size pixel buffer holding packed glyphs.
///
/// The bitmap starts out fully transparent and is never resized. Writes mark it dirty so the
/// renderer knows when to upload it again.
pub struct AtlasBitmap {
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
    data: Vec<u8>,
    dirty: bool,
}

impl AtlasBitmap {
    /// Creates a transparent bitmap.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let pitch = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            pitch,
            format,
            data: vec![0; pitch * height as usize],
            dirty: false,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes per row.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Pixel layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row-major pixel bytes, `pitch * height` of them.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let start = y as usize * self.pitch + x as usize * bpp;
        &self.data[start..start + bpp]
    }

    /// Whether the bitmap changed since the last [`AtlasBitmap::take_dirty`].
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the bitmap changed and clears the flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    /// Copies `width` x `height` pixels of coverage to `(x, y)`, converting to the bitmap's
    /// pixel format.
    ///
    /// Every written pixel is fully opaque; coverage is carried in the colour channels for
    /// [`PixelFormat::Rgba8`].
    ///
    /// # Panics
    ///
    /// Panics if the rectangle doesn't lie inside the bitmap or `coverage` is too short.
    pub fn blit(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        coverage: &[u8],
        texture_type: TextureType,
    ) {
        assert!(
            x + width <= self.width && y + height <= self.height,
            "blit of {width}x{height} at ({x}, {y}) exceeds {}x{} atlas",
            self.width,
            self.height
        );
        let src_bpp = texture_type.bytes_per_pixel();
        let src_pitch = width as usize * src_bpp;
        assert!(
            coverage.len() >= src_pitch * height as usize,
            "coverage has {} bytes, expected {}",
            coverage.len(),
            src_pitch * height as usize
        );
        if width == 0 || height == 0 {
            return;
        }

        let dst_bpp = self.format.bytes_per_pixel();
        let format = self.format;
        for row in 0..height as usize {
            let src = &coverage[row * src_pitch..][..src_pitch];
            let dst_start = (y as usize + row) * self.pitch + x as usize * dst_bpp;
            let dst = &mut self.data[dst_start..][..width as usize * dst_bpp];
            for (src_px, dst_px) in src.chunks_exact(src_bpp).zip(dst.chunks_exact_mut(dst_bpp)) {
                convert_pixel(src_px, texture_type, dst_px, format);
            }
        }
        self.dirty = true;
    }

    /// Writes the bitmap to a PNG file, creating parent directories as needed.
    #[cfg(feature = "png")]
    pub fn write_png(&self, path: &std::path::Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::BufWriter;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let w = BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(match self.format {
            PixelFormat::Rgba8 => png::ColorType::Rgba,
            PixelFormat::Alpha8 => png::ColorType::Grayscale,
        });
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
        writer
            .write_image_data(&self.data)
            .map_err(std::io::Error::other)?;

        Ok(())
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the mean of three bytes fits in a byte"
)]
fn convert_pixel(src: &[u8], texture_type: TextureType, dst: &mut [u8], format: PixelFormat) {
    match (texture_type, format) {
        (TextureType::ClearType3x1, PixelFormat::Rgba8) => {
            dst[..3].copy_from_slice(&src[..3]);
            dst[3] = 0xFF;
        }
        (TextureType::Aliased1x1, PixelFormat::Rgba8) => {
            dst[..3].fill(src[0]);
            dst[3] = 0xFF;
        }
        (TextureType::ClearType3x1, PixelFormat::Alpha8) => {
            let sum = u16::from(src[0]) + u16::from(src[1]) + u16::from(src[2]);
            dst[0] = (sum / 3) as u8;
        }
        (TextureType::Aliased1x1, PixelFormat::Alpha8) => dst[0] = src[0],
    }
}

impl Debug for AtlasBitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtlasBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .field("format", &self.format)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
