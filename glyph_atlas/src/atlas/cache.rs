// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph rasterization cache with atlas storage.
//!
//! Each distinct `(font face, glyph index)` pair is rasterized once, packed into the atlas and
//! remembered as a [`GlyphCel`]. Later requests cost two hash map reads. Entries are never
//! evicted, matching the packer, which never frees space.

use core::fmt::{self, Debug, Formatter};

use bytemuck::{Pod, Zeroable};
use hashbrown::HashMap;

use super::bitmap::AtlasBitmap;
use super::packer::{GuillotinePacker, PackError};
use crate::run::FontFaceId;
use crate::shaper::{
    GlyphRasterizer, RasterRequest, RasterizeError, RasterizedGlyph, RenderingMode, TextureType,
};
use crate::units::px_to_uv;

/// Padding in pixels added to each side of a glyph to prevent texture bleeding.
pub const GLYPH_MARGIN: u32 = 1;

/// Location and placement metrics of a cached glyph.
///
/// UVs are normalized texture coordinates with the y axis pointing down, so `uv_min` is the
/// top-left corner of the glyph's ink in the atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GlyphCel {
    /// Top-left texture coordinate of the ink.
    pub uv_min: [f32; 2],
    /// Bottom-right texture coordinate of the ink.
    pub uv_max: [f32; 2],
    /// Width of the ink in pixels.
    pub ink_width: u32,
    /// Height of the ink in pixels.
    pub ink_height: u32,
    /// Offset from the pen position to the ink box: `x` is the left bearing, `y` the distance
    /// from the baseline up to the top of the ink.
    pub pen_offset: [f32; 2],
    /// Combination of [`GlyphCel::EMPTY`] and [`GlyphCel::MISSING`].
    pub flags: u32,
}

impl GlyphCel {
    /// The glyph has no visible ink, like a space.
    pub const EMPTY: u32 = 1 << 0;
    /// The glyph couldn't be rasterized or packed and isn't cached.
    pub const MISSING: u32 = 1 << 1;

    /// A cel for a glyph without ink.
    pub const fn empty() -> Self {
        Self {
            uv_min: [0.0; 2],
            uv_max: [0.0; 2],
            ink_width: 0,
            ink_height: 0,
            pen_offset: [0.0; 2],
            flags: Self::EMPTY,
        }
    }

    /// A placeholder for a glyph that failed to resolve.
    pub const fn missing() -> Self {
        Self {
            flags: Self::MISSING,
            ..Self::empty()
        }
    }

    /// Whether the glyph has no visible ink.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags & Self::EMPTY != 0
    }

    /// Whether the glyph failed to resolve.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags & Self::MISSING != 0
    }

    /// Whether the cel has anything to draw.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.flags == 0
    }
}

/// How glyphs are rasterized into the atlas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterOptions {
    /// Empty pixels kept around each glyph. Values below 1 are treated as 1.
    pub margin: u32,
    /// Preferred coverage layout.
    pub texture_type: TextureType,
    /// Requested rendering mode, before single-glyph substitution.
    pub rendering_mode: RenderingMode,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            margin: GLYPH_MARGIN,
            texture_type: TextureType::ClearType3x1,
            rendering_mode: RenderingMode::Natural,
        }
    }
}

/// Failure to bring a glyph into the atlas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    /// The atlas has no room for the glyph, margin included.
    AtlasFull {
        /// Padded width in pixels.
        width: u32,
        /// Padded height in pixels.
        height: u32,
    },
    /// The rasterizer returned less coverage than its ink box needs.
    InvalidCoverage {
        /// Bytes required by the ink box and texture type.
        expected: usize,
        /// Bytes returned.
        actual: usize,
    },
    /// The rasterizer failed.
    Rasterizer(RasterizeError),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtlasFull { width, height } => {
                write!(f, "atlas has no room for a {width}x{height} glyph")
            }
            Self::InvalidCoverage { expected, actual } => {
                write!(f, "glyph coverage has {actual} bytes, expected {expected}")
            }
            Self::Rasterizer(err) => write!(f, "failed to rasterize glyph: {err}"),
        }
    }
}

impl core::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::AtlasFull { .. } | Self::InvalidCoverage { .. } => None,
            Self::Rasterizer(err) => Some(err),
        }
    }
}

impl From<RasterizeError> for RasterError {
    fn from(err: RasterizeError) -> Self {
        Self::Rasterizer(err)
    }
}

/// Two-level cache from font face and glyph index to atlas cel.
#[derive(Default)]
pub struct GlyphCache {
    fonts: HashMap<FontFaceId, HashMap<u16, GlyphCel>>,
    entry_count: usize,
    cache_hits: u64,
    cache_misses: u64,
    rasterizer_calls: u64,
}

impl GlyphCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cel of a glyph, rasterizing and packing it on first use.
    ///
    /// `font_face` must identify the face at `em_size_px`; the size is not part of the key.
    /// Nothing is cached when an error is returned, so the glyph can be retried later.
    pub fn get_or_rasterize<R: GlyphRasterizer + ?Sized>(
        &mut self,
        font_face: FontFaceId,
        glyph_index: u16,
        em_size_px: f32,
        options: &RasterOptions,
        rasterizer: &mut R,
        bitmap: &mut AtlasBitmap,
        packer: &mut GuillotinePacker,
    ) -> Result<GlyphCel, RasterError> {
        let glyphs = self.fonts.entry(font_face).or_default();
        if let Some(cel) = glyphs.get(&glyph_index) {
            self.cache_hits += 1;
            return Ok(*cel);
        }
        self.cache_misses += 1;

        let request = RasterRequest {
            font_face,
            glyph_index,
            em_size_px,
            rendering_mode: options.rendering_mode.for_single_glyph(),
            texture_type: options.texture_type,
        };
        let glyph = rasterize_with_fallback(rasterizer, request, &mut self.rasterizer_calls)?;
        let cel = pack_glyph(&glyph, options.margin.max(1), bitmap, packer)?;

        glyphs.insert(glyph_index, cel);
        self.entry_count += 1;
        Ok(cel)
    }

    /// Looks up a cached glyph without touching the statistics.
    pub fn get(&self, font_face: FontFaceId, glyph_index: u16) -> Option<GlyphCel> {
        self.fonts.get(&font_face)?.get(&glyph_index).copied()
    }

    /// Number of cached glyphs across all faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.entry_count
    }

    /// Whether no glyph has been cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of faces that have been looked up.
    #[inline]
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Lookups answered from the cache since the last `clear_stats()`.
    #[inline]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Lookups that had to rasterize since the last `clear_stats()`.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }

    /// Calls made to the rasterizer since the last `clear_stats()`, retries included.
    #[inline]
    pub fn rasterizer_calls(&self) -> u64 {
        self.rasterizer_calls
    }

    /// Clears the statistics without clearing the cache itself.
    pub fn clear_stats(&mut self) {
        self.cache_hits = 0;
        self.cache_misses = 0;
        self.rasterizer_calls = 0;
    }
}

impl Debug for GlyphCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphCache")
            .field("entry_count", &self.entry_count)
            .field("fonts", &self.fonts.len())
            .field("cache_hits", &self.cache_hits)
            .field("cache_misses", &self.cache_misses)
            .field("rasterizer_calls", &self.rasterizer_calls)
            .finish_non_exhaustive()
    }
}

/// Rasterizes a glyph, retrying once with aliased coverage if the font can't produce
/// subpixel coverage.
fn rasterize_with_fallback<R: GlyphRasterizer + ?Sized>(
    rasterizer: &mut R,
    mut request: RasterRequest,
    calls: &mut u64,
) -> Result<RasterizedGlyph, RasterizeError> {
    *calls += 1;
    match rasterizer.rasterize(&request) {
        Err(RasterizeError::UnsupportedTextureType(TextureType::ClearType3x1))
            if request.texture_type == TextureType::ClearType3x1 =>
        {
            log::debug!(
                "font {} has no subpixel coverage for glyph {}, retrying aliased",
                request.font_face.0,
                request.glyph_index
            );
            request.texture_type = TextureType::Aliased1x1;
            *calls += 1;
            rasterizer.rasterize(&request)
        }
        result => result,
    }
}

/// Packs a rasterized glyph into the atlas and builds its cel.
fn pack_glyph(
    glyph: &RasterizedGlyph,
    margin: u32,
    bitmap: &mut AtlasBitmap,
    packer: &mut GuillotinePacker,
) -> Result<GlyphCel, RasterError> {
    if glyph.bounds.is_empty() {
        return Ok(GlyphCel::empty());
    }
    let ink_w = glyph.bounds.width();
    let ink_h = glyph.bounds.height();
    // Checked before packing so a bad bitmap doesn't use up atlas space.
    let expected = ink_w as usize * ink_h as usize * glyph.texture_type.bytes_per_pixel();
    if glyph.coverage.len() < expected {
        return Err(RasterError::InvalidCoverage {
            expected,
            actual: glyph.coverage.len(),
        });
    }

    // Add padding to prevent texture bleeding between glyphs
    let padded_w = ink_w + margin * 2;
    let padded_h = ink_h + margin * 2;
    let allocation = packer
        .allocate(padded_w, padded_h)
        .map_err(|err| match err {
            PackError::AtlasFull { width, height } => RasterError::AtlasFull { width, height },
            PackError::EmptyRequest => unreachable!("padded glyph size is never empty"),
        })?;

    // Offset by padding to position glyph inside padded region
    let x = allocation.x + margin;
    let y = allocation.y + margin;
    bitmap.blit(x, y, ink_w, ink_h, &glyph.coverage, glyph.texture_type);

    let (atlas_w, atlas_h) = (bitmap.width(), bitmap.height());
    Ok(GlyphCel {
        uv_min: [px_to_uv(x, atlas_w), px_to_uv(y, atlas_h)],
        uv_max: [px_to_uv(x + ink_w, atlas_w), px_to_uv(y + ink_h, atlas_h)],
        ink_width: ink_w,
        ink_height: ink_h,
        pen_offset: [glyph.bounds.left as f32, -(glyph.bounds.top as f32)],
        flags: 0,
    })
}
