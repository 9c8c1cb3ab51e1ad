// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the external text shaper, glyph rasterizer and font metrics source.
//!
//! This crate doesn't shape or rasterize text itself. It consumes [`GlyphRun`]s from a
//! [`TextShaper`], asks a [`GlyphRasterizer`] for single-glyph coverage bitmaps on cache misses,
//! and reads vertical metrics from a [`FontMetricsProvider`]. The optional `swash` feature
//! provides an implementation of all three.

#[cfg(feature = "swash")]
pub mod swash;

use alloc::vec::Vec;
use core::fmt;

use crate::run::{FontFaceId, GlyphRun};

/// Turns text into shaped glyph runs, resolving font fallback on the way.
pub trait TextShaper {
    /// Shapes `text` using `base_family` (or fallbacks) at `font_size_pt`.
    fn shape(
        &mut self,
        text: &str,
        locale: &str,
        base_family: &str,
        font_size_pt: f32,
    ) -> Vec<GlyphRun>;
}

/// Font-wide metrics in design units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DesignMetrics {
    /// Distance from the baseline to the top of the line, positive.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line, positive.
    pub descent: f32,
    /// Additional spacing between lines.
    pub line_gap: f32,
    /// Size of the em square in design units.
    pub design_units_per_em: f32,
}

/// Provides font-wide metrics for resolved font faces.
pub trait FontMetricsProvider {
    /// Returns the metrics of `font`, or `None` if the face is unknown.
    fn design_metrics(&mut self, font: FontFaceId) -> Option<DesignMetrics>;
}

/// How glyph outlines are turned into coverage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderingMode {
    /// Bi-level coverage, hinted to the pixel grid.
    Aliased,
    /// Antialiased coverage without vertical symmetric smoothing.
    #[default]
    Natural,
    /// Antialiased coverage with smoothing in both directions.
    NaturalSymmetric,
    /// Glyphs are rendered as filled outlines by the renderer.
    ///
    /// Single-glyph rasterization doesn't support this mode.
    Outline,
}

impl RenderingMode {
    /// The mode to use when rasterizing a single glyph into the atlas.
    ///
    /// Modes the single-glyph path can't handle are replaced with an equivalent
    /// antialiased mode.
    #[inline]
    pub fn for_single_glyph(self) -> Self {
        match self {
            Self::Outline => Self::NaturalSymmetric,
            mode => mode,
        }
    }
}

/// Layout of the coverage bitmap a rasterizer produces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureType {
    /// One coverage byte per pixel.
    Aliased1x1,
    /// Three coverage bytes (R, G, B) per pixel.
    #[default]
    ClearType3x1,
}

impl TextureType {
    /// Number of bytes per pixel in a coverage bitmap of this type.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Aliased1x1 => 1,
            Self::ClearType3x1 => 3,
        }
    }
}

/// A request to rasterize one glyph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RasterRequest {
    /// The face to rasterize from.
    pub font_face: FontFaceId,
    /// The glyph index within the face.
    pub glyph_index: u16,
    /// The em size in pixels.
    pub em_size_px: f32,
    /// The rendering mode.
    pub rendering_mode: RenderingMode,
    /// The requested coverage layout.
    pub texture_type: TextureType,
}

/// Tight pixel bounds of a glyph's ink, relative to its baseline origin.
///
/// The y axis points down: `top` is negative for ink above the baseline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InkBounds {
    /// Left edge, inclusive.
    pub left: i32,
    /// Top edge, inclusive.
    pub top: i32,
    /// Right edge, exclusive.
    pub right: i32,
    /// Bottom edge, exclusive.
    pub bottom: i32,
}

impl InkBounds {
    /// Width of the ink box, zero if the box is inverted.
    #[inline]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0).unsigned_abs()
    }

    /// Height of the ink box, zero if the box is inverted.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0).unsigned_abs()
    }

    /// Whether the glyph has no visible ink.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Coverage of a single glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterizedGlyph {
    /// Ink box of the glyph.
    pub bounds: InkBounds,
    /// Row-major coverage, `bounds.width() * bounds.height()` pixels of
    /// `texture_type.bytes_per_pixel()` bytes each, without row padding.
    pub coverage: Vec<u8>,
    /// Layout of `coverage`.
    pub texture_type: TextureType,
}

/// Rasterizes single glyphs to coverage bitmaps.
pub trait GlyphRasterizer {
    /// Rasterizes the glyph described by `request`.
    fn rasterize(&mut self, request: &RasterRequest) -> Result<RasterizedGlyph, RasterizeError>;
}

/// Failure reported by a [`GlyphRasterizer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RasterizeError {
    /// The rendering mode can't be used for single-glyph rasterization.
    UnsupportedRenderingMode(RenderingMode),
    /// The font can't produce coverage in the requested layout.
    UnsupportedTextureType(TextureType),
    /// The font face is not known to the rasterizer.
    UnknownFont(FontFaceId),
    /// The face has no glyph with this index.
    GlyphNotFound(u16),
}

impl fmt::Display for RasterizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedRenderingMode(mode) => {
                write!(f, "rendering mode {mode:?} is not supported for single glyphs")
            }
            Self::UnsupportedTextureType(ty) => {
                write!(f, "texture type {ty:?} is not supported by the font")
            }
            Self::UnknownFont(font) => write!(f, "unknown font face {}", font.0),
            Self::GlyphNotFound(glyph) => write!(f, "glyph {glyph} not found"),
        }
    }
}

impl core::error::Error for RasterizeError {}
