// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaped glyph runs, as produced by a [`TextShaper`](crate::TextShaper).

use alloc::vec::Vec;
use core::fmt;

/// Opaque identity of a resolved font face at a particular em size.
///
/// The shaper hands these out and must keep them stable: the same underlying face at the same
/// size must always map to the same identity for as long as the atlas lives, and two different
/// faces (or sizes) must never share one. The glyph and metrics caches are keyed on this value
/// and can't detect a shaper that breaks the contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontFaceId(pub u64);

/// Per-glyph positioning adjustment reported by the shaper, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphOffset {
    /// Offset along the advance direction.
    pub advance_offset: f32,
    /// Offset perpendicular to the advance direction, positive upwards.
    pub ascender_offset: f32,
}

/// A maximal sequence of glyphs sharing one resolved font face.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    font_face: FontFaceId,
    em_size_px: f32,
    glyph_indices: Vec<u16>,
    glyph_advances_px: Vec<f32>,
    glyph_offsets: Vec<GlyphOffset>,
}

impl GlyphRun {
    /// Creates a run from parallel per-glyph arrays.
    ///
    /// Returns an error if the arrays don't all have the same length.
    pub fn new(
        font_face: FontFaceId,
        em_size_px: f32,
        glyph_indices: Vec<u16>,
        glyph_advances_px: Vec<f32>,
        glyph_offsets: Vec<GlyphOffset>,
    ) -> Result<Self, GlyphRunError> {
        let len = glyph_indices.len();
        if glyph_advances_px.len() != len || glyph_offsets.len() != len {
            return Err(GlyphRunError::LengthMismatch {
                indices: len,
                advances: glyph_advances_px.len(),
                offsets: glyph_offsets.len(),
            });
        }
        Ok(Self {
            font_face,
            em_size_px,
            glyph_indices,
            glyph_advances_px,
            glyph_offsets,
        })
    }

    /// Creates a run whose glyphs have no positioning offsets.
    pub fn with_advances(
        font_face: FontFaceId,
        em_size_px: f32,
        glyph_indices: Vec<u16>,
        glyph_advances_px: Vec<f32>,
    ) -> Result<Self, GlyphRunError> {
        let offsets = alloc::vec![GlyphOffset::default(); glyph_indices.len()];
        Self::new(
            font_face,
            em_size_px,
            glyph_indices,
            glyph_advances_px,
            offsets,
        )
    }

    /// The face all glyphs of this run are rendered with.
    #[inline]
    pub fn font_face(&self) -> FontFaceId {
        self.font_face
    }

    /// The em size of the face, in pixels.
    #[inline]
    pub fn em_size_px(&self) -> f32 {
        self.em_size_px
    }

    /// Glyph indices within the face.
    #[inline]
    pub fn glyph_indices(&self) -> &[u16] {
        &self.glyph_indices
    }

    /// Horizontal advance of each glyph, in pixels.
    #[inline]
    pub fn glyph_advances_px(&self) -> &[f32] {
        &self.glyph_advances_px
    }

    /// Positioning offsets of each glyph.
    #[inline]
    pub fn glyph_offsets(&self) -> &[GlyphOffset] {
        &self.glyph_offsets
    }

    /// Number of glyphs in the run.
    #[inline]
    pub fn len(&self) -> usize {
        self.glyph_indices.len()
    }

    /// Whether the run has no glyphs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyph_indices.is_empty()
    }
}

/// A run was built from inconsistent per-glyph arrays.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GlyphRunError {
    /// The index, advance and offset arrays have different lengths.
    LengthMismatch {
        /// Number of glyph indices.
        indices: usize,
        /// Number of advances.
        advances: usize,
        /// Number of offsets.
        offsets: usize,
    },
}

impl fmt::Display for GlyphRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                indices,
                advances,
                offsets,
            } => write!(
                f,
                "glyph run has {indices} indices, {advances} advances and {offsets} offsets"
            ),
        }
    }
}

impl core::error::Error for GlyphRunError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn run_rejects_mismatched_lengths() {
        let err = GlyphRun::new(
            FontFaceId(1),
            16.0,
            vec![1, 2, 3],
            vec![10.0, 10.0],
            vec![GlyphOffset::default(); 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GlyphRunError::LengthMismatch {
                indices: 3,
                advances: 2,
                offsets: 3
            }
        );
    }

    #[test]
    fn run_with_advances_fills_offsets() {
        let run = GlyphRun::with_advances(FontFaceId(1), 16.0, vec![4, 5], vec![8.0, 9.0]).unwrap();
        assert_eq!(run.len(), 2);
        assert_eq!(run.glyph_offsets(), &[GlyphOffset::default(); 2]);
    }
}
