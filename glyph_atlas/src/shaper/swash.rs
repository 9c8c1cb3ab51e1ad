// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A font source, shaper, rasterizer and metrics provider backed by `swash`.
//!
//! Shaping is a plain character to glyph mapping with advances from the font's horizontal
//! metrics: no kerning, no ligatures and no fallback beyond the registered fonts.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::{Format, Placement};
use swash::FontRef;

use super::{
    DesignMetrics, FontMetricsProvider, GlyphRasterizer, InkBounds, RasterRequest,
    RasterizeError, RasterizedGlyph, RenderingMode, TextShaper, TextureType,
};
use crate::run::{FontFaceId, GlyphRun};
use crate::units::{DEFAULT_DPI, pt_to_px};

/// Coverage at or above this value is kept by [`RenderingMode::Aliased`].
const ALIASED_THRESHOLD: u8 = 0x80;

/// Index of a font registered with [`SwashFonts::add_font`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SwashFontId(usize);

struct FontData {
    family: String,
    data: Vec<u8>,
    index: usize,
}

/// A collection of in-memory fonts.
pub struct SwashFonts {
    fonts: Vec<FontData>,
    /// Font and em size bits of each face handed out, indexed by [`FontFaceId`].
    faces: Vec<(SwashFontId, f32)>,
    face_ids: HashMap<(SwashFontId, u32), FontFaceId>,
    dpi: f32,
    scale_cx: ScaleContext,
}

impl SwashFonts {
    /// Creates an empty collection that converts point sizes at `dpi`.
    pub fn new(dpi: f32) -> Self {
        Self {
            fonts: Vec::new(),
            faces: Vec::new(),
            face_ids: HashMap::new(),
            dpi,
            scale_cx: ScaleContext::new(),
        }
    }

    /// Registers the font at `index` in the font file `data` under `family`.
    ///
    /// Returns `None` if the data can't be parsed.
    pub fn add_font(&mut self, family: &str, data: Vec<u8>, index: usize) -> Option<SwashFontId> {
        FontRef::from_index(&data, index)?;
        let id = SwashFontId(self.fonts.len());
        self.fonts.push(FontData {
            family: family.into(),
            data,
            index,
        });
        Some(id)
    }

    /// Looks up a registered font by family name, ignoring ASCII case.
    pub fn find_family(&self, family: &str) -> Option<SwashFontId> {
        self.fonts
            .iter()
            .position(|font| font.family.eq_ignore_ascii_case(family))
            .map(SwashFontId)
    }

    /// The stable identity of `font` at `em_size_px`.
    pub fn face(&mut self, font: SwashFontId, em_size_px: f32) -> FontFaceId {
        let faces = &mut self.faces;
        *self
            .face_ids
            .entry((font, em_size_px.to_bits()))
            .or_insert_with(|| {
                faces.push((font, em_size_px));
                FontFaceId(faces.len() as u64 - 1)
            })
    }

    fn font_ref(&self, font: SwashFontId) -> Option<FontRef<'_>> {
        let data = self.fonts.get(font.0)?;
        FontRef::from_index(&data.data, data.index)
    }

    fn resolve(&self, face: FontFaceId) -> Option<(SwashFontId, f32)> {
        self.faces.get(usize::try_from(face.0).ok()?).copied()
    }
}

impl Default for SwashFonts {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

impl fmt::Debug for SwashFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwashFonts")
            .field("fonts", &self.fonts.len())
            .field("faces", &self.faces.len())
            .field("dpi", &self.dpi)
            .finish_non_exhaustive()
    }
}

impl TextShaper for SwashFonts {
    fn shape(
        &mut self,
        text: &str,
        locale: &str,
        base_family: &str,
        font_size_pt: f32,
    ) -> Vec<GlyphRun> {
        let Some(font) = self.find_family(base_family).or_else(|| {
            (!self.fonts.is_empty()).then_some(SwashFontId(0))
        }) else {
            log::warn!("no font registered to shape {base_family:?}");
            return Vec::new();
        };
        if text.is_empty() {
            return Vec::new();
        }
        log::trace!("shaping {} chars for locale {locale}", text.len());

        let em_size_px = pt_to_px(font_size_pt, self.dpi);
        let face = self.face(font, em_size_px);
        let Some(font_ref) = self.font_ref(font) else {
            return Vec::new();
        };
        let charmap = font_ref.charmap();
        let metrics = font_ref.glyph_metrics(&[]).scale(em_size_px);

        let (indices, advances): (Vec<u16>, Vec<f32>) = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| {
                let glyph = charmap.map(ch);
                (glyph, metrics.advance_width(glyph))
            })
            .unzip();

        // The arrays are built together, so their lengths always agree.
        GlyphRun::with_advances(face, em_size_px, indices, advances)
            .into_iter()
            .collect()
    }
}

impl FontMetricsProvider for SwashFonts {
    fn design_metrics(&mut self, font: FontFaceId) -> Option<DesignMetrics> {
        let (font, _) = self.resolve(font)?;
        let metrics = self.font_ref(font)?.metrics(&[]);
        Some(DesignMetrics {
            ascent: metrics.ascent,
            descent: metrics.descent,
            line_gap: metrics.leading,
            design_units_per_em: f32::from(metrics.units_per_em),
        })
    }
}

impl GlyphRasterizer for SwashFonts {
    fn rasterize(&mut self, request: &RasterRequest) -> Result<RasterizedGlyph, RasterizeError> {
        if request.rendering_mode == RenderingMode::Outline {
            return Err(RasterizeError::UnsupportedRenderingMode(
                request.rendering_mode,
            ));
        }
        let (font, _) = self
            .resolve(request.font_face)
            .ok_or(RasterizeError::UnknownFont(request.font_face))?;
        let data = self
            .fonts
            .get(font.0)
            .ok_or(RasterizeError::UnknownFont(request.font_face))?;
        let font_ref = FontRef::from_index(&data.data, data.index)
            .ok_or(RasterizeError::UnknownFont(request.font_face))?;
        if request.glyph_index >= font_ref.metrics(&[]).glyph_count {
            return Err(RasterizeError::GlyphNotFound(request.glyph_index));
        }

        let aliased = request.rendering_mode == RenderingMode::Aliased;
        let mut scaler = self
            .scale_cx
            .builder(font_ref)
            .size(request.em_size_px)
            .hint(aliased)
            .build();
        let format = match request.texture_type {
            TextureType::Aliased1x1 => Format::Alpha,
            TextureType::ClearType3x1 => Format::Subpixel,
        };
        let Some(image) = Render::new(&[Source::Outline])
            .format(format)
            .render(&mut scaler, request.glyph_index)
        else {
            // No outline: nothing to draw.
            return Ok(RasterizedGlyph {
                bounds: InkBounds::default(),
                coverage: Vec::new(),
                texture_type: request.texture_type,
            });
        };

        let mut coverage = match request.texture_type {
            TextureType::Aliased1x1 => image.data,
            TextureType::ClearType3x1 => subpixel_to_rgb(&image.data),
        };
        if aliased {
            threshold_coverage(&mut coverage);
        }

        Ok(RasterizedGlyph {
            bounds: ink_bounds(image.placement),
            coverage,
            texture_type: request.texture_type,
        })
    }
}

/// Converts a placement, whose `top` is measured upwards from the baseline, to y-down ink bounds.
fn ink_bounds(placement: Placement) -> InkBounds {
    let top = -placement.top;
    InkBounds {
        left: placement.left,
        top,
        right: placement.left + placement.width as i32,
        bottom: top + placement.height as i32,
    }
}

/// Drops the alpha channel of a subpixel mask, which swash renders as RGBA.
fn subpixel_to_rgb(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// Snaps antialiased coverage to fully on or off.
fn threshold_coverage(coverage: &mut [u8]) {
    for value in coverage {
        *value = if *value >= ALIASED_THRESHOLD { 0xFF } else { 0 };
    }
}
