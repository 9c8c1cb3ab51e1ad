// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted stand-in for the shaper, rasterizer and metrics source.

use std::collections::{HashMap, HashSet};

use glyph_atlas::units::{DEFAULT_DPI, pt_to_px};
use glyph_atlas::{
    DesignMetrics, FontFaceId, FontMetricsProvider, GlyphRasterizer, GlyphRun, InkBounds,
    RasterRequest, RasterizeError, RasterizedGlyph, TextShaper, TextureType,
};

/// Advance of every glyph produced by [`MockFonts::shape`].
pub(crate) const SHAPED_ADVANCE_PX: f32 = 10.0;

/// Fonts whose glyphs are solid boxes of a configurable size.
///
/// Every rasterizer request is recorded, so tests can check what was asked for and how often.
pub(crate) struct MockFonts {
    /// Ink box used for glyphs without an entry in `glyph_bounds`.
    pub(crate) default_bounds: InkBounds,
    pub(crate) glyph_bounds: HashMap<u16, InkBounds>,
    /// Faces that only support aliased coverage.
    pub(crate) aliased_only: HashSet<FontFaceId>,
    /// Faces the metrics source and rasterizer don't know.
    pub(crate) unknown: HashSet<FontFaceId>,
    /// Glyphs whose coverage comes back one byte short.
    pub(crate) short_coverage: HashSet<u16>,
    pub(crate) metrics: DesignMetrics,
    /// Coverage value of every ink pixel.
    pub(crate) coverage: u8,
    pub(crate) requests: Vec<RasterRequest>,
}

/// The metrics half of [`MockFonts`], split off so both can be borrowed at once.
pub(crate) struct MockMetrics {
    metrics: DesignMetrics,
    unknown: HashSet<FontFaceId>,
    pub(crate) metric_queries: usize,
}

impl MockFonts {
    /// Glyphs are `width` x `height` boxes sitting on the baseline.
    pub(crate) fn with_glyph_size(width: i32, height: i32) -> Self {
        Self {
            default_bounds: InkBounds {
                left: 0,
                top: -height,
                right: width,
                bottom: 0,
            },
            glyph_bounds: HashMap::new(),
            aliased_only: HashSet::new(),
            unknown: HashSet::new(),
            short_coverage: HashSet::new(),
            // 1000 units per em with a 1.2 em line.
            metrics: DesignMetrics {
                ascent: 800.0,
                descent: 200.0,
                line_gap: 200.0,
                design_units_per_em: 1000.0,
            },
            coverage: 0xC0,
            requests: Vec::new(),
        }
    }

    /// A metrics source agreeing with these fonts.
    pub(crate) fn clone_metrics(&self) -> MockMetrics {
        MockMetrics {
            metrics: self.metrics,
            unknown: self.unknown.clone(),
            metric_queries: 0,
        }
    }

    /// Makes `glyph` an empty glyph, like a space.
    pub(crate) fn set_empty(&mut self, glyph: u16) {
        self.glyph_bounds.insert(glyph, InkBounds::default());
    }

    pub(crate) fn raster_calls(&self) -> usize {
        self.requests.len()
    }
}

impl TextShaper for MockFonts {
    fn shape(
        &mut self,
        text: &str,
        _locale: &str,
        _base_family: &str,
        font_size_pt: f32,
    ) -> Vec<GlyphRun> {
        let indices: Vec<u16> = text.chars().map(|ch| ch as u16).collect();
        let advances = vec![SHAPED_ADVANCE_PX; indices.len()];
        vec![
            GlyphRun::with_advances(
                FontFaceId(1),
                pt_to_px(font_size_pt, DEFAULT_DPI),
                indices,
                advances,
            )
            .unwrap(),
        ]
    }
}

impl FontMetricsProvider for MockMetrics {
    fn design_metrics(&mut self, font: FontFaceId) -> Option<DesignMetrics> {
        self.metric_queries += 1;
        (!self.unknown.contains(&font)).then_some(self.metrics)
    }
}

impl FontMetricsProvider for MockFonts {
    fn design_metrics(&mut self, font: FontFaceId) -> Option<DesignMetrics> {
        (!self.unknown.contains(&font)).then_some(self.metrics)
    }
}

impl GlyphRasterizer for MockFonts {
    fn rasterize(&mut self, request: &RasterRequest) -> Result<RasterizedGlyph, RasterizeError> {
        self.requests.push(*request);
        if self.unknown.contains(&request.font_face) {
            return Err(RasterizeError::UnknownFont(request.font_face));
        }
        if request.texture_type == TextureType::ClearType3x1
            && self.aliased_only.contains(&request.font_face)
        {
            return Err(RasterizeError::UnsupportedTextureType(request.texture_type));
        }
        let bounds = self
            .glyph_bounds
            .get(&request.glyph_index)
            .copied()
            .unwrap_or(self.default_bounds);
        let mut len =
            (bounds.width() * bounds.height()) as usize * request.texture_type.bytes_per_pixel();
        if self.short_coverage.contains(&request.glyph_index) {
            len = len.saturating_sub(1);
        }
        Ok(RasterizedGlyph {
            bounds,
            coverage: vec![self.coverage; len],
            texture_type: request.texture_type,
        })
    }
}
