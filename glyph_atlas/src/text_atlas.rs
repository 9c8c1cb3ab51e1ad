// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner of all atlas state, driving the per-frame prepare and layout passes.

use core::fmt;

use crate::arena::{Arena, ArenaSlice};
use crate::atlas::{
    AtlasBitmap, GlyphCache, GlyphCel, GuillotinePacker, PixelFormat, RasterOptions,
};
use crate::layout::{LayoutStats, QuadSink, TextContainer, layout_text};
use crate::metrics::{FontMetricsCache, MetricsError};
use crate::run::{FontFaceId, GlyphRun};
use crate::shaper::{
    DesignMetrics, FontMetricsProvider, GlyphRasterizer, RasterRequest, RasterizeError,
    RasterizedGlyph,
};

/// Configuration of a [`TextAtlas`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Size of the atlas texture.
    pub atlas_size: (u32, u32),
    /// Pixel layout of the atlas texture.
    pub format: PixelFormat,
    /// How glyphs are rasterized into the atlas.
    pub raster: RasterOptions,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            atlas_size: (1024, 1024),
            format: PixelFormat::Rgba8,
            raster: RasterOptions::default(),
        }
    }
}

/// Failure of [`TextAtlas::prepare`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrepareError {
    /// Metrics of a run's face couldn't be derived.
    Metrics(MetricsError),
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics(err) => write!(f, "failed to prepare text: {err}"),
        }
    }
}

impl core::error::Error for PrepareError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Metrics(err) => Some(err),
        }
    }
}

impl From<MetricsError> for PrepareError {
    fn from(err: MetricsError) -> Self {
        Self::Metrics(err)
    }
}

/// Glyph runs resolved against the atlas for one frame.
///
/// The data lives in the frame arena and is invalidated by [`Arena::reset`].
#[derive(Copy, Clone, Debug)]
pub struct PreparedText {
    cels: ArenaSlice<GlyphCel>,
    line_advances: ArenaSlice<f32>,
    missing: usize,
}

impl PreparedText {
    /// The cel of every glyph, run after run.
    pub fn cels<'a>(&self, arena: &'a Arena) -> &'a [GlyphCel] {
        arena.get(self.cels)
    }

    /// The line advance of each run's face, in pixels.
    pub fn line_advances<'a>(&self, arena: &'a Arena) -> &'a [f32] {
        arena.get(self.line_advances)
    }

    /// Number of glyphs across all runs.
    pub fn glyph_count(&self) -> usize {
        self.cels.len()
    }

    /// Number of glyphs that couldn't be brought into the atlas.
    pub fn missing_count(&self) -> usize {
        self.missing
    }
}

/// A glyph atlas together with the caches that fill it.
pub struct TextAtlas {
    config: AtlasConfig,
    bitmap: AtlasBitmap,
    packer: GuillotinePacker,
    glyphs: GlyphCache,
    metrics: FontMetricsCache,
}

impl TextAtlas {
    /// Creates an empty atlas.
    pub fn new(config: AtlasConfig) -> Self {
        let (width, height) = config.atlas_size;
        Self {
            config,
            bitmap: AtlasBitmap::new(width, height, config.format),
            packer: GuillotinePacker::new(width, height),
            glyphs: GlyphCache::new(),
            metrics: FontMetricsCache::new(),
        }
    }

    /// Resolves every glyph of `runs`, rasterizing and packing glyphs seen for the first time.
    ///
    /// Glyphs that can't be rasterized or don't fit into the atlas are logged and recorded as
    /// missing; they are retried the next time they are prepared.
    pub fn prepare<P, R>(
        &mut self,
        arena: &mut Arena,
        provider: &mut P,
        rasterizer: &mut R,
        runs: &[GlyphRun],
    ) -> Result<PreparedText, PrepareError>
    where
        P: FontMetricsProvider + ?Sized,
        R: GlyphRasterizer + ?Sized,
    {
        self.prepare_with(
            arena,
            &mut SplitBackend {
                provider,
                rasterizer,
            },
            runs,
        )
    }

    /// Like [`TextAtlas::prepare`], for a font backend that provides both metrics and glyph
    /// bitmaps, such as `SwashFonts`.
    pub fn prepare_with<F>(
        &mut self,
        arena: &mut Arena,
        fonts: &mut F,
        runs: &[GlyphRun],
    ) -> Result<PreparedText, PrepareError>
    where
        F: FontMetricsProvider + GlyphRasterizer + ?Sized,
    {
        let glyph_count = runs.iter().map(GlyphRun::len).sum();
        let cels = arena.alloc_slice::<GlyphCel>(glyph_count);
        let line_advances = arena.alloc_slice::<f32>(runs.len());
        let mut missing = 0;
        let mut next = 0;

        for (run_index, run) in runs.iter().enumerate() {
            let metrics =
                self.metrics
                    .get_or_compute(run.font_face(), run.em_size_px(), fonts)?;
            arena.get_mut(line_advances)[run_index] = metrics.line_advance_px;

            for &glyph_index in run.glyph_indices() {
                let cel = match self.glyphs.get_or_rasterize(
                    run.font_face(),
                    glyph_index,
                    run.em_size_px(),
                    &self.config.raster,
                    fonts,
                    &mut self.bitmap,
                    &mut self.packer,
                ) {
                    Ok(cel) => cel,
                    Err(err) => {
                        log::warn!(
                            "glyph {glyph_index} of font {}: {err}",
                            run.font_face().0
                        );
                        missing += 1;
                        GlyphCel::missing()
                    }
                };
                arena.get_mut(cels)[next] = cel;
                next += 1;
            }
        }

        Ok(PreparedText {
            cels,
            line_advances,
            missing,
        })
    }

    /// Lays out prepared runs inside `container`, emitting quads into `sink`.
    ///
    /// `runs` must be the runs `prepared` was built from.
    pub fn layout<S: QuadSink + ?Sized>(
        &self,
        arena: &Arena,
        prepared: &PreparedText,
        runs: &[GlyphRun],
        container: &TextContainer,
        sink: &mut S,
    ) -> LayoutStats {
        layout_text(
            runs,
            prepared.cels(arena),
            prepared.line_advances(arena),
            container,
            sink,
        )
    }

    /// The configuration the atlas was created with.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// The atlas pixels.
    pub fn bitmap(&self) -> &AtlasBitmap {
        &self.bitmap
    }

    /// Returns whether the atlas pixels changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.bitmap.take_dirty()
    }

    /// The rectangle packer.
    pub fn packer(&self) -> &GuillotinePacker {
        &self.packer
    }

    /// The glyph cache.
    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyphs
    }

    /// The glyph cache, for resetting its statistics.
    pub fn glyph_cache_mut(&mut self) -> &mut GlyphCache {
        &mut self.glyphs
    }

    /// The font metrics cache.
    pub fn metrics(&self) -> &FontMetricsCache {
        &self.metrics
    }
}

/// A metrics provider and a rasterizer borrowed separately, acting as one backend.
struct SplitBackend<'a, P: ?Sized, R: ?Sized> {
    provider: &'a mut P,
    rasterizer: &'a mut R,
}

impl<P: FontMetricsProvider + ?Sized, R: ?Sized> FontMetricsProvider for SplitBackend<'_, P, R> {
    fn design_metrics(&mut self, font: FontFaceId) -> Option<DesignMetrics> {
        self.provider.design_metrics(font)
    }
}

impl<P: ?Sized, R: GlyphRasterizer + ?Sized> GlyphRasterizer for SplitBackend<'_, P, R> {
    fn rasterize(&mut self, request: &RasterRequest) -> Result<RasterizedGlyph, RasterizeError> {
        self.rasterizer.rasterize(request)
    }
}

impl fmt::Debug for TextAtlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextAtlas")
            .field("config", &self.config)
            .field("bitmap", &self.bitmap)
            .field("packer", &self.packer)
            .field("glyphs", &self.glyphs)
            .field("metrics", &self.metrics)
            .finish()
    }
}
