// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of prepared glyph runs inside a rectangular container.
//!
//! Layout happens in a pixel space with the y axis pointing up. The pen starts on the first
//! baseline, one line advance below the top of the container, and moves right by each glyph's
//! advance. Lines wrap greedily with one glyph of lookahead: before a glyph is placed, the
//! projected right ink edge of the glyph after it is checked against the container width, and
//! if it would overflow, the pen moves to the start of the next line first. Wrapping is per
//! glyph, not per grapheme or word. Glyphs are clipped against the container,
//! with their texture coordinates trimmed to the visible part.

use alloc::vec::Vec;

use crate::atlas::GlyphCel;
use crate::math::{Aabb, Vec2, lerp, normalize01};
use crate::run::GlyphRun;

/// The box text is laid out in.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextContainer {
    /// Top-left corner, in a pixel space with y pointing up.
    pub origin_px: [f32; 2],
    /// Width in pixels.
    pub width_px: f32,
    /// Height in pixels.
    pub height_px: f32,
}

impl TextContainer {
    /// Creates a container with its top-left corner at `origin_px`.
    pub fn new(origin_px: [f32; 2], width_px: f32, height_px: f32) -> Self {
        Self {
            origin_px,
            width_px,
            height_px,
        }
    }

    /// The container's extent: `[x, x + w] x [y - h, y]`.
    fn bounds(&self) -> Aabb {
        let [x, y] = self.origin_px;
        Aabb::new(
            Vec2::new(x, y - self.height_px),
            Vec2::new(x + self.width_px, y),
        )
    }
}

/// A textured rectangle ready for rendering.
///
/// Positions are in the y-up pixel space of the container. Texture coordinates are in the
/// y-down space of the atlas, so the top edge of the quad (`max_px[1]`) samples `uv_min[1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Quad {
    /// Bottom-left corner.
    pub min_px: [f32; 2],
    /// Top-right corner.
    pub max_px: [f32; 2],
    /// Texture coordinate of the top-left corner.
    pub uv_min: [f32; 2],
    /// Texture coordinate of the bottom-right corner.
    pub uv_max: [f32; 2],
}

/// Receives the quads produced by layout.
pub trait QuadSink {
    /// Accepts one quad.
    fn push_quad(&mut self, quad: Quad);
}

impl QuadSink for Vec<Quad> {
    fn push_quad(&mut self, quad: Quad) {
        self.push(quad);
    }
}

/// What happened to the glyphs of one layout pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Lines started, including the first one.
    pub lines: usize,
    /// Quads handed to the sink.
    pub emitted: usize,
    /// Glyphs entirely outside the container.
    pub culled: usize,
    /// Emitted quads that were trimmed by the container.
    pub clipped: usize,
    /// Glyphs without ink or without a cel.
    pub skipped: usize,
}

/// Lays out `runs` inside `container` and emits one quad per visible glyph.
///
/// `cels` holds the prepared cel of every glyph, run after run, and `line_advances_px` the
/// line advance of each run's face.
///
/// # Panics
///
/// Panics if `cels` or `line_advances_px` don't match the runs.
pub fn layout_text<S: QuadSink + ?Sized>(
    runs: &[GlyphRun],
    cels: &[GlyphCel],
    line_advances_px: &[f32],
    container: &TextContainer,
    sink: &mut S,
) -> LayoutStats {
    assert_eq!(
        cels.len(),
        runs.iter().map(GlyphRun::len).sum::<usize>(),
        "one cel per glyph is required"
    );
    assert_eq!(
        line_advances_px.len(),
        runs.len(),
        "one line advance per run is required"
    );

    let mut stats = LayoutStats::default();
    if cels.is_empty() {
        return stats;
    }
    stats.lines = 1;

    let first_line = line_advances_px.iter().copied().fold(0.0_f32, f32::max);
    let translate = Vec2::new(
        container.origin_px[0],
        container.origin_px[1] - first_line,
    );
    let clip = container.bounds();
    let mut pen = Vec2::default();
    let mut run_cels = cels;

    for (run, &line_advance) in runs.iter().zip(line_advances_px) {
        let (current, rest) = run_cels.split_at(run.len());
        run_cels = rest;
        let advances = run.glyph_advances_px();
        let offsets = run.glyph_offsets();

        for (i, cel) in current.iter().enumerate() {
            // Look ahead: if the next glyph's ink would cross the right edge, wrap before this one.
            let wraps = current.get(i + 1).is_some_and(|next| {
                let next_end = pen.x
                    + advances[i]
                    + offsets[i + 1].advance_offset
                    + next.pen_offset[0]
                    + next.ink_width as f32;
                next_end > container.width_px
            });
            if wraps {
                pen.x = 0.0;
                pen.y -= line_advance;
                stats.lines += 1;
            }

            let origin = pen
                + translate
                + Vec2::new(offsets[i].advance_offset, offsets[i].ascender_offset);
            if cel.is_drawable() {
                place_glyph(cel, origin, &clip, sink, &mut stats);
            } else {
                stats.skipped += 1;
            }
            // Culled and empty glyphs advance too.
            pen.x += advances[i];
        }
    }

    stats
}

fn place_glyph<S: QuadSink + ?Sized>(
    cel: &GlyphCel,
    origin: Vec2,
    clip: &Aabb,
    sink: &mut S,
    stats: &mut LayoutStats,
) {
    let min_x = origin.x + cel.pen_offset[0];
    let max_y = origin.y + cel.pen_offset[1];
    let rect = Aabb::new(
        Vec2::new(min_x, max_y - cel.ink_height as f32),
        Vec2::new(min_x + cel.ink_width as f32, max_y),
    );

    let Some(visible) = rect.intersection(clip) else {
        stats.culled += 1;
        return;
    };

    let quad = if visible == rect {
        Quad {
            min_px: rect.min.to_array(),
            max_px: rect.max.to_array(),
            uv_min: cel.uv_min,
            uv_max: cel.uv_max,
        }
    } else {
        stats.clipped += 1;
        clipped_quad(cel, &rect, &visible)
    };
    sink.push_quad(quad);
    stats.emitted += 1;
}

/// Trims a glyph quad to `visible`, remapping its texture coordinates linearly.
fn clipped_quad(cel: &GlyphCel, rect: &Aabb, visible: &Aabb) -> Quad {
    let uv_min = Vec2::from_array(cel.uv_min);
    let uv_max = Vec2::from_array(cel.uv_max);

    let u = |x: f32| lerp(uv_min.x, uv_max.x, normalize01(rect.min.x, rect.max.x, x));
    // Texture space runs downwards from the top edge of the quad.
    let v = |y: f32| lerp(uv_min.y, uv_max.y, normalize01(rect.max.y, rect.min.y, y));

    debug_assert!(
        rect.width() > 0.0 && rect.height() > 0.0,
        "drawable glyphs have ink"
    );
    Quad {
        min_px: visible.min.to_array(),
        max_px: visible.max.to_array(),
        uv_min: [u(visible.min.x), v(visible.max.y)],
        uv_max: [u(visible.max.x), v(visible.min.y)],
    }
}
