// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph placement, line wrapping and clipping tests.

use glyph_atlas::{GlyphCel, LayoutStats, Quad, TextContainer, layout_text};

use crate::util::{assert_close, cel, run_with_advances};

const UV_MIN: [f32; 2] = [0.2, 0.3];
const UV_MAX: [f32; 2] = [0.6, 0.7];

fn quads_for(
    advances: &[f32],
    cels: &[GlyphCel],
    line_advance: f32,
    container: &TextContainer,
) -> (Vec<Quad>, LayoutStats) {
    let run = run_with_advances(1, advances);
    let mut quads = Vec::new();
    let stats = layout_text(&[run], cels, &[line_advance], container, &mut quads);
    (quads, stats)
}

#[test]
fn layout_wrap_before_overflowing_glyph() {
    let container = TextContainer::new([0.0, 300.0], 90.0, 300.0);
    let cels = [cel(50, 10, UV_MIN, UV_MAX); 3];
    let (quads, stats) = quads_for(&[50.0, 50.0, 50.0], &cels, 20.0, &container);

    // At glyph 0 the next glyph would end at 100 > 90, so the pen wraps before glyph 0 is
    // placed. At glyph 1 the next glyph would end at 150, so it wraps again. Glyph 2 is last
    // and follows glyph 1 on the third line, crossing the right edge.
    assert_eq!(stats.lines, 3);
    assert_eq!(stats.emitted, 3);
    assert_eq!(stats.clipped, 1);
    let origins: Vec<[f32; 2]> = quads.iter().map(|q| q.min_px).collect();
    assert_eq!(origins, [[0.0, 260.0], [0.0, 240.0], [50.0, 240.0]]);
    assert_eq!(quads[2].max_px[0], 90.0);
}

#[test]
fn layout_wrap_allows_exact_fit() {
    let container = TextContainer::new([0.0, 100.0], 90.0, 100.0);
    let cels = [cel(30, 10, UV_MIN, UV_MAX); 3];
    let (quads, stats) = quads_for(&[30.0, 30.0, 30.0], &cels, 20.0, &container);

    // The last glyph ends exactly on the right edge, which doesn't wrap.
    assert_eq!(stats.lines, 1);
    let xs: Vec<f32> = quads.iter().map(|q| q.min_px[0]).collect();
    assert_eq!(xs, [0.0, 30.0, 60.0]);
    assert_eq!(stats.clipped, 0);
}

#[test]
fn layout_wrap_is_deterministic() {
    let container = TextContainer::new([0.0, 500.0], 100.0, 500.0);
    let advances = [30.0, 45.0, 20.0, 60.0, 10.0, 35.0, 50.0];
    let cels: Vec<GlyphCel> = advances
        .iter()
        .map(|&a| cel(a as u32, 8, UV_MIN, UV_MAX))
        .collect();

    let (first, first_stats) = quads_for(&advances, &cels, 12.0, &container);
    let (second, second_stats) = quads_for(&advances, &cels, 12.0, &container);
    assert_eq!(first, second);
    assert_eq!(first_stats, second_stats);
    // With these advances every glyph stays left of the right edge.
    assert!(first.iter().all(|q| q.max_px[0] <= 100.0));
}

#[test]
fn layout_unclipped_glyph_keeps_uvs() {
    let container = TextContainer::new([10.0, 100.0], 200.0, 100.0);
    let (quads, stats) = quads_for(&[12.0], &[cel(10, 10, UV_MIN, UV_MAX)], 20.0, &container);

    assert_eq!(stats.clipped, 0);
    assert_eq!(quads[0].uv_min, UV_MIN);
    assert_eq!(quads[0].uv_max, UV_MAX);
    assert_eq!(quads[0].min_px, [10.0, 80.0]);
    assert_eq!(quads[0].max_px, [20.0, 90.0]);
}

#[test]
fn layout_clip_half_width_remaps_uvs() {
    let container = TextContainer::new([0.0, 100.0], 50.0, 100.0);
    let mut glyph = cel(20, 10, UV_MIN, UV_MAX);
    glyph.pen_offset[0] = 40.0;
    let (quads, stats) = quads_for(&[60.0], &[glyph], 20.0, &container);

    assert_eq!(stats.clipped, 1);
    assert_eq!(quads[0].min_px, [40.0, 80.0]);
    assert_eq!(quads[0].max_px, [50.0, 90.0]);
    assert_eq!(quads[0].uv_min[0], UV_MIN[0]);
    assert_close(quads[0].uv_max[0], 0.5 * (UV_MIN[0] + UV_MAX[0]));
    // The glyph isn't clipped vertically.
    assert_eq!(quads[0].uv_min[1], UV_MIN[1]);
    assert_eq!(quads[0].uv_max[1], UV_MAX[1]);
}

#[test]
fn layout_clip_left_edge() {
    let container = TextContainer::new([0.0, 100.0], 50.0, 100.0);
    let mut glyph = cel(20, 10, UV_MIN, UV_MAX);
    glyph.pen_offset[0] = -5.0;
    let (quads, _) = quads_for(&[20.0], &[glyph], 20.0, &container);

    assert_eq!(quads[0].min_px[0], 0.0);
    assert_close(quads[0].uv_min[0], 0.3);
    assert_eq!(quads[0].uv_max[0], UV_MAX[0]);
}

#[test]
fn layout_glyphs_outside_are_culled() {
    // Only room for the first line.
    let container = TextContainer::new([0.0, 25.0], 60.0, 25.0);
    let cels = [
        cel(20, 10, UV_MIN, UV_MAX),
        cel(40, 10, UV_MIN, UV_MAX),
        cel(40, 10, UV_MIN, UV_MAX),
    ];
    let (quads, stats) = quads_for(&[20.0, 40.0, 40.0], &cels, 20.0, &container);

    // At glyph 0 the next glyph ends exactly at 60, so glyph 0 stays on the first line. At
    // glyph 1 the next glyph would end at 100, so glyph 1 wraps below the container and
    // glyph 2 follows it.
    assert_eq!(stats.lines, 2);
    assert_eq!(stats.emitted, 1);
    assert_eq!(stats.culled, 2);
    assert_eq!(quads.len(), 1);
    assert_eq!(quads[0].min_px, [0.0, 5.0]);
}

#[test]
fn layout_first_baseline_uses_tallest_run() {
    let container = TextContainer::new([0.0, 200.0], 500.0, 200.0);
    let runs = [
        run_with_advances(1, &[10.0]),
        run_with_advances(2, &[10.0, 10.0]),
    ];
    let cels = [cel(8, 8, UV_MIN, UV_MAX); 3];
    let mut quads = Vec::new();
    layout_text(&runs, &cels, &[20.0, 35.0], &container, &mut quads);

    // All glyphs share the first baseline at 200 - 35, and the pen carries across runs.
    let origins: Vec<[f32; 2]> = quads.iter().map(|q| q.min_px).collect();
    assert_eq!(origins, [[0.0, 165.0], [10.0, 165.0], [20.0, 165.0]]);
}

#[test]
fn layout_wrap_uses_the_run_line_advance() {
    let container = TextContainer::new([0.0, 200.0], 25.0, 200.0);
    let runs = [
        run_with_advances(1, &[10.0]),
        run_with_advances(2, &[10.0, 10.0, 10.0]),
    ];
    let cels = [cel(8, 8, UV_MIN, UV_MAX); 4];
    let mut quads = Vec::new();
    let stats = layout_text(&runs, &cels, &[20.0, 35.0], &container, &mut quads);

    // The last glyph of a run doesn't look ahead, so the first run stays on the first line.
    // In the second run, glyphs 0 and 1 each see the next glyph end at 10 + 10 + 8 = 28 and
    // wrap by the second run's line advance.
    assert_eq!(stats.lines, 3);
    assert_eq!(quads[0].min_px, [0.0, 165.0]);
    assert_eq!(quads[1].min_px, [0.0, 130.0]);
    assert_eq!(quads[2].min_px, [0.0, 95.0]);
    assert_eq!(quads[3].min_px, [10.0, 95.0]);
}

#[test]
fn layout_missing_glyphs_still_advance() {
    let container = TextContainer::new([0.0, 100.0], 100.0, 100.0);
    let cels = [
        cel(8, 8, UV_MIN, UV_MAX),
        GlyphCel::missing(),
        cel(8, 8, UV_MIN, UV_MAX),
    ];
    let (quads, stats) = quads_for(&[10.0, 10.0, 10.0], &cels, 20.0, &container);

    assert_eq!(stats.skipped, 1);
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[1].min_px[0], 20.0);
}
