// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod fonts;

pub(crate) use fonts::{MockFonts, SHAPED_ADVANCE_PX};

use glyph_atlas::{FontFaceId, GlyphCel, GlyphRun};

/// Asserts that two floats are equal up to a small tolerance.
#[track_caller]
pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= 1e-5,
        "expected {expected}, got {actual}"
    );
}

/// A run of `advances.len()` glyphs with indices `1..` and no offsets.
pub(crate) fn run_with_advances(font: u64, advances: &[f32]) -> GlyphRun {
    let indices = (1..=advances.len() as u16).collect();
    GlyphRun::with_advances(FontFaceId(font), 16.0, indices, advances.to_vec()).unwrap()
}

/// A drawable cel with its ink box starting at the pen and rising `height` above the baseline.
pub(crate) fn cel(width: u32, height: u32, uv_min: [f32; 2], uv_max: [f32; 2]) -> GlyphCel {
    GlyphCel {
        uv_min,
        uv_max,
        ink_width: width,
        ink_height: height,
        pen_offset: [0.0, height as f32],
        flags: 0,
    }
}
