// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between the unit systems used along the pipeline.
//!
//! - Points: font sizes as requested by the user, 1/72 of an inch.
//! - Design units: the font's internal coordinate grid, `units_per_em` per em.
//! - Pixels: device pixels, which depend on the display density.
//! - UV: normalized `[0, 1]` texture coordinates inside the atlas.

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// The reference display density, at which one pixel is one device-independent pixel.
pub const DEFAULT_DPI: f32 = 96.0;

/// Converts a size in points to pixels at the given display density.
#[inline]
pub fn pt_to_px(pt: f32, dpi: f32) -> f32 {
    pt * dpi / POINTS_PER_INCH
}

/// Scale factor from design units to pixels for a font rendered at `em_size_px`.
#[inline]
pub fn px_per_design_unit(em_size_px: f32, units_per_em: f32) -> f32 {
    em_size_px / units_per_em
}

/// Converts a distance in design units to pixels.
#[inline]
pub fn design_units_to_px(design_units: f32, em_size_px: f32, units_per_em: f32) -> f32 {
    design_units * px_per_design_unit(em_size_px, units_per_em)
}

/// Converts an atlas pixel coordinate into a UV coordinate along an axis of `extent` pixels.
#[inline]
pub fn px_to_uv(px: u32, extent: u32) -> f32 {
    px as f32 / extent as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_to_pixels() {
        assert_eq!(pt_to_px(72.0, DEFAULT_DPI), 96.0);
        assert_eq!(pt_to_px(12.0, 144.0), 24.0);
    }

    #[test]
    fn design_units_to_pixels() {
        // A 2048 upem font at 32px: 1 px per 64 units.
        assert_eq!(design_units_to_px(640.0, 32.0, 2048.0), 10.0);
        assert_eq!(px_per_design_unit(16.0, 1000.0), 0.016);
    }

    #[test]
    fn uv_normalization() {
        assert_eq!(px_to_uv(0, 1024), 0.0);
        assert_eq!(px_to_uv(512, 1024), 0.5);
        assert_eq!(px_to_uv(1024, 1024), 1.0);
    }
}
