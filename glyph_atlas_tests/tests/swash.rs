// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests of the swash font backend that don't need font files.

use glyph_atlas::shaper::swash::SwashFonts;
use glyph_atlas::{
    Arena, AtlasConfig, FontFaceId, GlyphRasterizer, GlyphRun, MetricsError, PrepareError,
    RasterRequest, RasterizeError, RenderingMode, TextAtlas, TextShaper, TextureType,
};

fn request(font_face: FontFaceId, rendering_mode: RenderingMode) -> RasterRequest {
    RasterRequest {
        font_face,
        glyph_index: 1,
        em_size_px: 16.0,
        rendering_mode,
        texture_type: TextureType::Aliased1x1,
    }
}

#[test]
fn swash_shape_without_fonts_is_empty() {
    let mut fonts = SwashFonts::default();
    assert!(fonts.shape("Hello", "en-US", "Any", 12.0).is_empty());
    assert_eq!(fonts.find_family("Any"), None);
}

#[test]
fn swash_invalid_font_data_is_rejected() {
    let mut fonts = SwashFonts::default();
    assert_eq!(fonts.add_font("Broken", Vec::new(), 0), None);
    assert_eq!(fonts.find_family("Broken"), None);
}

#[test]
fn swash_outline_mode_is_unsupported() {
    let mut fonts = SwashFonts::default();
    let err = fonts
        .rasterize(&request(FontFaceId(0), RenderingMode::Outline))
        .unwrap_err();
    assert_eq!(
        err,
        RasterizeError::UnsupportedRenderingMode(RenderingMode::Outline)
    );
}

#[test]
fn swash_unknown_face_is_not_rasterized() {
    let mut fonts = SwashFonts::default();
    let err = fonts
        .rasterize(&request(FontFaceId(3), RenderingMode::Natural))
        .unwrap_err();
    assert_eq!(err, RasterizeError::UnknownFont(FontFaceId(3)));
}

#[test]
fn swash_prepare_unknown_face_fails() {
    let mut fonts = SwashFonts::default();
    let mut atlas = TextAtlas::new(AtlasConfig::default());
    let mut arena = Arena::new(4096);
    let runs = [GlyphRun::with_advances(FontFaceId(7), 16.0, vec![1, 2], vec![8.0, 8.0]).unwrap()];

    let err = atlas.prepare_with(&mut arena, &mut fonts, &runs).unwrap_err();
    assert_eq!(
        err,
        PrepareError::Metrics(MetricsError::UnknownFont(FontFaceId(7)))
    );
    assert_eq!(atlas.packer().occupied_count(), 0);
}
