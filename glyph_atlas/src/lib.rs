// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph Atlas rasterizes shaped glyphs once, packs them into a shared texture atlas and
//! lays glyph runs out into clipped, render-ready quads.
//!
//! The pipeline for one frame looks like this:
//!
//! 1. An external [`TextShaper`] turns text into [`GlyphRun`]s.
//! 2. [`TextAtlas::prepare`] resolves every glyph of every run into a [`GlyphCel`],
//!    rasterizing and packing glyphs that have not been seen before.
//! 3. [`TextAtlas::layout`] places the glyphs inside a [`TextContainer`], wrapping lines
//!    and clipping against the container, and emits [`Quad`]s into a [`QuadSink`]
//!    such as [`RenderBatch`].
//! 4. The renderer uploads [`AtlasBitmap`] (when dirty) and the batch buffers.
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables `std` support in dependencies.
//! - `png`: Enables [`AtlasBitmap::write_png`] for inspecting the atlas.
//! - `swash`: Provides [`shaper::swash::SwashFonts`], a shaper, rasterizer and metrics
//!   provider backed by the `swash` crate.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod arena;
pub mod atlas;
pub mod batch;
pub mod layout;
pub mod shaper;
pub mod units;

mod math;
mod metrics;
mod run;
mod text_atlas;

pub use arena::{Arena, ArenaSlice};
pub use atlas::{
    Allocation, AtlasBitmap, GlyphCache, GlyphCel, GuillotinePacker, PackError, PixelFormat,
    RasterError, RasterOptions, Region, RegionIndex,
};
pub use batch::{RenderBatch, Vertex};
pub use layout::{LayoutStats, Quad, QuadSink, TextContainer, layout_text};
pub use metrics::{FontMetrics, FontMetricsCache, MetricsError};
pub use run::{FontFaceId, GlyphOffset, GlyphRun, GlyphRunError};
pub use shaper::{
    DesignMetrics, FontMetricsProvider, GlyphRasterizer, InkBounds, RasterRequest,
    RasterizeError, RasterizedGlyph, RenderingMode, TextShaper, TextureType,
};
pub use text_atlas::{AtlasConfig, PrepareError, PreparedText, TextAtlas};
