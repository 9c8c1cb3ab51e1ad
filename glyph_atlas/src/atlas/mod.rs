// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph atlas storage: the pixel surface, the rectangle packer and the glyph cache on top.

mod bitmap;
mod cache;
mod packer;

pub use bitmap::{AtlasBitmap, PixelFormat};
pub use cache::{GLYPH_MARGIN, GlyphCache, GlyphCel, RasterError, RasterOptions};
pub use packer::{
    Allocation, GuillotinePacker, PackError, Region, RegionIndex, Regions, check_packing,
};
