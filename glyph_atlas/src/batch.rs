// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex and index buffers for textured glyph quads and untextured panels.

use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};

use crate::layout::{Quad, QuadSink};

/// A vertex as uploaded to the GPU.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position, in pixels until [`RenderBatch::convert_to_ndc`] is called.
    pub pos: [f32; 2],
    /// Texture coordinate in the atlas.
    pub uv: [f32; 2],
}

/// Triangle indices of a quad whose corners are pushed counter-clockwise from bottom-left.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Accumulates quads into indexed triangle lists.
#[derive(Clone, Debug, Default)]
pub struct RenderBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl RenderBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty batch with room for `quads` quads.
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * QUAD_INDICES.len()),
        }
    }

    /// Appends an untextured rectangle covering the full `[0, 1]` texture range,
    /// typically a container background.
    pub fn push_panel(&mut self, min_px: [f32; 2], max_px: [f32; 2]) {
        self.push_rect(min_px, max_px, [0.0, 0.0], [1.0, 1.0]);
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "u32 indices are part of the vertex buffer format"
    )]
    fn push_rect(&mut self, min: [f32; 2], max: [f32; 2], uv_min: [f32; 2], uv_max: [f32; 2]) {
        let base = self.vertices.len() as u32;
        // Pixel space points up, texture space down: the bottom edge samples `uv_max[1]`.
        self.vertices.extend_from_slice(&[
            Vertex {
                pos: [min[0], min[1]],
                uv: [uv_min[0], uv_max[1]],
            },
            Vertex {
                pos: [min[0], max[1]],
                uv: [uv_min[0], uv_min[1]],
            },
            Vertex {
                pos: [max[0], max[1]],
                uv: [uv_max[0], uv_min[1]],
            },
            Vertex {
                pos: [max[0], min[1]],
                uv: [uv_max[0], uv_max[1]],
            },
        ]);
        self.indices
            .extend(QUAD_INDICES.iter().map(|index| base + index));
    }

    /// Converts all vertex positions from pixels to normalized device coordinates.
    pub fn convert_to_ndc(&mut self, viewport_width: f32, viewport_height: f32) {
        for vertex in &mut self.vertices {
            vertex.pos = pixel_to_ndc(vertex.pos, viewport_width, viewport_height);
        }
    }

    /// The vertices pushed so far.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The indices pushed so far.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The vertex buffer as bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Number of quads in the batch.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Removes all quads, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Appends each quad as four vertices and six indices.
impl QuadSink for RenderBatch {
    fn push_quad(&mut self, quad: Quad) {
        self.push_rect(quad.min_px, quad.max_px, quad.uv_min, quad.uv_max);
    }
}

/// Maps a y-up pixel position in a `viewport_width` x `viewport_height` viewport to
/// normalized device coordinates.
#[inline]
pub fn pixel_to_ndc(pos: [f32; 2], viewport_width: f32, viewport_height: f32) -> [f32; 2] {
    [
        pos[0] * 2.0 / viewport_width - 1.0,
        pos[1] * 2.0 / viewport_height - 1.0,
    ]
}
