// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical font metrics, derived once per face.

use core::fmt;

use hashbrown::HashMap;

use crate::run::FontFaceId;
use crate::shaper::FontMetricsProvider;
use crate::units::design_units_to_px;

/// Metrics of a face at the em size it was first seen with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FontMetrics {
    /// Size of the em square in design units.
    pub design_units_per_em: f32,
    /// Distance between consecutive baselines, in pixels.
    pub line_advance_px: f32,
}

/// Failure to derive metrics for a face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MetricsError {
    /// The provider doesn't know the face.
    UnknownFont(FontFaceId),
    /// The provider reported a non-positive em size.
    InvalidUnitsPerEm(FontFaceId),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFont(font) => write!(f, "no metrics for font face {}", font.0),
            Self::InvalidUnitsPerEm(font) => {
                write!(f, "font face {} has no valid units per em", font.0)
            }
        }
    }
}

impl core::error::Error for MetricsError {}

/// Cache from face to derived metrics.
#[derive(Debug, Default)]
pub struct FontMetricsCache {
    entries: HashMap<FontFaceId, FontMetrics>,
}

impl FontMetricsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metrics of `font_face`, querying `provider` on first use.
    pub fn get_or_compute<P: FontMetricsProvider + ?Sized>(
        &mut self,
        font_face: FontFaceId,
        em_size_px: f32,
        provider: &mut P,
    ) -> Result<FontMetrics, MetricsError> {
        if let Some(metrics) = self.entries.get(&font_face) {
            return Ok(*metrics);
        }
        let design = provider
            .design_metrics(font_face)
            .ok_or(MetricsError::UnknownFont(font_face))?;
        let upem = design.design_units_per_em;
        if !upem.is_finite() || upem <= 0.0 {
            return Err(MetricsError::InvalidUnitsPerEm(font_face));
        }
        let metrics = FontMetrics {
            design_units_per_em: design.design_units_per_em,
            line_advance_px: design_units_to_px(
                design.ascent + design.descent + design.line_gap,
                em_size_px,
                design.design_units_per_em,
            ),
        };
        log::debug!(
            "font {} at {em_size_px}px: line advance {}px",
            font_face.0,
            metrics.line_advance_px
        );
        self.entries.insert(font_face, metrics);
        Ok(metrics)
    }

    /// Looks up cached metrics.
    pub fn get(&self, font_face: FontFaceId) -> Option<FontMetrics> {
        self.entries.get(&font_face).copied()
    }

    /// Number of cached faces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no face has been cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
