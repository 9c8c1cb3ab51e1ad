// Copyright 2025 the Vello Authors and the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mathematical helper functions.

use core::ops::Add;

/// A 2D point or vector in pixel or texture space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    #[inline(always)]
    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub(crate) fn from_array(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }

    #[inline(always)]
    pub(crate) fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// An axis-aligned box with `min <= max` on both axes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Aabb {
    pub(crate) min: Vec2,
    pub(crate) max: Vec2,
}

impl Aabb {
    #[inline(always)]
    pub(crate) const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub(crate) fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// The overlapping part of two boxes, if it has a positive area.
    pub(crate) fn intersection(&self, other: &Self) -> Option<Self> {
        let min = Vec2::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = Vec2::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
        (min.x < max.x && min.y < max.y).then_some(Self::new(min, max))
    }
}

/// Linear interpolation between `a` and `b`.
///
/// Exact at both ends: `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b`.
#[inline(always)]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Where `value` lies within `[start, end]`, as a fraction.
#[inline(always)]
pub(crate) fn normalize01(start: f32, end: f32, value: f32) -> f32 {
    (value - start) / (end - start)
}
