// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A first-fit guillotine rectangle packer for a fixed-size atlas.
//!
//! The atlas starts out as one free region. Each allocation takes the first free region (in
//! insertion order) that is large enough, shrinks it to the requested size and appends the
//! leftover space as up to three new free regions: one to the right, one below and one in the
//! corner. Regions are never freed or merged, so the packer only fills up.

use alloc::vec::Vec;
use core::fmt;

/// Index of a region in the packer's region list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionIndex(pub u32);

impl RegionIndex {
    /// Terminates the region list in both directions.
    pub const SENTINEL: Self = Self(u32::MAX);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the list terminator.
    #[inline]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

/// A rectangle of the atlas, either free or holding one allocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether the region holds an allocation. Occupied regions never become free again.
    pub occupied: bool,
}

impl Region {
    #[inline]
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    #[inline]
    fn fits(&self, width: u32, height: u32) -> bool {
        !self.occupied && self.width >= width && self.height >= height
    }
}

#[derive(Clone, Debug)]
struct Node {
    region: Region,
    prev: RegionIndex,
    next: RegionIndex,
}

/// A successfully packed rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// The region now holding the allocation.
    pub region: RegionIndex,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Failure to pack a rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PackError {
    /// No free region is large enough for the request.
    AtlasFull {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The request has a zero width or height.
    EmptyRequest,
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtlasFull { width, height } => {
                write!(f, "no free atlas region can hold {width}x{height} pixels")
            }
            Self::EmptyRequest => f.write_str("can't pack an empty rectangle"),
        }
    }
}

impl core::error::Error for PackError {}

/// Guillotine packer over a `width` x `height` atlas.
pub struct GuillotinePacker {
    width: u32,
    height: u32,
    /// Region storage. List order is insertion order, so `nodes[i].next` is always `i + 1`
    /// apart from the tail; the links are what iteration follows.
    nodes: Vec<Node>,
    head: RegionIndex,
    tail: RegionIndex,
    /// Free regions in list order. Searching this instead of the whole list gives the same
    /// first fit, since occupied regions are never candidates.
    free: Vec<RegionIndex>,
    occupied_count: usize,
    occupied_area: u64,
}

impl GuillotinePacker {
    /// Creates a packer whose whole area is one free region.
    pub fn new(width: u32, height: u32) -> Self {
        let mut packer = Self {
            width,
            height,
            nodes: Vec::new(),
            head: RegionIndex::SENTINEL,
            tail: RegionIndex::SENTINEL,
            free: Vec::new(),
            occupied_count: 0,
            occupied_area: 0,
        };
        if width > 0 && height > 0 {
            packer.push_free(0, 0, width, height);
        }
        packer
    }

    /// Width of the atlas in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the atlas in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Finds the first free region in list order that can hold `width` x `height`.
    pub fn find_fit(&self, width: u32, height: u32) -> Option<RegionIndex> {
        self.free
            .iter()
            .copied()
            .find(|&index| self.nodes[index.index()].region.fits(width, height))
    }

    /// Shrinks the free region at `index` to `width` x `height`, marks it occupied and appends
    /// the leftover space as new free regions.
    ///
    /// # Panics
    ///
    /// Panics if the region is occupied or smaller than the requested size.
    pub fn split(&mut self, index: RegionIndex, width: u32, height: u32) -> Allocation {
        let region = self.nodes[index.index()].region;
        assert!(
            region.fits(width, height),
            "region {region:?} can't hold {width}x{height}"
        );

        let node = &mut self.nodes[index.index()];
        node.region.width = width;
        node.region.height = height;
        node.region.occupied = true;
        if let Some(pos) = self.free.iter().position(|&free| free == index) {
            self.free.remove(pos);
        }
        self.occupied_count += 1;
        self.occupied_area += u64::from(width) * u64::from(height);

        let rest_w = region.width - width;
        let rest_h = region.height - height;
        let remainders = [
            (region.x + width, region.y, rest_w, height),
            (region.x, region.y + height, width, rest_h),
            (region.x + width, region.y + height, rest_w, rest_h),
        ];
        for (x, y, w, h) in remainders {
            if w > 0 && h > 0 {
                self.push_free(x, y, w, h);
            }
        }

        Allocation {
            region: index,
            x: region.x,
            y: region.y,
            width,
            height,
        }
    }

    /// Packs a `width` x `height` rectangle.
    pub fn allocate(&mut self, width: u32, height: u32) -> Result<Allocation, PackError> {
        if width == 0 || height == 0 {
            return Err(PackError::EmptyRequest);
        }
        let index = self
            .find_fit(width, height)
            .ok_or(PackError::AtlasFull { width, height })?;
        let allocation = self.split(index, width, height);
        log::trace!(
            "packed {width}x{height} at ({}, {})",
            allocation.x,
            allocation.y
        );
        Ok(allocation)
    }

    /// Looks up a region.
    pub fn region(&self, index: RegionIndex) -> Option<&Region> {
        self.nodes.get(index.index()).map(|node| &node.region)
    }

    /// The region after `index` in list order, or [`RegionIndex::SENTINEL`] at the tail.
    pub fn next_region(&self, index: RegionIndex) -> RegionIndex {
        self.nodes
            .get(index.index())
            .map_or(RegionIndex::SENTINEL, |node| node.next)
    }

    /// The region before `index` in list order, or [`RegionIndex::SENTINEL`] at the head.
    pub fn prev_region(&self, index: RegionIndex) -> RegionIndex {
        self.nodes
            .get(index.index())
            .map_or(RegionIndex::SENTINEL, |node| node.prev)
    }

    /// Iterates over all regions in list order.
    pub fn regions(&self) -> Regions<'_> {
        Regions {
            nodes: &self.nodes,
            current: self.head,
        }
    }

    /// Total number of regions, free and occupied.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the packer has no regions, which only happens for a zero-sized atlas.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of allocations made.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied_count
    }

    /// Area covered by allocations, in pixels.
    #[inline]
    pub fn occupied_area(&self) -> u64 {
        self.occupied_area
    }

    /// Area of all free regions, in pixels.
    pub fn free_area(&self) -> u64 {
        self.free
            .iter()
            .map(|index| self.nodes[index.index()].region.area())
            .sum()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "every region has a positive area, so the count is bounded by the atlas area"
    )]
    fn push_free(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let index = RegionIndex(self.nodes.len() as u32);
        debug_assert!(!index.is_sentinel(), "region list overflow");
        self.nodes.push(Node {
            region: Region {
                x,
                y,
                width,
                height,
                occupied: false,
            },
            prev: self.tail,
            next: RegionIndex::SENTINEL,
        });
        if self.tail.is_sentinel() {
            self.head = index;
        } else {
            self.nodes[self.tail.index()].next = index;
        }
        self.tail = index;
        self.free.push(index);
    }
}

impl fmt::Debug for GuillotinePacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuillotinePacker")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("regions", &self.nodes.len())
            .field("free", &self.free.len())
            .field("occupied", &self.occupied_count)
            .finish_non_exhaustive()
    }
}

/// Iterator over the regions of a [`GuillotinePacker`], following the list links.
#[derive(Clone, Debug)]
pub struct Regions<'a> {
    nodes: &'a [Node],
    current: RegionIndex,
}

impl<'a> Iterator for Regions<'a> {
    type Item = (RegionIndex, &'a Region);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_sentinel() {
            return None;
        }
        let index = self.current;
        let node = &self.nodes[index.index()];
        self.current = node.next;
        Some((index, &node.region))
    }
}

fn overlaps(a: &Region, b: &Region) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Checks that the regions lie inside the atlas, don't overlap and cover it exactly.
///
/// Quadratic in the number of regions; meant for tests.
pub fn check_packing(packer: &GuillotinePacker) -> bool {
    let regions: Vec<Region> = packer.regions().map(|(_, region)| *region).collect();
    let total: u64 = regions.iter().map(Region::area).sum();
    if total != u64::from(packer.width) * u64::from(packer.height) {
        return false;
    }
    regions.iter().enumerate().all(|(i, a)| {
        a.x + a.width <= packer.width
            && a.y + a.height <= packer.height
            && !regions[i + 1..].iter().any(|b| overlaps(a, b))
    })
}
