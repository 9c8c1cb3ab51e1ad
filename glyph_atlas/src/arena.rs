// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A bump allocator over a block reserved up front.
//!
//! The arena hands out zero-initialised, typed slices and reclaims all of them at once with
//! [`Arena::reset`]. It is intended for per-frame data: everything allocated during a frame
//! dies at the start of the next one. There is no way to free a single allocation and the
//! arena never grows. Running out of space is a sizing bug, so [`Arena::alloc_slice`] panics
//! with a diagnostic instead of returning an error.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use core::mem::{align_of, size_of};

use bytemuck::Pod;

/// Alignment of the arena's backing block.
///
/// Element types with a larger alignment can't be allocated.
pub const ARENA_ALIGN: usize = align_of::<u128>();

/// A bump allocator for plain-old-data values.
pub struct Arena {
    /// Backing block, stored as `u128` so that its base is 16-byte aligned.
    block: Vec<u128>,
    /// Size of the block in bytes.
    capacity: usize,
    /// Bytes handed out since the last reset.
    used: usize,
    /// Incremented on every reset so stale handles can be detected.
    generation: u32,
}

/// A handle to a slice of `T` allocated from an [`Arena`].
///
/// Handles are only valid until the next [`Arena::reset`]; resolving a stale handle panics.
pub struct ArenaSlice<T> {
    offset: usize,
    len: usize,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaSlice<T> {
    /// Number of elements in the slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the slice has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Clone for ArenaSlice<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaSlice<T> {}

impl<T> Debug for ArenaSlice<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArenaSlice")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Arena {
    /// Creates an arena that can hand out up to `capacity` bytes between resets.
    pub fn new(capacity: usize) -> Self {
        let words = capacity.div_ceil(size_of::<u128>());
        Self {
            block: vec![0; words],
            capacity,
            used: 0,
            generation: 0,
        }
    }

    /// Total number of bytes the arena can hand out.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes handed out since the last reset, including alignment padding.
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Number of bytes still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Allocates a zeroed slice of `count` elements.
    ///
    /// # Panics
    ///
    /// Panics if the arena doesn't have enough space left. The arena is sized up front,
    /// so this indicates the configured capacity is too small for the workload.
    #[track_caller]
    pub fn alloc_slice<T: Pod>(&mut self, count: usize) -> ArenaSlice<T> {
        match self.try_alloc_slice(count) {
            Some(slice) => slice,
            None => panic!(
                "arena exhausted: requested {} x {} bytes with {} of {} bytes remaining",
                count,
                size_of::<T>(),
                self.remaining(),
                self.capacity
            ),
        }
    }

    /// Allocates a single zeroed value.
    ///
    /// # Panics
    ///
    /// See [`Arena::alloc_slice`].
    #[track_caller]
    pub fn alloc<T: Pod>(&mut self) -> ArenaSlice<T> {
        self.alloc_slice(1)
    }

    /// Allocates a zeroed slice of `count` elements, or returns `None` if the arena
    /// doesn't have enough space left.
    pub fn try_alloc_slice<T: Pod>(&mut self, count: usize) -> Option<ArenaSlice<T>> {
        assert!(
            align_of::<T>() <= ARENA_ALIGN,
            "arena can't satisfy an alignment of {}",
            align_of::<T>()
        );
        let offset = self.used.next_multiple_of(align_of::<T>());
        let bytes = count.checked_mul(size_of::<T>())?;
        let end = offset.checked_add(bytes)?;
        if end > self.capacity {
            return None;
        }

        // The block may hold data from before the last reset.
        self.bytes_mut()[offset..end].fill(0);
        self.used = end;

        Some(ArenaSlice {
            offset,
            len: count,
            generation: self.generation,
            _marker: PhantomData,
        })
    }

    /// Resolves a handle to its elements.
    ///
    /// # Panics
    ///
    /// Panics if the handle was allocated before the last [`Arena::reset`].
    #[track_caller]
    pub fn get<T: Pod>(&self, slice: ArenaSlice<T>) -> &[T] {
        self.check_generation(&slice);
        let end = slice.offset + slice.len * size_of::<T>();
        bytemuck::cast_slice(&self.bytes()[slice.offset..end])
    }

    /// Resolves a handle to its elements, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle was allocated before the last [`Arena::reset`].
    #[track_caller]
    pub fn get_mut<T: Pod>(&mut self, slice: ArenaSlice<T>) -> &mut [T] {
        self.check_generation(&slice);
        let end = slice.offset + slice.len * size_of::<T>();
        bytemuck::cast_slice_mut(&mut self.bytes_mut()[slice.offset..end])
    }

    /// Reclaims every allocation in O(1).
    ///
    /// Memory is not cleared here; it is zeroed lazily when handed out again.
    pub fn reset(&mut self) {
        self.used = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    #[track_caller]
    fn check_generation<T>(&self, slice: &ArenaSlice<T>) {
        assert_eq!(
            slice.generation, self.generation,
            "arena slice used after the arena was reset"
        );
    }

    fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u128, u8>(&self.block)[..self.capacity]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut bytemuck::cast_slice_mut::<u128, u8>(&mut self.block)[..capacity]
    }
}

impl Debug for Arena {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
