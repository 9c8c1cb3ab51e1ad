// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `glyph_atlas`.
//!
//! - The `util` module contains shared utility functions and the scripted font source
//!   needed by different test modules.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which makes sharing the utilities easy.
//! - Put new tests into the module matching their topic, and start test names with the
//!   topic: `cache_two_fonts_two_entries` rather than `two_fonts_cache`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod layout;
mod swash;
mod util;
