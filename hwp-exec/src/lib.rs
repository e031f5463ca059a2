// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Bounded-concurrency, order-preserving map over async streams.
//!
//! - [`map_iterator`] is the engine: a lazy stream of results in source order
//! - [`map`] and [`for_each`] drive it to completion
//! - [`mapper`] binds a transform into a reusable stage
//! - [`HighWatermarkExt`] exposes the same operations as stream methods

#[macro_use]
mod logging;

pub mod high_watermark_ext;
pub mod map;
pub mod map_iterator;
pub mod mapper;

pub use self::high_watermark_ext::HighWatermarkExt;
pub use self::map::{for_each, map};
pub use self::map_iterator::{map_iterator, MapIterator, Phase};
pub use self::mapper::mapper;
