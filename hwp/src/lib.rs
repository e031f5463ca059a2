// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # hwp
//!
//! High-watermark processing: map an async stream through an async transform
//! with up to N transforms in flight, and get the results back in source
//! order.
//!
//! ## Overview
//!
//! - The source is pulled one item at a time and never further than N items
//!   ahead of the consumer
//! - Results come out in source order even when transforms complete out of
//!   order
//! - The first failure is reported once, after every result queued ahead of it
//! - Every transform receives a [`CancellationSignal`] that is activated when
//!   the consumer stops early or the invocation fails
//!
//! ## Quick Start
//!
//! ```rust
//! use futures::{stream, StreamExt};
//! use hwp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> hwp::Result<()> {
//!     let source = stream::iter(0..42u64).map(StreamItem::Value);
//!
//!     let doubled = map(
//!         source,
//!         |n, _signal: CancellationSignal| async move { Ok::<_, std::io::Error>(n * 2) },
//!         MapOptions::default(),
//!     )
//!     .await?;
//!
//!     assert_eq!(doubled[41], 82);
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use hwp_core::{
    CancellationSignal, CancellationToken, HwpError, MapOptions, Result, StreamItem,
    DEFAULT_HIGH_WATERMARK,
};

// Re-export the engine
pub use hwp_exec::{for_each, map, map_iterator, mapper, HighWatermarkExt, MapIterator, Phase};

/// Prelude module for convenient imports
pub mod prelude {
    pub use hwp_core::{CancellationSignal, CancellationToken, MapOptions, StreamItem};
    pub use hwp_exec::{for_each, map, map_iterator, mapper, HighWatermarkExt, Phase};
}
