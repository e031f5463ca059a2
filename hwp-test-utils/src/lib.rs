// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the hwp workspace.
//!
//! This crate provides sources, probes and assertion helpers for testing the
//! high-watermark engine. It is designed for use in development and testing
//! only, not for production code.
//!
//! # Key Types
//!
//! ## `ConcurrencyProbe`
//!
//! Counts transform invocations as they start and finish, and remembers the
//! largest number that were in flight at the same time:
//!
//! ```rust
//! use hwp_test_utils::ConcurrencyProbe;
//!
//! let probe = ConcurrencyProbe::new();
//! probe.start();
//! probe.start();
//! probe.finish();
//!
//! assert_eq!(probe.started(), 2);
//! assert_eq!(probe.finished(), 1);
//! assert_eq!(probe.max_in_flight(), 2);
//! ```
//!
//! ## Sources
//!
//! ```rust
//! use hwp_test_utils::source_from;
//! use hwp_core::StreamItem;
//! use futures::StreamExt;
//!
//! # async fn example() {
//! let items: Vec<_> = source_from(vec![1, 2]).collect().await;
//! assert_eq!(items, vec![StreamItem::Value(1), StreamItem::Value(2)]);
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `concurrency_probe` - `ConcurrencyProbe` counters
//! - `error_injection` - `ErrorInjectingStream` source wrapper
//! - `helpers` - sources, jitter and assertion functions
//! - `test_error` - `TestError`, the error returned by failing transforms

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod concurrency_probe;
pub mod error_injection;
pub mod helpers;
pub mod test_error;

use futures::{Stream, StreamExt};
use hwp_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

// Re-export commonly used test utilities
pub use concurrency_probe::ConcurrencyProbe;
pub use error_injection::ErrorInjectingStream;
pub use helpers::{assert_no_element_emitted, failing_source, jitter, source_from};
pub use test_error::TestError;

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// The stream stays open until the sender is dropped, which makes it a source
/// whose next item the test controls.
///
/// # Example
///
/// ```rust
/// use hwp_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send(42).unwrap();
///
/// let item = stream.next().await.unwrap().unwrap(); // Option -> StreamItem -> Value
/// assert_eq!(item, 42);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
///
/// Sending a `StreamItem::Error` makes the source fail at that position, after
/// whatever values were sent before it.
///
/// # Example
///
/// ```rust
/// use hwp_test_utils::test_channel_with_errors;
/// use hwp_core::{HwpError, StreamItem};
/// use hwp_test_utils::TestError;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel_with_errors();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(HwpError::source_error(TestError::source_failure("eof")))).unwrap();
///
/// let value = stream.next().await.unwrap();
/// let error = stream.next().await.unwrap();
/// assert!(value.is_value());
/// assert!(error.is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
