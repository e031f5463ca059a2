// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for error injection in sources.
//!
//! This module provides a stream wrapper that injects a `StreamItem::Error`
//! into a source, for testing how the engine handles a source that fails
//! part-way through.

use crate::test_error::TestError;
use futures::Stream;
use hwp_core::{HwpError, StreamItem};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A stream wrapper that injects a source error at a given position.
///
/// Values of the inner stream are wrapped in `StreamItem::Value`. When
/// `inject_error_at` items have been emitted, a `StreamItem::Error` wrapping
/// [`TestError::Source`] is emitted instead of pulling the inner stream.
///
/// # Examples
///
/// ```rust
/// use hwp_test_utils::ErrorInjectingStream;
/// use hwp_core::StreamItem;
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// let mut error_stream = ErrorInjectingStream::new(stream::iter(vec![1, 2, 3]), 1);
///
/// // First item is a value
/// let first = error_stream.next().await.unwrap();
/// assert!(matches!(first, StreamItem::Value(1)));
///
/// // Second item is the injected error
/// let second = error_stream.next().await.unwrap();
/// assert!(matches!(second, StreamItem::Error(_)));
///
/// // Third item is a value again
/// let third = error_stream.next().await.unwrap();
/// assert!(matches!(third, StreamItem::Value(2)));
/// # }
/// ```
#[pin_project]
pub struct ErrorInjectingStream<S> {
    #[pin]
    inner: S,
    inject_error_at: Option<usize>,
    count: usize,
}

impl<S> ErrorInjectingStream<S> {
    /// Creates a new error-injecting stream wrapper.
    ///
    /// # Arguments
    ///
    /// * `inner` - The base stream to wrap
    /// * `inject_error_at` - The position (0-indexed) at which to inject an error
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self {
            inner,
            inject_error_at: Some(inject_error_at),
            count: 0,
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.inject_error_at == Some(*this.count) {
            *this.inject_error_at = None;
            *this.count += 1;
            return Poll::Ready(Some(StreamItem::Error(HwpError::source_error(
                TestError::source_failure("injected test error"),
            ))));
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(item)) => {
                *this.count += 1;
                Poll::Ready(Some(StreamItem::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
