// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::test_error::TestError;
use futures::stream::{self, StreamExt};
use futures::Stream;
use hwp_core::{HwpError, StreamItem};
use std::time::Duration;
use tokio::time::sleep;

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// A source emitting every element of `items` as `StreamItem::Value`.
pub fn source_from<T, I>(items: I) -> impl Stream<Item = StreamItem<T>> + Send + 'static
where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    T: Send + 'static,
{
    stream::iter(items).map(StreamItem::Value)
}

/// A source that fails before producing anything.
pub fn failing_source<T>(message: &str) -> impl Stream<Item = StreamItem<T>> + Send + 'static
where
    T: Send + 'static,
{
    stream::iter(vec![StreamItem::Error(HwpError::source_error(
        TestError::source_failure(message),
    ))])
}

/// Sleeps for a random duration below `max_ms` milliseconds.
pub async fn jitter(max_ms: u64) {
    sleep(Duration::from_millis(fastrand::u64(0..max_ms.max(1)))).await;
}
