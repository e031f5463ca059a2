// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Eager consumers of [`map_iterator`].

use crate::map_iterator::map_iterator;
use core::future::Future;
use futures::{Stream, StreamExt};
use hwp_core::{CancellationSignal, MapOptions, Result, StreamItem};

/// Runs [`map_iterator`] to completion and collects the results in source
/// order.
///
/// # Errors
///
/// Returns the first error yielded by the sequence: the failure of the first
/// failed transform in source order, a source error, or
/// `HwpError::InvalidHighWatermark`. Results collected so far are dropped.
///
/// # Example
///
/// ```
/// use futures::{stream, StreamExt};
/// use hwp_core::{CancellationSignal, StreamItem};
/// use hwp_exec::map;
///
/// # #[tokio::main]
/// # async fn main() -> hwp_core::Result<()> {
/// let source = stream::iter(0..42).map(StreamItem::Value);
///
/// let doubled = map(
///     source,
///     |n: u64, _: CancellationSignal| async move { Ok::<_, std::io::Error>(n * 2) },
///     16,
/// )
/// .await?;
///
/// assert_eq!(doubled, (0..42).map(|n| n * 2).collect::<Vec<_>>());
/// # Ok(())
/// # }
/// ```
pub async fn map<S, T, R, F, Fut, E>(
    source: S,
    transform: F,
    options: impl Into<MapOptions>,
) -> Result<Vec<R>>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut results = Vec::new();
    let mut stream = map_iterator(source, transform, options);

    while let Some(item) = stream.next().await {
        match item {
            StreamItem::Value(value) => results.push(value),
            StreamItem::Error(error) => return Err(error),
        }
    }

    Ok(results)
}

/// Runs [`map_iterator`] to completion for its side effects, discarding the
/// results.
///
/// # Errors
///
/// Same as [`map`].
pub async fn for_each<S, T, R, F, Fut, E>(
    source: S,
    transform: F,
    options: impl Into<MapOptions>,
) -> Result<()>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut stream = map_iterator(source, transform, options);

    while let Some(item) = stream.next().await {
        if let StreamItem::Error(error) = item {
            return Err(error);
        }
    }

    Ok(())
}
