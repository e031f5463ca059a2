// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::map::{for_each, map};
use crate::map_iterator::{map_iterator, MapIterator};
use async_trait::async_trait;
use core::future::Future;
use futures::Stream;
use hwp_core::{CancellationSignal, MapOptions, Result, StreamItem};

/// Extension trait exposing the high-watermark operations as stream methods.
///
/// # Example
///
/// ```
/// use futures::{stream, StreamExt};
/// use hwp_core::{CancellationSignal, StreamItem};
/// use hwp_exec::HighWatermarkExt;
///
/// # #[tokio::main]
/// # async fn main() -> hwp_core::Result<()> {
/// let lengths = stream::iter(vec!["a", "bb", "ccc"])
///     .map(StreamItem::Value)
///     .collect_with_watermark(
///         |word: &'static str, _: CancellationSignal| async move {
///             Ok::<_, std::io::Error>(word.len())
///         },
///         2,
///     )
///     .await?;
///
/// assert_eq!(lengths, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait HighWatermarkExt<T>: Stream<Item = StreamItem<T>> + Sized + Send + 'static
where
    T: Send + 'static,
{
    /// Maps the stream with at most `options` transforms outstanding,
    /// preserving order. See [`map_iterator`].
    fn map_with_watermark<R, F, Fut, E>(
        self,
        transform: F,
        options: impl Into<MapOptions>,
    ) -> MapIterator<R>
    where
        R: Send + 'static,
        F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static;

    /// Maps the stream and collects the results. See [`map`].
    ///
    /// # Errors
    ///
    /// Returns the first error of the mapped sequence.
    async fn collect_with_watermark<R, F, Fut, E, O>(
        self,
        transform: F,
        options: O,
    ) -> Result<Vec<R>>
    where
        R: Send + 'static,
        F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
        O: Into<MapOptions> + Send + 'static;

    /// Maps the stream for side effects only. See [`for_each`].
    ///
    /// # Errors
    ///
    /// Returns the first error of the mapped sequence.
    async fn for_each_with_watermark<R, F, Fut, E, O>(
        self,
        transform: F,
        options: O,
    ) -> Result<()>
    where
        R: Send + 'static,
        F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
        O: Into<MapOptions> + Send + 'static;
}

#[async_trait]
impl<S, T> HighWatermarkExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    fn map_with_watermark<R, F, Fut, E>(
        self,
        transform: F,
        options: impl Into<MapOptions>,
    ) -> MapIterator<R>
    where
        R: Send + 'static,
        F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        map_iterator(self, transform, options)
    }

    async fn collect_with_watermark<R, F, Fut, E, O>(
        self,
        transform: F,
        options: O,
    ) -> Result<Vec<R>>
    where
        R: Send + 'static,
        F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
        O: Into<MapOptions> + Send + 'static,
    {
        map(self, transform, options).await
    }

    async fn for_each_with_watermark<R, F, Fut, E, O>(
        self,
        transform: F,
        options: O,
    ) -> Result<()>
    where
        R: Send + 'static,
        F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
        Fut: Future<Output = core::result::Result<R, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
        O: Into<MapOptions> + Send + 'static,
    {
        for_each(self, transform, options).await
    }
}
