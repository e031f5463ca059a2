// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::map_iterator::{map_iterator, MapIterator};
use core::future::Future;
use futures::Stream;
use hwp_core::{CancellationSignal, MapOptions, StreamItem};

/// Binds `transform` and `options` into a reusable stage that maps any source
/// of the matching item type.
///
/// Every call of the returned function starts an independent invocation with
/// its own queue and cancellation scope. A caller-owned cancellation token in
/// `options` is shared by all of them.
///
/// # Example
///
/// ```
/// use futures::{stream, StreamExt};
/// use hwp_core::{CancellationSignal, StreamItem};
/// use hwp_exec::mapper;
///
/// # #[tokio::main]
/// # async fn main() {
/// let square = mapper(
///     |n: i32, _: CancellationSignal| async move { Ok::<_, std::io::Error>(n * n) },
///     4,
/// );
///
/// let first: Vec<_> = square(stream::iter(vec![StreamItem::Value(2), StreamItem::Value(3)]))
///     .collect()
///     .await;
/// let second: Vec<_> = square(stream::iter(vec![StreamItem::Value(4)])).collect().await;
///
/// assert_eq!(first, vec![StreamItem::Value(4), StreamItem::Value(9)]);
/// assert_eq!(second, vec![StreamItem::Value(16)]);
/// # }
/// ```
pub fn mapper<S, T, R, F, Fut, E>(
    transform: F,
    options: impl Into<MapOptions>,
) -> impl Fn(S) -> MapIterator<R> + Clone
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationSignal) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let options = options.into();
    move |source| map_iterator(source, transform.clone(), options.clone())
}
