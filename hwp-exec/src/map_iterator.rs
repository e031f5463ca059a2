// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Ordered, bounded-concurrency map over an async stream.
//!
//! [`map_iterator`] pulls a source one item at a time, starts one transform
//! per item and keeps at most `high_watermark` of them outstanding. Results
//! are yielded in source order no matter in which order the transforms
//! complete.
//!
//! # Behavior
//!
//! - Nothing happens until the returned stream is polled for the first time
//! - While `high_watermark` operations are queued, the source is not pulled
//! - The first failure (source error, transform error or transform panic)
//!   stops launching, activates the cancellation signal handed to every
//!   transform and is yielded once, after every result queued ahead of it
//! - Dropping or [closing](MapIterator::close) the stream activates the
//!   cancellation signal and discards undelivered results
//!
//! # Example
//!
//! ```
//! use futures::{stream, StreamExt};
//! use hwp_core::{CancellationSignal, StreamItem};
//! use hwp_exec::map_iterator;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter(1..=5).map(StreamItem::Value);
//!
//! let doubled: Vec<_> = map_iterator(
//!     source,
//!     |n: u32, _signal: CancellationSignal| async move { Ok::<_, std::io::Error>(n * 2) },
//!     2,
//! )
//! .filter_map(|item| async move { item.ok() })
//! .collect()
//! .await;
//!
//! assert_eq!(doubled, vec![2, 4, 6, 8, 10]);
//! # }
//! ```

mod coordinator;
mod launch_loop;
mod pending_queue;

use self::coordinator::{Coordinator, DrainStep};
use self::launch_loop::launch_loop;
use core::fmt;
use core::future::Future;
use core::num::NonZeroUsize;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use event_listener::EventListener;
use futures::future::BoxFuture;
use futures::stream::FusedStream;
use futures::{FutureExt, Stream};
use hwp_core::{spawn_detached, CancellationSignal, HwpError, MapOptions, StreamItem};
use std::sync::Arc;

/// Lifecycle of one [`MapIterator`].
///
/// `Done`, `Failed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The source is still being pulled.
    Running,
    /// No further operation will be launched; queued results are being
    /// delivered.
    Draining,
    /// Every result was delivered.
    Done,
    /// An error was delivered.
    Failed,
    /// The consumer stopped early.
    Cancelled,
}

/// Stream of transformed items in source order, produced by [`map_iterator`].
///
/// Single pass: once it has ended it keeps returning `None`.
pub struct MapIterator<R> {
    coordinator: Arc<Coordinator<R>>,
    launch: Option<BoxFuture<'static, ()>>,
    listener: Option<EventListener>,
    terminal: Option<Phase>,
    rejected: Option<HwpError>,
}

/// Maps `source` through `transform` with at most `options.high_watermark()`
/// transforms outstanding, yielding results in source order.
///
/// `transform` receives each item together with the invocation's
/// [`CancellationSignal`]. It is called on the runtime task that drives the
/// source, so it should only build the future and leave the work to it.
///
/// When every transform fails, exactly `high_watermark` of them are started
/// only if the failures land after the window has filled. A failure that
/// settles earlier (possible on a multi-threaded runtime) stops launching
/// right away, so fewer transforms are started.
///
/// A watermark of zero is rejected: the stream yields a single
/// [`HwpError::InvalidHighWatermark`] and never touches the source.
///
/// See the [module-level documentation](mod@crate::map_iterator) for the error and
/// cancellation behavior.
pub fn map_iterator<S, T, R, F, Fut, E>(
    source: S,
    transform: F,
    options: impl Into<MapOptions>,
) -> MapIterator<R>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let options = options.into();

    match options.validate() {
        Ok(high_watermark) => {
            let coordinator = Arc::new(Coordinator::new(high_watermark));
            let launch = launch_loop(
                source,
                transform,
                coordinator.clone(),
                options.cancellation().cloned(),
            )
            .boxed();

            MapIterator {
                coordinator,
                launch: Some(launch),
                listener: None,
                terminal: None,
                rejected: None,
            }
        }
        Err(error) => {
            warn!("map_iterator rejected its options: {error}");
            MapIterator {
                coordinator: Arc::new(Coordinator::new(NonZeroUsize::MIN)),
                launch: None,
                listener: None,
                terminal: None,
                rejected: Some(error),
            }
        }
    }
}

impl<R> MapIterator<R> {
    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match self.terminal {
            Some(phase) => phase,
            None if self.rejected.is_none() && self.coordinator.is_done() => Phase::Draining,
            None => Phase::Running,
        }
    }

    /// Stops consuming early.
    ///
    /// Activates the cancellation signal seen by outstanding transforms,
    /// stops launching and discards results not yet delivered. Subsequent
    /// polls return `None`. Has no effect once the stream has ended.
    pub fn close(&mut self) {
        if self.terminal.is_some() {
            return;
        }

        self.coordinator.release();
        self.launch = None;
        self.listener = None;
        self.rejected = None;
        self.terminal = Some(Phase::Cancelled);
    }

    fn fail(&mut self, error: HwpError) -> Poll<Option<StreamItem<R>>> {
        self.coordinator.release();
        self.listener = None;
        self.terminal = Some(Phase::Failed);
        Poll::Ready(Some(StreamItem::Error(error)))
    }
}

impl<R> Stream for MapIterator<R> {
    type Item = StreamItem<R>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.terminal.is_some() {
            return Poll::Ready(None);
        }
        if let Some(error) = this.rejected.take() {
            return this.fail(error);
        }
        if let Some(launch) = this.launch.take() {
            spawn_detached(launch);
        }

        loop {
            if let Some(listener) = this.listener.as_mut() {
                ready!(Pin::new(listener).poll(cx));
                this.listener = None;
            }

            match this.coordinator.drain_step() {
                DrainStep::Yield(value) => return Poll::Ready(Some(StreamItem::Value(value))),
                DrainStep::Fail(error) => return this.fail(error),
                DrainStep::Finished => {
                    this.terminal = Some(Phase::Done);
                    return Poll::Ready(None);
                }
                DrainStep::Wait(listener) => this.listener = Some(listener),
            }
        }
    }
}

impl<R> FusedStream for MapIterator<R> {
    fn is_terminated(&self) -> bool {
        self.terminal.is_some()
    }
}

impl<R> Drop for MapIterator<R> {
    fn drop(&mut self) {
        if self.terminal.is_none() {
            self.coordinator.release();
        }
    }
}

impl<R> fmt::Debug for MapIterator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapIterator")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
