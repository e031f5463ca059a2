// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::coordinator::Coordinator;
use super::pending_queue::Deferred;
use core::future::Future;
use core::pin::pin;
use futures::future::{select, Either};
use futures::{FutureExt, Stream, StreamExt};
use hwp_core::{spawn_detached, CancellationSignal, CancellationToken, HwpError, StreamItem};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum StopReason {
    SourceExhausted,
    SourceFailed,
    Done,
    CancellationRequested,
}

/// Pulls the source one item at a time and launches one operation per item,
/// suspending while `high_watermark` operations are queued.
pub(crate) async fn launch_loop<S, T, R, F, Fut, E>(
    source: S,
    transform: F,
    coordinator: Arc<Coordinator<R>>,
    external: Option<CancellationToken>,
) where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationSignal) -> Fut + Send + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    debug!("launch loop started");
    let mut source = pin!(source);
    let mut stop = pin!(stop_requested(coordinator.scope(), external.as_ref()));

    let reason = loop {
        if let Some(reason) = stop_reason(&coordinator, external.as_ref()) {
            break reason;
        }

        let next = match select(source.next(), stop.as_mut()).await {
            Either::Left((next, _)) => next,
            Either::Right(((), _)) => break StopReason::CancellationRequested,
        };

        match next {
            Some(StreamItem::Value(item)) => {
                if let Some(reason) = stop_reason(&coordinator, external.as_ref()) {
                    break reason;
                }

                launch(&coordinator, &transform, item);

                match select(pin!(coordinator.wait_for_capacity()), stop.as_mut()).await {
                    Either::Left((true, _)) => {}
                    Either::Left((false, _)) => break StopReason::Done,
                    Either::Right(((), _)) => break StopReason::CancellationRequested,
                }
            }
            Some(StreamItem::Error(error)) => {
                debug!("source failed: {error}");
                coordinator.fail_source(error);
                break StopReason::SourceFailed;
            }
            None => {
                coordinator.finish();
                break StopReason::SourceExhausted;
            }
        }
    };

    if matches!(reason, StopReason::CancellationRequested) {
        coordinator.stop();
    }
    debug!("launch loop stopped: {reason:?}");
}

fn stop_reason<R>(
    coordinator: &Coordinator<R>,
    external: Option<&CancellationToken>,
) -> Option<StopReason> {
    if coordinator.is_done() {
        Some(StopReason::Done)
    } else if external.is_some_and(CancellationToken::is_cancelled) {
        Some(StopReason::CancellationRequested)
    } else {
        None
    }
}

/// Resolves once the invocation scope or the caller's token is cancelled.
async fn stop_requested(scope: &CancellationToken, external: Option<&CancellationToken>) {
    match external {
        Some(external) => {
            select(scope.cancelled(), external.cancelled()).await;
        }
        None => scope.cancelled().await,
    }
}

/// Invokes the transform for `item` and queues the resulting operation.
///
/// A panic raised by the call itself becomes an already-failed operation, so
/// it is reported in source order like any other failure.
fn launch<T, R, F, Fut, E>(coordinator: &Arc<Coordinator<R>>, transform: &F, item: T)
where
    R: Send + 'static,
    F: Fn(T, CancellationSignal) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let signal = coordinator.signal();
    let invocation = catch_unwind(AssertUnwindSafe(|| transform(item, signal)));
    let index = coordinator.enqueue();

    match invocation {
        Ok(operation) => spawn_detached(run_operation(coordinator.clone(), index, operation)),
        Err(payload) => {
            let error = HwpError::transform_panicked(payload.as_ref());
            warn!("transform panicked while invoked for item {index}: {error}");
            coordinator.settle(index, Deferred::Failed(error));
        }
    }
}

async fn run_operation<R, Fut, E>(coordinator: Arc<Coordinator<R>>, index: u64, operation: Fut)
where
    Fut: Future<Output = Result<R, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let settlement = Settlement {
        coordinator,
        index,
        settled: false,
    };

    let outcome = match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(Ok(value)) => Deferred::Ready(value),
        Ok(Err(error)) => Deferred::Failed(HwpError::transform_error(error)),
        Err(payload) => {
            let error = HwpError::transform_panicked(payload.as_ref());
            warn!("transform panicked for item {index}: {error}");
            Deferred::Failed(error)
        }
    };

    settlement.settle(outcome);
}

/// Guarantees that an operation's slot is settled even when its task is
/// dropped by the runtime before completing.
struct Settlement<R> {
    coordinator: Arc<Coordinator<R>>,
    index: u64,
    settled: bool,
}

impl<R> Settlement<R> {
    fn settle(mut self, outcome: Deferred<R>) {
        self.settled = true;
        self.coordinator.settle(self.index, outcome);
    }
}

impl<R> Drop for Settlement<R> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(
                self.index,
                Deferred::Failed(HwpError::operation_abandoned(self.index)),
            );
        }
    }
}
