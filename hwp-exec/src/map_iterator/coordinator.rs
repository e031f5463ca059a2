// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::pending_queue::{Deferred, PendingQueue};
use core::num::NonZeroUsize;
use event_listener::{Event, EventListener};
use hwp_core::{CancellationSignal, CancellationToken, HwpError, Mutex};

/// Where the first failure of an invocation came from. Never cleared or
/// replaced once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstFailure {
    /// The source failed; its error waits in `State::source_error`.
    Source,
    /// An operation failed; its error travels in its own queue slot.
    Transform,
}

#[derive(Debug)]
struct State<R> {
    queue: PendingQueue<R>,
    done: bool,
    first_failure: Option<FirstFailure>,
    /// Source failure not yet handed to the consumer.
    source_error: Option<HwpError>,
}

/// What the drain loop should do next.
pub(crate) enum DrainStep<R> {
    Yield(R),
    Fail(HwpError),
    Finished,
    /// Nothing to deliver yet. The listener was registered under the state
    /// lock, so any change made after the check wakes it.
    Wait(EventListener),
}

/// State shared by the launch loop, the drain loop and every pending operation
/// of one invocation.
///
/// Every mutation happens under `state`; the mutating side notifies after
/// releasing the lock. Waiters register their listener while still holding the
/// lock, so a notification can never fall between a check and a suspension.
#[derive(Debug)]
pub(crate) struct Coordinator<R> {
    state: Mutex<State<R>>,
    /// Drain loop -> launch loop: the queue shrank or the invocation stopped.
    launch_wake: Event,
    /// Launch loop / operations -> drain loop: the queue or `done` changed.
    drain_wake: Event,
    scope: CancellationToken,
    high_watermark: NonZeroUsize,
}

impl<R> Coordinator<R> {
    pub(crate) fn new(high_watermark: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(State {
                queue: PendingQueue::new(),
                done: false,
                first_failure: None,
                source_error: None,
            }),
            launch_wake: Event::new(),
            drain_wake: Event::new(),
            scope: CancellationToken::new(),
            high_watermark,
        }
    }

    pub(crate) fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    pub(crate) fn signal(&self) -> CancellationSignal {
        self.scope.signal()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state.lock().done
    }

    /// Appends a pending slot for a freshly invoked operation.
    pub(crate) fn enqueue(&self) -> u64 {
        let index = self.state.lock().queue.push();
        self.drain_wake.notify(usize::MAX);
        index
    }

    /// Stores the outcome of operation `index`.
    ///
    /// A failure stops the invocation: `done` is set, the first failure is
    /// latched and the cancellation scope is activated.
    pub(crate) fn settle(&self, index: u64, outcome: Deferred<R>) {
        let failed = outcome.is_failed();
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if failed {
                state.done = true;
                match state.first_failure {
                    None => {
                        debug!("operation {index} failed, no further items will be launched");
                        state.first_failure = Some(FirstFailure::Transform);
                    }
                    Some(first) => {
                        debug!("operation {index} failed after an earlier {first:?} failure");
                    }
                }
            }
            state.queue.settle(index, outcome);
        }

        if failed {
            self.scope.cancel();
            self.launch_wake.notify(usize::MAX);
        }
        self.drain_wake.notify(usize::MAX);
    }

    /// The source is exhausted.
    pub(crate) fn finish(&self) {
        self.state.lock().done = true;
        self.drain_wake.notify(usize::MAX);
    }

    /// The source failed while producing its next item.
    pub(crate) fn fail_source(&self, error: HwpError) {
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.done = true;
            match state.first_failure {
                None => {
                    state.first_failure = Some(FirstFailure::Source);
                    state.source_error = Some(error);
                }
                Some(first) => {
                    debug!("source error {error} dropped after an earlier {first:?} failure");
                }
            }
        }

        self.scope.cancel();
        self.drain_wake.notify(usize::MAX);
    }

    /// Stops launching without failing; queued results are still delivered.
    pub(crate) fn stop(&self) {
        self.state.lock().done = true;
        self.scope.cancel();
        self.launch_wake.notify(usize::MAX);
        self.drain_wake.notify(usize::MAX);
    }

    /// The consumer abandoned the sequence: stop everything and discard
    /// undelivered results.
    pub(crate) fn release(&self) {
        {
            let mut state = self.state.lock();
            state.done = true;
            state.queue.clear();
        }

        if self.scope.cancel() {
            debug!("consumer abandoned the sequence, cancellation scope activated");
        }
        self.launch_wake.notify(usize::MAX);
    }

    /// Suspends the launch loop while the queue holds `high_watermark`
    /// operations.
    ///
    /// Returns `false` once the invocation is done and no further item may be
    /// launched.
    pub(crate) async fn wait_for_capacity(&self) -> bool {
        loop {
            let listener = {
                let state = self.state.lock();
                if state.done {
                    return false;
                }
                if state.queue.len() < self.high_watermark.get() {
                    return true;
                }
                self.launch_wake.listen()
            };

            listener.await;
        }
    }

    /// One step of the drain loop.
    pub(crate) fn drain_step(&self) -> DrainStep<R> {
        let step = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            match state.queue.take_head() {
                Some(Deferred::Ready(value)) => DrainStep::Yield(value),
                Some(Deferred::Failed(error)) => DrainStep::Fail(error),
                Some(Deferred::Pending) => DrainStep::Wait(self.drain_wake.listen()),
                None if !state.done => DrainStep::Wait(self.drain_wake.listen()),
                None => match state.source_error.take() {
                    Some(error) => DrainStep::Fail(error),
                    None => DrainStep::Finished,
                },
            }
        };

        if matches!(step, DrainStep::Yield(_) | DrainStep::Fail(_)) {
            // The queue shrank, backpressure may lift
            self.launch_wake.notify(usize::MAX);
        }
        step
    }
}
