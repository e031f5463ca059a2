// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Counters for observing how many transform invocations overlap.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    started: AtomicUsize,
    finished: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Shared counters recording transform starts and completions.
///
/// Clones observe the same counters, so a probe can be moved into a transform
/// closure while the test keeps a handle for its assertions.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    counters: Arc<Counters>,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a started invocation and returns how many started before it.
    pub fn start(&self) -> usize {
        let in_flight = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters
            .max_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);
        self.counters.started.fetch_add(1, Ordering::SeqCst)
    }

    /// Records a finished invocation.
    pub fn finish(&self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.counters.finished.fetch_add(1, Ordering::SeqCst);
    }

    pub fn started(&self) -> usize {
        self.counters.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.counters.finished.load(Ordering::SeqCst)
    }

    /// Largest `started - finished` observed so far.
    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::SeqCst)
    }
}
