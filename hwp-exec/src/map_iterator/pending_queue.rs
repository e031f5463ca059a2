// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hwp_core::HwpError;
use std::collections::VecDeque;

/// Result slot of one transform invocation.
#[derive(Debug)]
pub(crate) enum Deferred<R> {
    Pending,
    Ready(R),
    Failed(HwpError),
}

impl<R> Deferred<R> {
    pub(crate) const fn is_failed(&self) -> bool {
        matches!(self, Deferred::Failed(_))
    }
}

#[derive(Debug)]
struct PendingOperation<R> {
    index: u64,
    result: Deferred<R>,
}

/// FIFO of launched operations in source order.
///
/// Operations are addressed by their source index, so a late settlement can
/// find its slot no matter how many operations were drained before it.
#[derive(Debug)]
pub(crate) struct PendingQueue<R> {
    operations: VecDeque<PendingOperation<R>>,
    next_index: u64,
}

impl<R> PendingQueue<R> {
    pub(crate) fn new() -> Self {
        Self {
            operations: VecDeque::new(),
            next_index: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.operations.len()
    }

    /// Appends a pending slot and returns its source index.
    pub(crate) fn push(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        self.operations.push_back(PendingOperation {
            index,
            result: Deferred::Pending,
        });
        index
    }

    /// Stores the outcome of operation `index`.
    ///
    /// Returns `false` when the slot is gone, i.e. the queue was cleared.
    pub(crate) fn settle(&mut self, index: u64, outcome: Deferred<R>) -> bool {
        let Some(head_index) = self.operations.front().map(|op| op.index) else {
            return false;
        };

        let slot = index
            .checked_sub(head_index)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|offset| self.operations.get_mut(offset));

        match slot {
            Some(operation) => {
                operation.result = outcome;
                true
            }
            None => false,
        }
    }

    /// Removes the head if it has settled.
    ///
    /// - `None`: the queue is empty
    /// - `Some(Deferred::Pending)`: the head is still in flight and stays queued
    /// - `Some(Deferred::Ready | Deferred::Failed)`: the head, now removed
    pub(crate) fn take_head(&mut self) -> Option<Deferred<R>> {
        let head = self.operations.front_mut()?;

        match core::mem::replace(&mut head.result, Deferred::Pending) {
            Deferred::Pending => Some(Deferred::Pending),
            settled => {
                self.operations.pop_front();
                Some(settled)
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.operations.clear();
    }
}
