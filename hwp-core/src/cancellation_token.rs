// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cooperative cancellation.
//!
//! A [`CancellationToken`] is owned by whoever may request cancellation. Work
//! that should merely observe cancellation receives a [`CancellationSignal`],
//! a read-only view of the same state obtained with
//! [`CancellationToken::signal`].
//!
//! Cancellation is advisory: activating a token never interrupts anything, it
//! only flips the flag and wakes every task awaiting [`cancelled`](CancellationSignal::cancelled).

use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use std::sync::Arc;

/// Cloneable cancellation handle that can activate cancellation.
///
/// # Example
///
/// ```
/// use hwp_core::CancellationToken;
///
/// # async fn example() {
/// let token = CancellationToken::new();
/// let signal = token.signal();
///
/// tokio::spawn(async move {
///     signal.cancelled().await;
///     println!("Cancelled!");
/// });
///
/// assert!(token.cancel());
/// assert!(!token.cancel());
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

/// Read-only view of a [`CancellationToken`].
///
/// Handed to transforms so they can observe, but never trigger, cancellation.
#[derive(Clone, Debug)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
}

impl Inner {
    fn is_cancelled(&self) -> bool {
        // Acquire ordering to see all writes that happened before cancel()
        self.cancelled.load(Ordering::Acquire)
    }
}

impl CancellationToken {
    /// Create a new token. The token is initially not cancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Activate cancellation, waking all listeners.
    ///
    /// Returns `true` only for the call that performed the activation; every
    /// later call is a no-op returning `false`.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.inner.event.notify(usize::MAX);
        true
    }

    /// Check if the token has been cancelled (non-blocking).
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Wait asynchronously until the token is cancelled.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled::new(&self.inner)
    }

    /// Create a read-only view sharing this token's state.
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            inner: self.inner.clone(),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSignal {
    /// Check if cancellation has been requested (non-blocking).
    ///
    /// ```
    /// use hwp_core::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// let signal = token.signal();
    /// assert!(!signal.is_cancelled());
    ///
    /// token.cancel();
    /// assert!(signal.is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Wait asynchronously until cancellation is requested.
    ///
    /// If cancellation was already requested, this returns immediately.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled::new(&self.inner)
    }
}

/// Future returned by [`CancellationToken::cancelled`] and
/// [`CancellationSignal::cancelled`].
pub struct Cancelled<'a> {
    inner: &'a Inner,
    listener: Option<EventListener>,
}

impl<'a> Cancelled<'a> {
    fn new(inner: &'a Inner) -> Self {
        Self {
            inner,
            listener: None,
        }
    }
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        loop {
            if this.inner.is_cancelled() {
                return Poll::Ready(());
            }

            match this.listener.as_mut() {
                Some(listener) => {
                    if Pin::new(listener).poll(cx).is_pending() {
                        return Poll::Pending;
                    }
                    this.listener = None;
                }
                None => {
                    // Register, then re-check at the top of the loop: a cancel()
                    // landing between the first check and listen() is not lost
                    this.listener = Some(this.inner.event.listen());
                }
            }
        }
    }
}
