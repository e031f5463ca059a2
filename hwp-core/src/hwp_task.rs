// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic task spawning.
//!
//! # Runtime Support
//!
//! - **Tokio**: `tokio::spawn` (default)
//! - **smol**: `smol::spawn`
//! - **async-std**: `async_std::task::spawn`
//!
//! Select the runtime via feature flags: `runtime-tokio`, `runtime-smol` or
//! `runtime-async-std`. When several are enabled, tokio wins over smol, which
//! wins over async-std.

use core::future::Future;

/// Spawn a future on the configured runtime without keeping a handle to it.
///
/// The future runs to completion independently of the caller. Spawned work
/// that must be stoppable should observe a
/// [`CancellationSignal`](crate::CancellationSignal).
///
/// # Example
///
/// ```rust
/// use hwp_core::spawn_detached;
/// use futures::channel::oneshot;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, rx) = oneshot::channel();
/// spawn_detached(async move {
///     let _ = tx.send(42);
/// });
/// assert_eq!(rx.await.unwrap(), 42);
/// # }
/// ```
pub fn spawn_detached<Fut>(future: Fut)
where
    Fut: Future<Output = ()> + Send + 'static,
{
    #[cfg(feature = "runtime-tokio")]
    {
        tokio::spawn(future);
    }

    #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
    smol::spawn(future).detach();

    #[cfg(all(
        feature = "runtime-async-std",
        not(feature = "runtime-tokio"),
        not(feature = "runtime-smol")
    ))]
    {
        async_std::task::spawn(future);
    }
}
