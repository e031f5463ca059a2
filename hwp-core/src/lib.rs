// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types shared by the high-watermark stream engine.
//!
//! - [`StreamItem`] carries values and errors in-band through a stream
//! - [`HwpError`] is the root error type
//! - [`CancellationToken`] / [`CancellationSignal`] model cooperative cancellation
//! - [`MapOptions`] configures the high watermark
//! - [`spawn_detached`] runs futures on the runtime selected by cargo features

#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-smol",
    feature = "runtime-async-std"
)))]
compile_error!(
    "hwp-core requires one runtime feature: `runtime-tokio`, `runtime-smol` or `runtime-async-std`"
);

pub mod cancellation_token;
pub mod hwp_error;
pub mod hwp_mutex;
pub mod hwp_task;
pub mod map_options;
pub mod stream_item;

pub use self::cancellation_token::{CancellationSignal, CancellationToken, Cancelled};
pub use self::hwp_error::{HwpError, Result};
pub use self::hwp_mutex::Mutex;
pub use self::hwp_task::spawn_detached;
pub use self::map_options::{MapOptions, DEFAULT_HIGH_WATERMARK};
pub use self::stream_item::StreamItem;
