// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Configuration of a high-watermark map.

use crate::cancellation_token::CancellationToken;
use crate::hwp_error::{HwpError, Result};
use core::num::NonZeroUsize;

/// Number of transform invocations allowed in flight when none is configured.
pub const DEFAULT_HIGH_WATERMARK: usize = 16;

/// Options accepted by every high-watermark operation.
///
/// A bare `usize` converts into options carrying that watermark, so
/// `map_iterator(source, f, 5)` and
/// `map_iterator(source, f, MapOptions::new(5))` are equivalent.
///
/// # Example
///
/// ```
/// use hwp_core::{CancellationToken, MapOptions, DEFAULT_HIGH_WATERMARK};
///
/// let options = MapOptions::default();
/// assert_eq!(options.high_watermark(), DEFAULT_HIGH_WATERMARK);
///
/// let shutdown = CancellationToken::new();
/// let options = MapOptions::new(4).with_cancellation(shutdown);
/// assert_eq!(options.high_watermark(), 4);
/// assert!(options.cancellation().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct MapOptions {
    high_watermark: usize,
    cancellation: Option<CancellationToken>,
}

impl MapOptions {
    /// Options with the given high watermark and no external cancellation.
    #[must_use]
    pub const fn new(high_watermark: usize) -> Self {
        Self {
            high_watermark,
            cancellation: None,
        }
    }

    /// Stop launching work once `token` is cancelled.
    ///
    /// The caller keeps ownership of the token; the engine only observes it.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Replace the high watermark.
    #[must_use]
    pub const fn with_high_watermark(mut self, high_watermark: usize) -> Self {
        self.high_watermark = high_watermark;
        self
    }

    /// The configured high watermark, possibly invalid.
    #[must_use]
    pub const fn high_watermark(&self) -> usize {
        self.high_watermark
    }

    /// The caller-owned cancellation token, if any.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Checks that the high watermark is a positive integer.
    ///
    /// # Errors
    /// Returns `HwpError::InvalidHighWatermark` if the watermark is zero.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.high_watermark)
            .ok_or(HwpError::invalid_high_watermark(self.high_watermark))
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_WATERMARK)
    }
}

impl From<usize> for MapOptions {
    fn from(high_watermark: usize) -> Self {
        Self::new(high_watermark)
    }
}
