// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for high-watermark stream processing
//!
//! Every failure that can reach the consumer of a mapped stream is expressed as
//! a [`HwpError`]. Source failures travel in-band as
//! [`StreamItem::Error`](crate::StreamItem::Error); transform failures are
//! wrapped by the engine when the failing operation reaches the head of the
//! pending queue.
//!
//! # Examples
//!
//! ```
//! use hwp_core::{HwpError, Result};
//!
//! fn pull() -> Result<u32> {
//!     Err(HwpError::invalid_high_watermark(0))
//! }
//!
//! assert!(pull().is_err());
//! ```

use std::any::Any;

/// Root error type for all high-watermark operations
#[derive(Debug, thiserror::Error)]
pub enum HwpError {
    /// Failure while pulling the next item from the source
    #[error("Source error: {0}")]
    SourceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transform's future completed with an error
    #[error("Transform error: {0}")]
    TransformError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transform panicked, either while being invoked or while its future ran
    #[error("Transform panicked: {message}")]
    TransformPanicked {
        /// Panic payload rendered as text
        message: String,
    },

    /// A pending operation was torn down before it produced a result
    ///
    /// This happens when the runtime drops the operation's task, for example
    /// during runtime shutdown.
    #[error("Pending operation {index} was dropped before completing")]
    OperationAbandoned {
        /// Source position of the abandoned operation
        index: u64,
    },

    /// The configured high watermark is not a positive integer
    #[error("Invalid high watermark {value}: must be at least 1")]
    InvalidHighWatermark {
        /// The rejected value
        value: usize,
    },
}

impl HwpError {
    /// Wrap an error raised by a source
    pub fn source_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::SourceError(Box::new(error))
    }

    /// Wrap an error returned by a transform
    pub fn transform_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::TransformError(Box::new(error))
    }

    /// Build a `TransformPanicked` error from a panic payload
    pub fn transform_panicked(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());

        Self::TransformPanicked { message }
    }

    /// Create an error for an operation torn down before completing
    #[must_use]
    pub const fn operation_abandoned(index: u64) -> Self {
        Self::OperationAbandoned { index }
    }

    /// Create an error for a rejected high watermark
    #[must_use]
    pub const fn invalid_high_watermark(value: usize) -> Self {
        Self::InvalidHighWatermark { value }
    }

    /// Check if this error originated in a transform invocation
    #[must_use]
    pub const fn is_transform_failure(&self) -> bool {
        matches!(
            self,
            Self::TransformError(_) | Self::TransformPanicked { .. } | Self::OperationAbandoned { .. }
        )
    }
}

/// Specialized Result type for high-watermark operations
pub type Result<T> = std::result::Result<T, HwpError>;

impl Clone for HwpError {
    fn clone(&self) -> Self {
        match self {
            // Boxed errors can't be cloned, keep their rendered message
            Self::SourceError(e) => Self::SourceError(Box::new(Rendered(e.to_string()))),
            Self::TransformError(e) => Self::TransformError(Box::new(Rendered(e.to_string()))),
            Self::TransformPanicked { message } => Self::TransformPanicked {
                message: message.clone(),
            },
            Self::OperationAbandoned { index } => Self::OperationAbandoned { index: *index },
            Self::InvalidHighWatermark { value } => Self::InvalidHighWatermark { value: *value },
        }
    }
}

/// Stand-in for a boxed error that was cloned: keeps only its message.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Rendered(String);
