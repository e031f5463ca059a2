// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

/// Error returned by test transforms and sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestError {
    #[error("transform failed for item {0}")]
    Transform(u64),

    #[error("source failed: {0}")]
    Source(String),
}

impl TestError {
    pub fn source_failure(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}
