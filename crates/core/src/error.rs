// Copyright 2025 QueryBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by the core model.

use thiserror::Error;

/// Errors produced while building the benchmark model from configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// A driver identifier did not match any registered backend.
    ///
    /// This is a configuration error: it aborts the invocation before any
    /// connection is attempted.
    #[error("unknown driver identifier: {0}")]
    UnknownDriver(String),

    /// Input that cannot produce a meaningful benchmark (e.g. zero runs).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Convenience constructor for [`Error::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
