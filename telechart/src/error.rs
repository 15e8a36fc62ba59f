// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for snapshot parsing, validation and configuration.
//!
//! Rendering itself never fails: empty input renders nothing and malformed samples are drawn
//! as gaps. These errors surface only from the explicit parsing/validation entry points.

use thiserror::Error;

/// Errors reported by telechart's parsing and validation entry points.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A timestamp string could not be parsed as an ISO-8601 instant.
    #[error("invalid timestamp at index {index}: {value:?}")]
    InvalidTimestamp {
        /// Position in the timestamp axis.
        index: usize,
        /// The offending input.
        value: String,
    },

    /// A series does not have one value per timestamp.
    #[error("series {series:?} has {found} values, expected {expected}")]
    LengthMismatch {
        /// Identifier of the offending series.
        series: String,
        /// Number of timestamps in the snapshot.
        expected: usize,
        /// Number of values in the series.
        found: usize,
    },

    /// A response payload is missing an expected field.
    #[error("missing field {0:?} in response")]
    MissingField(&'static str),

    /// Chart configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ChartError`].
pub type Result<T> = core::result::Result<T, ChartError>;
