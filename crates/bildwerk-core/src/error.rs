// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Filter errors --
    #[error("invalid kernel of {len} weights: {reason}")]
    InvalidKernel { len: usize, reason: String },

    #[error("raster dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    // -- Codec errors --
    #[error("image processing failed: {0}")]
    Image(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
