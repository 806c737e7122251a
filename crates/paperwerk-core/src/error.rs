// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Paperwerk.

use thiserror::Error;

/// Top-level error type for all Paperwerk operations.
///
/// The first four variants are validation errors: the request itself was out
/// of contract and no core state was touched. The remainder are data or host
/// failures. `human_errors::humanize` keeps the two groups distinct so a
/// caller can tell whether retrying with different input makes sense.
#[derive(Debug, Error)]
pub enum PaperwerkError {
    // -- Validation errors --
    #[error("expected {expected} input, got {got}")]
    InvalidInputType { expected: &'static str, got: String },

    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("page range {from}-{to} invalid for {page_count} page document")]
    InvalidRange { from: u32, to: u32, page_count: u32 },

    #[error("invalid content dimensions {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    // -- Data errors --
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    // -- Host / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("worker task failed: {0}")]
    Worker(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PaperwerkError>;
