// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the OCR simulator.
//
// Errors fall into four classes that drive propagation: configuration errors
// are fatal at construction, resource-load errors are recovered with a
// fallback, item errors are isolated to one batch item, and I/O errors on the
// output location are surfaced immediately.

use thiserror::Error;

/// Top-level error type for all simulator operations.
#[derive(Debug, Error)]
pub enum SimError {
    // -- Configuration errors --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown degradation condition: {0}")]
    UnknownCondition(String),

    // -- Resource errors --
    #[error("font could not be loaded: {0}")]
    FontLoad(String),

    // -- Per-item errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Tabular / filesystem input --
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("invalid file pattern: {0}")]
    Pattern(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SimError>;

/// How an error propagates through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected when the simulator is built; reported to the caller.
    Configuration,
    /// A missing or corrupt resource that has a built-in fallback.
    ResourceLoad,
    /// Failure confined to a single text item; the batch continues.
    ItemProcessing,
    /// The output location is unusable; every later item would fail too.
    Io,
}

impl SimError {
    /// Classify this error for batch propagation decisions.
    pub fn class(&self) -> ErrorClass {
        match self {
            SimError::Config(_) | SimError::UnknownCondition(_) | SimError::Pattern(_) => {
                ErrorClass::Configuration
            }
            SimError::FontLoad(_) => ErrorClass::ResourceLoad,
            SimError::ImageError(_)
            | SimError::OcrError(_)
            | SimError::Csv(_)
            | SimError::Serialization(_) => ErrorClass::ItemProcessing,
            SimError::Io(_) => ErrorClass::Io,
        }
    }

    /// Whether a batch should keep going after this error.
    pub fn is_item_local(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::ItemProcessing | ErrorClass::ResourceLoad
        )
    }
}
