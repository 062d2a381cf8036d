// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for flatscan.

use thiserror::Error;

use crate::types::Stage;

/// Top-level error type for all flatscan operations.
#[derive(Debug, Error)]
pub enum FlatscanError {
    // -- Pipeline errors --
    #[error("could not read input image: {0}")]
    Input(String),

    #[error("no document found: {0}")]
    Detection(String),

    #[error("document outline is unusable: {0}")]
    Geometry(String),

    #[error("{stage} stage failed: {message}")]
    Processing { stage: Stage, message: String },

    // -- Collaborators --
    #[error("image capture failed: {0}")]
    Capture(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("upload failed: {0}")]
    Upload(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl FlatscanError {
    /// Shorthand for a [`FlatscanError::Processing`] tagged with its stage.
    pub fn processing(stage: Stage, message: impl Into<String>) -> Self {
        Self::Processing {
            stage,
            message: message.into(),
        }
    }

    /// Whether the caller can recover by asking for a new capture.
    ///
    /// Detection and geometry failures mean the frame did not contain a usable
    /// document outline; everything else is fatal to the current invocation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Detection(_) | Self::Geometry(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FlatscanError>;
