// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-run session state: where the flow is and what it has produced so far.

use std::path::{Path, PathBuf};

use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::flow::FlowState;
use image::DynamicImage;

/// Everything one scan session has captured and written.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: FlowState,
    /// Photo as acquired, kept for diagnostics.
    pub captured: Option<DynamicImage>,
    /// Page cut out of `captured` and flattened.
    pub rectified: Option<DynamicImage>,
    /// Enhanced scan, the input of OCR and export.
    pub final_image: Option<DynamicImage>,
    pub text: Option<String>,
    pub text_path: Option<PathBuf>,
    pub pdf_path: Option<PathBuf>,
    pub saved_image: Option<PathBuf>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: FlowState::Initial,
            captured: None,
            rectified: None,
            final_image: None,
            text: None,
            text_path: None,
            pdf_path: None,
            saved_image: None,
        }
    }
}

impl Session {
    /// The flattened page from the last successful capture.
    pub fn rectified(&self) -> Result<&DynamicImage> {
        self.rectified
            .as_ref()
            .ok_or_else(|| FlatscanError::Input("no document has been captured yet".into()))
    }

    pub fn final_image(&self) -> Result<&DynamicImage> {
        self.final_image
            .as_ref()
            .ok_or_else(|| FlatscanError::Input("no processed scan is available yet".into()))
    }

    /// Drop all results and go back to capturing.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// File offered for upload: the PDF if one was exported, else the saved image.
    pub fn upload_candidate(&self) -> Option<&Path> {
        self.pdf_path
            .as_deref()
            .or(self.saved_image.as_deref())
    }
}
