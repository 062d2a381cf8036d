// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: document detection, perspective rectification,
// binarization and sharpening, stage observers, and text extraction.

pub mod detect;
pub mod enhance;
pub mod observer;
pub mod pipeline;
pub mod rectify;
pub mod text;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use detect::{DetectedDocument, DocumentDetector};
pub use observer::StageObserver;
pub use pipeline::{ScanOutput, ScanPipeline};
pub use text::TextExtractor;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
