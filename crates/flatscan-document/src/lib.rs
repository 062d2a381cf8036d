// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan-document: turns a photo of a page into a flat, clean scan.
//
// Provides corner geometry, contour-based document detection, perspective
// rectification, Otsu binarization and sharpening, stage observers, raster
// I/O, PDF export, and optional OCR behind the `ocr` feature.

pub mod geometry;
pub mod pdf;
pub mod raster;
pub mod scan;

pub use pdf::writer::PdfExporter;
pub use scan::detect::{DetectedDocument, DocumentDetector};
pub use scan::observer::StageObserver;
pub use scan::pipeline::{ScanOutput, ScanPipeline};
pub use scan::text::TextExtractor;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
