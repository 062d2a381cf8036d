// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The scan pipeline: detect, rectify, enhance, with every stage reported to
// the configured observer.

use flatscan_core::error::Result;
use flatscan_core::{Quadrilateral, ScanConfig, Stage};
use image::DynamicImage;
use tracing::{info, instrument};

use crate::geometry::order_points;
use crate::scan::detect::{DetectedDocument, DocumentDetector};
use crate::scan::enhance::{binarize, sharpen};
use crate::scan::observer::StageObserver;
use crate::scan::rectify::rectify;

/// Everything a full run produces. The captured photo is left untouched by
/// every stage, so callers can retry from it.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Page corners, ordered top-left, top-right, bottom-right, bottom-left.
    pub outline: Quadrilateral,
    pub rectified: DynamicImage,
    pub enhanced: DynamicImage,
}

/// Detector plus observer, built from [`ScanConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScanPipeline {
    detector: DocumentDetector,
    observer: StageObserver,
}

impl ScanPipeline {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            detector: DocumentDetector::new(config.detector.clone())?,
            observer: StageObserver::from_kind(&config.observer),
        })
    }

    pub fn detect(&self, raster: &DynamicImage) -> Result<DetectedDocument> {
        self.detector.detect_observed(raster, &self.observer)
    }

    pub fn rectify(&self, detected: &DetectedDocument) -> Result<DynamicImage> {
        let rectified = rectify(&detected.image, &detected.outline)?;
        self.observer.observe(Stage::Rectification, &rectified);
        Ok(rectified)
    }

    /// Detect and rectify in one go.
    #[instrument(skip_all)]
    pub fn flatten(&self, raster: &DynamicImage) -> Result<DynamicImage> {
        let detected = self.detect(raster)?;
        self.rectify(&detected)
    }

    /// Optional binarization, then sharpening.
    #[instrument(skip(self, rectified))]
    pub fn enhance(&self, rectified: &DynamicImage, binarize_first: bool) -> DynamicImage {
        let sharpened = if binarize_first {
            let binary = binarize(rectified);
            self.observer.observe(Stage::Binarization, &binary);
            sharpen(&binary)
        } else {
            sharpen(rectified)
        };
        self.observer.observe(Stage::Sharpening, &sharpened);
        sharpened
    }

    /// The whole pipeline from captured photo to enhanced page.
    #[instrument(skip(self, raster), fields(width = raster.width(), height = raster.height()))]
    pub fn process(&self, raster: &DynamicImage, binarize_first: bool) -> Result<ScanOutput> {
        let detected = self.detect(raster)?;
        let outline = order_points(detected.outline.corners)?;
        let rectified = self.rectify(&detected)?;
        let enhanced = self.enhance(&rectified, binarize_first);
        info!(
            width = enhanced.width(),
            height = enhanced.height(),
            "Scan processed"
        );
        Ok(ScanOutput {
            outline,
            rectified,
            enhanced,
        })
    }
}
