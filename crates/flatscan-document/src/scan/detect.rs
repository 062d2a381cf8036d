// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document detection: find the page outline in a photo.
//
// The photo is reduced to a binary edge map (gamma, fixed threshold,
// morphological closing, Canny), every contour is traced, and the largest
// contour that simplifies to four vertices wins.

use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::{DetectorConfig, Point, Quadrilateral, Stage};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::{dilate, erode};
use tracing::{debug, info, instrument, warn};

use crate::geometry::{approximate_polygon, arc_length, convex_hull, polygon_area};
use crate::scan::observer::StageObserver;

/// A page outline found in a photo.
#[derive(Debug, Clone)]
pub struct DetectedDocument {
    /// The photo the outline was found in, unmodified.
    pub image: DynamicImage,
    /// Convex hull of the winning approximation; corners are not yet ordered.
    pub outline: Quadrilateral,
    /// Enclosed area of the winning contour.
    pub contour_area: f64,
}

/// Contour counts from one search, logged after detection.
#[derive(Debug, Clone, Copy)]
struct DetectionSummary {
    contours: usize,
    large_contours: usize,
    quadrilaterals: usize,
    best_area: Option<f64>,
}

/// Finds the page outline using the tuning in [`DetectorConfig`].
#[derive(Debug, Clone, Default)]
pub struct DocumentDetector {
    config: DetectorConfig,
}

impl DocumentDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Locate the document outline.
    pub fn detect(&self, raster: &DynamicImage) -> Result<DetectedDocument> {
        self.detect_observed(raster, &StageObserver::NoObserver)
    }

    /// Locate the document outline, reporting each intermediate to `observer`.
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    pub fn detect_observed(
        &self,
        raster: &DynamicImage,
        observer: &StageObserver,
    ) -> Result<DetectedDocument> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(FlatscanError::Input("image has no pixels".into()));
        }

        let edges = self.edge_map(raster, observer);
        let (best, summary) = self.best_quadrilateral(&edges);
        debug!(
            contours = summary.contours,
            large_contours = summary.large_contours,
            quadrilaterals = summary.quadrilaterals,
            best_area = summary.best_area,
            "Contour search complete"
        );

        let Some((approx, contour_area)) = best else {
            warn!(
                contours = summary.contours,
                min_area = self.config.min_contour_area,
                "No four-sided contour found"
            );
            return Err(FlatscanError::Detection(format!(
                "none of {} contours ({} above the area floor) simplify to four vertices",
                summary.contours, summary.large_contours
            )));
        };

        let hull = convex_hull(&approx);
        if hull.len() < 4 {
            warn!(hull_len = hull.len(), "Winning contour hull is degenerate");
            return Err(FlatscanError::Detection(format!(
                "document outline collapses to {} hull vertices",
                hull.len()
            )));
        }
        // Douglas-Peucker already yielded exactly 4 vertices, so the hull has at most 4.
        let corners = [hull[0], hull[1], hull[2], hull[3]];
        observer.observe_outline(raster, &corners);

        info!(contour_area, ?corners, "Document detected");
        Ok(DetectedDocument {
            image: raster.clone(),
            outline: Quadrilateral::new(corners),
            contour_area,
        })
    }

    /// Grayscale, gamma, threshold, closing and Canny, in that order.
    pub fn edge_map(&self, raster: &DynamicImage, observer: &StageObserver) -> GrayImage {
        let gray = raster.to_luma8();
        observer.observe_gray(Stage::Grayscale, &gray);

        let lut = gamma_lut(self.config.gamma);
        let corrected = apply_lut(&gray, &lut);
        observer.observe_gray(Stage::Gamma, &corrected);

        let binary = threshold(&corrected, self.config.threshold);
        observer.observe_gray(Stage::Threshold, &binary);

        let closed = close(&binary, self.config.closing_radius);
        observer.observe_gray(Stage::Closing, &closed);

        let edges = canny(&closed, self.config.canny_low, self.config.canny_high);
        observer.observe_gray(Stage::Edges, &edges);
        edges
    }

    /// Largest-area contour whose approximation has four vertices.
    fn best_quadrilateral(&self, edges: &GrayImage) -> (Option<(Vec<Point>, f64)>, DetectionSummary) {
        let contours = find_contours::<i32>(edges);
        let mut summary = DetectionSummary {
            contours: contours.len(),
            large_contours: 0,
            quadrilaterals: 0,
            best_area: None,
        };

        let mut best: Option<(Vec<Point>, f64)> = None;
        for contour in &contours {
            let points: Vec<Point> = contour
                .points
                .iter()
                .map(|p| Point::new(p.x as f32, p.y as f32))
                .collect();
            let area = polygon_area(&points);
            if area <= self.config.min_contour_area {
                continue;
            }
            summary.large_contours += 1;

            let epsilon = self.config.approx_epsilon_ratio * arc_length(&points);
            let approx = approximate_polygon(&points, epsilon);
            if approx.len() != 4 {
                continue;
            }
            summary.quadrilaterals += 1;

            if best.as_ref().is_none_or(|(_, best_area)| area > *best_area) {
                best = Some((approx, area));
            }
        }

        summary.best_area = best.as_ref().map(|(_, area)| *area);
        (best, summary)
    }
}

// -- Edge map stages ---------------------------------------------------------

/// 256-entry table mapping `i` to `round(255 * (i / 255)^(1 / gamma))`.
pub fn gamma_lut(gamma: f32) -> [u8; 256] {
    let inv_gamma = 1.0 / gamma as f64;
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let v = 255.0 * (i as f64 / 255.0).powf(inv_gamma);
        *entry = v.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

pub fn apply_lut(gray: &GrayImage, lut: &[u8; 256]) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    out
}

/// Values at or above `cutoff` become 255, the rest 0.
pub fn threshold(gray: &GrayImage, cutoff: u8) -> GrayImage {
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (src, dst) in gray.pixels().zip(out.pixels_mut()) {
        *dst = Luma([if src.0[0] >= cutoff { 255 } else { 0 }]);
    }
    out
}

/// Dilate then erode with a `(2r + 1)` square element.
pub fn close(binary: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return binary.clone();
    }
    let dilated = dilate(binary, Norm::LInf, radius);
    erode(&dilated, Norm::LInf, radius)
}
