// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stage observers: hooks the pipeline calls with each intermediate raster.

use std::path::{Path, PathBuf};

use flatscan_core::{ObserverKind, Point, Stage};
use image::{DynamicImage, GrayImage, Rgb};
use imageproc::drawing::draw_line_segment_mut;
use tracing::{debug, info, warn};

use crate::raster;

/// Colour of the outline drawn on the detection preview.
const OUTLINE_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);

/// Receives intermediate results from the scan pipeline.
///
/// Observers never fail the pipeline: a preview that cannot be written is
/// logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StageObserver {
    #[default]
    NoObserver,
    /// Log stage name and raster dimensions.
    LoggingObserver,
    /// Write `NN-stage.png` files into `dir`.
    PreviewObserver { dir: PathBuf },
}

impl StageObserver {
    pub fn from_kind(kind: &ObserverKind) -> Self {
        match kind {
            ObserverKind::None => Self::NoObserver,
            ObserverKind::Logging => Self::LoggingObserver,
            ObserverKind::Preview { dir } => Self::PreviewObserver { dir: dir.clone() },
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::NoObserver)
    }

    /// Report the output of `stage`.
    pub fn observe(&self, stage: Stage, output: &DynamicImage) {
        match self {
            Self::NoObserver => {}
            Self::LoggingObserver => {
                info!(
                    stage = stage.name(),
                    width = output.width(),
                    height = output.height(),
                    "Stage complete"
                );
            }
            Self::PreviewObserver { dir } => write_preview(dir, stage, output),
        }
    }

    /// Report a grayscale intermediate. Skips the copy when nobody listens.
    pub fn observe_gray(&self, stage: Stage, output: &GrayImage) {
        if self.is_active() {
            self.observe(stage, &DynamicImage::ImageLuma8(output.clone()));
        }
    }

    /// Report the detected outline, drawn over a copy of the source raster.
    pub fn observe_outline(&self, source: &DynamicImage, outline: &[Point]) {
        if !self.is_active() {
            return;
        }
        let overlay = draw_outline(source, outline);
        self.observe(Stage::Detection, &DynamicImage::ImageRgb8(overlay));
    }
}

/// File name used for a stage preview, e.g. `05-edges.png`.
pub fn preview_file_name(stage: Stage) -> String {
    format!("{:02}-{}.png", stage.ordinal(), stage.name())
}

fn write_preview(dir: &Path, stage: Stage, output: &DynamicImage) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), %err, "Cannot create preview directory");
        return;
    }
    let path = dir.join(preview_file_name(stage));
    match raster::save_png(output, &path) {
        Ok(()) => debug!(path = %path.display(), "Preview written"),
        Err(err) => warn!(stage = stage.name(), %err, "Preview not written"),
    }
}

/// Closed polygon, three pixels wide, in green.
fn draw_outline(source: &DynamicImage, outline: &[Point]) -> image::RgbImage {
    let mut canvas = source.to_rgb8();
    let n = outline.len();
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        for dx in -1..=1 {
            for dy in -1..=1 {
                let (ox, oy) = (dx as f32, dy as f32);
                draw_line_segment_mut(
                    &mut canvas,
                    (a.x + ox, a.y + oy),
                    (b.x + ox, b.y + oy),
                    OUTLINE_COLOUR,
                );
            }
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn preview_names_are_ordered() {
        assert_eq!(preview_file_name(Stage::Grayscale), "01-grayscale.png");
        assert_eq!(preview_file_name(Stage::Sharpening), "09-sharpening.png");
    }

    #[test]
    fn preview_observer_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let observer = StageObserver::PreviewObserver {
            dir: dir.path().join("previews"),
        };
        observer.observe_gray(Stage::Edges, &GrayImage::from_pixel(8, 8, Luma([255])));
        assert!(dir.path().join("previews").join("05-edges.png").exists());
    }

    #[test]
    fn unwritable_preview_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // A regular file where the directory should be.
        let observer = StageObserver::PreviewObserver { dir: blocker };
        observer.observe_gray(Stage::Gamma, &GrayImage::new(2, 2));
    }

    #[test]
    fn outline_is_drawn_in_green() {
        let source = DynamicImage::ImageLuma8(GrayImage::new(20, 20));
        let outline = [
            Point::new(2.0, 2.0),
            Point::new(17.0, 2.0),
            Point::new(17.0, 17.0),
            Point::new(2.0, 17.0),
        ];
        let overlay = draw_outline(&source, &outline);
        assert_eq!(*overlay.get_pixel(10, 2), OUTLINE_COLOUR);
        assert_eq!(overlay.get_pixel(10, 10).0, [0, 0, 0]);
    }

    #[test]
    fn observer_kind_maps_to_observer() {
        assert_eq!(StageObserver::from_kind(&ObserverKind::None), StageObserver::NoObserver);
        assert!(StageObserver::from_kind(&ObserverKind::Logging).is_active());
    }
}
