// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: warp a four-cornered page into a flat,
// top-down rectangle.

use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::{Quadrilateral, Stage};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument};

use crate::geometry::{distance, order_points};

/// Largest page, in pixels, the rectifier will allocate.
pub const MAX_TARGET_PIXELS: u64 = 1 << 28;

/// Output size for an ordered quadrilateral.
///
/// Width is the longer of the top and bottom edges, height the longer of the
/// left and right edges, both truncated to whole pixels.
pub fn target_size(ordered: &Quadrilateral) -> (u32, u32) {
    let (tl, tr, br, bl) = (
        ordered.top_left(),
        ordered.top_right(),
        ordered.bottom_right(),
        ordered.bottom_left(),
    );
    let width = distance(br, bl).max(distance(tr, tl));
    let height = distance(tr, br).max(distance(tl, bl));
    (width as u32, height as u32)
}

/// Projective transform taking the ordered corners onto a `width x height` rectangle.
pub fn rectifying_projection(ordered: &Quadrilateral, width: u32, height: u32) -> Result<Projection> {
    let (right, bottom) = (width.saturating_sub(1) as f32, height.saturating_sub(1) as f32);
    let dest = [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)];
    Projection::from_control_points(ordered.as_tuples(), dest).ok_or_else(|| {
        FlatscanError::Geometry(format!(
            "corners {:?} do not define a perspective transform",
            ordered.corners
        ))
    })
}

/// Flatten the page bounded by `outline`.
///
/// Grayscale input stays grayscale; anything else comes back as `Rgb8`.
/// Destination pixels that map outside the source are black.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
pub fn rectify(raster: &DynamicImage, outline: &Quadrilateral) -> Result<DynamicImage> {
    let ordered = order_points(outline.corners)?;
    let (width, height) = target_size(&ordered);
    debug!(?ordered, width, height, "Target size computed");

    if width < 1 || height < 1 {
        return Err(FlatscanError::Geometry(format!(
            "degenerate outline yields a {width}x{height} page"
        )));
    }

    if u64::from(width) * u64::from(height) > MAX_TARGET_PIXELS {
        return Err(FlatscanError::processing(
            Stage::Rectification,
            format!("a {width}x{height} page exceeds the {MAX_TARGET_PIXELS} pixel limit"),
        ));
    }

    let projection = rectifying_projection(&ordered, width, height)?;

    let rectified = match raster {
        DynamicImage::ImageLuma8(gray) => {
            let mut out = GrayImage::new(width, height);
            warp_into(gray, &projection, Interpolation::Bilinear, Luma([0]), &mut out);
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageRgb8(rgb) => DynamicImage::ImageRgb8(warp_rgb(rgb, &projection, width, height)),
        other => DynamicImage::ImageRgb8(warp_rgb(&other.to_rgb8(), &projection, width, height)),
    };

    info!(width, height, "Perspective rectified");
    Ok(rectified)
}

fn warp_rgb(rgb: &RgbImage, projection: &Projection, width: u32, height: u32) -> RgbImage {
    let mut out = RgbImage::new(width, height);
    warp_into(rgb, projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
    out
}
