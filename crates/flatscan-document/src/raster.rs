// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster I/O: load photos into the two pixel layouts the pipeline accepts
// (8-bit RGB and 8-bit grayscale) and encode results losslessly as PNG.

use std::path::Path;

use flatscan_core::error::{FlatscanError, Result};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};

/// Load an image file and normalize it for the pipeline.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| {
        FlatscanError::Input(format!("failed to open {}: {}", path.display(), err))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(normalize(img))
}

/// Restrict a raster to `Luma8` or `Rgb8`.
///
/// Grayscale stays grayscale when it is already 8-bit; everything else
/// (alpha, 16-bit, float) becomes `Rgb8`.
pub fn normalize(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Write a raster as PNG, whatever the file extension says.
pub fn save_png(img: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    img.save_with_format(path, ImageFormat::Png).map_err(|err| {
        FlatscanError::Export(format!("failed to save image to {}: {}", path.display(), err))
    })?;
    debug!(path = %path.display(), "PNG written");
    Ok(())
}
