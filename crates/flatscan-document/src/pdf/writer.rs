// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF export of a finished scan using `printpdf` 0.8.
//
// printpdf 0.8 builds documents from `PdfPage` structs holding `Vec<Op>`
// operation lists, serialised via `PdfDocument::save()`.

use std::path::{Path, PathBuf};

use flatscan_core::PaperSize;
use flatscan_core::error::{FlatscanError, Result};
use image::DynamicImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::raster;

/// Distance of the image from the top and left page edges.
const MARGIN_MM: f32 = 10.0;
/// Width the image is scaled to when the page allows it.
const IMAGE_WIDTH_MM: f32 = 190.0;
/// Resolution used to express pixel sizes in points before scaling.
const EMBED_DPI: f32 = 300.0;
const DOCUMENT_TITLE: &str = "Scanned Document";

/// Where the scan sits on the page, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left_mm: f32,
    pub top_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Writes a scan as a single-page PDF, keeping a lossless PNG copy alongside.
pub struct PdfExporter {
    paper_size: PaperSize,
    /// PNG written before the PDF is assembled.
    intermediate_path: PathBuf,
}

impl PdfExporter {
    pub fn new(paper_size: PaperSize, intermediate_path: impl Into<PathBuf>) -> Self {
        Self {
            paper_size,
            intermediate_path: intermediate_path.into(),
        }
    }

    /// Place a `width_px x height_px` image 10 mm from the top-left corner,
    /// 190 mm wide, shrinking it when its height would run off the page.
    pub fn placement(&self, width_px: u32, height_px: u32) -> Placement {
        let (page_w, page_h) = self.paper_size.dimensions_mm();
        let max_w = IMAGE_WIDTH_MM.min(page_w as f32 - 2.0 * MARGIN_MM);
        let max_h = page_h as f32 - 2.0 * MARGIN_MM;
        let aspect = height_px.max(1) as f32 / width_px.max(1) as f32;

        let (mut width_mm, mut height_mm) = (max_w, max_w * aspect);
        if height_mm > max_h {
            height_mm = max_h;
            width_mm = max_h / aspect;
        }
        Placement {
            left_mm: MARGIN_MM,
            top_mm: MARGIN_MM,
            width_mm,
            height_mm,
        }
    }

    /// Build the PDF bytes for `raster`.
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    pub fn render(&self, raster: &DynamicImage) -> Result<Vec<u8>> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(FlatscanError::Export("cannot export an empty image".into()));
        }
        let (page_w_mm, page_h_mm) = self.paper_size.dimensions_mm();
        let (page_w, page_h) = (Mm(page_w_mm as f32), Mm(page_h_mm as f32));
        let placement = self.placement(raster.width(), raster.height());

        let rgb = raster.to_rgb8();
        let (img_w, img_h) = rgb.dimensions();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: img_w as usize,
            height: img_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(DOCUMENT_TITLE);
        let xobject_id = doc.add_image(&raw);

        // Native size at EMBED_DPI, then scaled to the placement width.
        let native_w_pt = img_w as f32 / EMBED_DPI * 72.0;
        let scale = Mm(placement.width_mm).into_pt().0 / native_w_pt;
        let rendered_h_pt = Mm(placement.height_mm).into_pt().0;

        // PDF origin is bottom-left.
        let x_pt = Mm(placement.left_mm).into_pt().0;
        let y_pt = page_h.into_pt().0 - Mm(placement.top_mm).into_pt().0 - rendered_h_pt;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_pt)),
                translate_y: Some(Pt(y_pt)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(EMBED_DPI),
                rotate: None,
            },
        }];
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF generated with warnings");
        }
        debug!(?placement, bytes = output.len(), "PDF rendered");
        Ok(output)
    }

    /// Write the intermediate PNG, then the PDF at `destination`.
    #[instrument(skip(self, raster), fields(destination = %destination.as_ref().display()))]
    pub fn export(&self, raster: &DynamicImage, destination: impl AsRef<Path>) -> Result<()> {
        raster::save_png(raster, &self.intermediate_path)?;
        let bytes = self.render(raster)?;
        std::fs::write(destination.as_ref(), &bytes).map_err(|err| {
            FlatscanError::Export(format!(
                "failed to write {}: {}",
                destination.as_ref().display(),
                err
            ))
        })?;
        info!(
            intermediate = %self.intermediate_path.display(),
            bytes = bytes.len(),
            "PDF exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn portrait_scan_spans_190mm_on_a4() {
        let exporter = PdfExporter::new(PaperSize::A4, "unused.png");
        let p = exporter.placement(600, 800);
        assert_eq!((p.left_mm, p.top_mm), (10.0, 10.0));
        assert!((p.width_mm - 190.0).abs() < 1e-3);
        assert!((p.height_mm - 253.333).abs() < 1e-2);
    }

    #[test]
    fn very_tall_scan_is_shrunk_to_fit() {
        let exporter = PdfExporter::new(PaperSize::A4, "unused.png");
        let p = exporter.placement(100, 1000);
        assert!((p.height_mm - 277.0).abs() < 1e-3);
        assert!((p.width_mm - 27.7).abs() < 1e-3);
    }

    #[test]
    fn narrow_paper_limits_width() {
        let exporter = PdfExporter::new(PaperSize::A5, "unused.png");
        let p = exporter.placement(100, 100);
        assert!((p.width_mm - 128.0).abs() < 1e-3);
    }

    #[test]
    fn export_writes_png_and_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("final_image.png");
        let pdf = dir.path().join("scanned_document.pdf");
        let exporter = PdfExporter::new(PaperSize::A4, &png);

        let scan = DynamicImage::ImageLuma8(GrayImage::from_pixel(60, 80, Luma([255])));
        exporter.export(&scan, &pdf).unwrap();

        assert!(png.exists());
        let bytes = std::fs::read(&pdf).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_image_is_an_export_error() {
        let exporter = PdfExporter::new(PaperSize::A4, "unused.png");
        let err = exporter.render(&DynamicImage::new_luma8(0, 0)).unwrap_err();
        assert!(matches!(err, FlatscanError::Export(_)));
    }
}
