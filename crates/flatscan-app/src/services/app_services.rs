// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: owns the pipeline, exporter and cameras built from
// the configuration, and performs the actions the scan flow asks for.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use flatscan_bridge::{Camera, FileCamera, StubCamera};
use flatscan_core::AppConfig;
use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::flow::FlowAction;
use flatscan_document::scan::text::save_text;
use flatscan_document::{PdfExporter, ScanPipeline, TextExtractor, raster};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use crate::console::Console;
use crate::state::Session;

/// File name used when the user leaves the save-image name empty.
const DEFAULT_IMAGE_NAME: &str = "scanned_image.png";

pub struct AppServices {
    config: AppConfig,
    pipeline: ScanPipeline,
    exporter: PdfExporter,
    precaptured: Box<dyn Camera>,
    camera: Box<dyn Camera>,
    /// Loaded on first use; OCR models are large.
    text: Option<Box<dyn TextExtractor>>,
}

impl AppServices {
    /// Build every service from `config`. Fails on an invalid detector config.
    pub fn new(config: AppConfig) -> Result<Self> {
        let pipeline = ScanPipeline::new(&config.scan)?;
        let exporter = PdfExporter::new(config.paper_size, &config.intermediate_image);
        let precaptured = Box::new(FileCamera::new(&config.precaptured_image));
        info!(
            paper = ?config.paper_size,
            precaptured = %config.precaptured_image.display(),
            "app services initialised"
        );
        Ok(Self {
            config,
            pipeline,
            exporter,
            precaptured,
            camera: Box::new(StubCamera),
            text: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run `action` against `session`. The session is only updated on success.
    #[instrument(skip(self, session, console))]
    pub fn perform<R: BufRead, W: Write>(
        &mut self,
        action: FlowAction,
        session: &mut Session,
        console: &mut Console<R, W>,
    ) -> Result<()> {
        match action {
            FlowAction::LoadPrecaptured => {
                let image = self.precaptured.capture()?;
                console.say(format!(
                    "Loaded {} ({}x{}).",
                    self.config.precaptured_image.display(),
                    image.width(),
                    image.height()
                ))?;
                self.accept_capture(image, session, console)?;
            }
            FlowAction::CaptureFromCamera => {
                let image = self.camera.capture()?;
                console.say(format!("Captured {}x{} frame.", image.width(), image.height()))?;
                self.accept_capture(image, session, console)?;
            }
            FlowAction::Enhance { binarize } => {
                let enhanced = self.pipeline.enhance(session.rectified()?, binarize);
                console.say(format!(
                    "Scan enhanced ({}).",
                    if binarize { "black and white" } else { "original tones" }
                ))?;
                session.final_image = Some(enhanced);
            }
            FlowAction::RunOcr => {
                let text = self.text_extractor()?.extract_text(session.final_image()?)?;
                console.say("--- Recognized text ---")?;
                console.say(&text)?;
                console.say("-----------------------")?;
                save_text(&text, &self.config.text_output)?;
                console.say(format!("Text saved to {}.", self.config.text_output.display()))?;
                session.text = Some(text);
                session.text_path = Some(self.config.text_output.clone());
            }
            FlowAction::ExportPdf => {
                self.exporter
                    .export(session.final_image()?, &self.config.pdf_output)?;
                console.say(format!("PDF written to {}.", self.config.pdf_output.display()))?;
                session.pdf_path = Some(self.config.pdf_output.clone());
            }
            FlowAction::SaveImage => {
                let image = session.final_image()?;
                let path = ask_image_path(console)?;
                raster::save_png(image, &path)?;
                console.say(format!("Image saved to {}.", path.display()))?;
                session.saved_image = Some(path);
            }
        }
        Ok(())
    }

    /// Detect and flatten the page in a fresh capture. Nothing is stored
    /// unless a document outline was found.
    fn accept_capture<R: BufRead, W: Write>(
        &self,
        image: DynamicImage,
        session: &mut Session,
        console: &mut Console<R, W>,
    ) -> Result<()> {
        let rectified = self.pipeline.flatten(&image)?;
        console.say(format!(
            "Document found and flattened to {}x{}.",
            rectified.width(),
            rectified.height()
        ))?;
        session.captured = Some(image);
        session.rectified = Some(rectified);
        Ok(())
    }

    fn text_extractor(&mut self) -> Result<&dyn TextExtractor> {
        if self.text.is_none() {
            self.text = Some(load_text_extractor(&self.config)?);
        }
        self.text
            .as_deref()
            .ok_or_else(|| FlatscanError::Ocr("no text extractor loaded".into()))
    }
}

#[cfg(test)]
impl AppServices {
    pub fn with_camera(mut self, camera: Box<dyn Camera>) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_text_extractor(mut self, text: Box<dyn TextExtractor>) -> Self {
        self.text = Some(text);
        self
    }
}

/// Ask for a directory and file name; a missing extension becomes `.png`.
fn ask_image_path<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<PathBuf> {
    let dir = console
        .ask_line("Directory to save the image in (empty for the current one):")?
        .ok_or_else(|| FlatscanError::Export("no directory given".into()))?;
    let name = console
        .ask_line("File name:")?
        .ok_or_else(|| FlatscanError::Export("no file name given".into()))?;

    let mut path = PathBuf::from(if dir.is_empty() { "." } else { dir.as_str() });
    path.push(if name.is_empty() {
        DEFAULT_IMAGE_NAME
    } else {
        name.as_str()
    });
    if path.extension().is_none() {
        path.set_extension("png");
    }
    debug!(path = %path.display(), "image destination chosen");
    Ok(path)
}

#[cfg(feature = "ocr")]
fn load_text_extractor(config: &AppConfig) -> Result<Box<dyn TextExtractor>> {
    use flatscan_document::scan::ocr::{OcrConfig, OcrEngine};

    let ocr_config = OcrConfig::from_optional_dir(config.ocr_model_dir.as_deref());
    Ok(Box::new(OcrEngine::new(ocr_config)?))
}

#[cfg(not(feature = "ocr"))]
fn load_text_extractor(_config: &AppConfig) -> Result<Box<dyn TextExtractor>> {
    Err(FlatscanError::Ocr(
        "flatscan was built without OCR support (enable the `ocr` feature)".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    struct FixedText;

    impl TextExtractor for FixedText {
        fn extract_text(&self, _raster: &DynamicImage) -> Result<String> {
            Ok("INVOICE 42".into())
        }
    }

    struct FixedCamera(DynamicImage);

    impl Camera for FixedCamera {
        fn capture(&self) -> Result<DynamicImage> {
            Ok(self.0.clone())
        }
    }

    fn page_photo() -> DynamicImage {
        let mut img = GrayImage::from_pixel(500, 600, Luma([10]));
        for y in 60..540 {
            for x in 50..450 {
                img.put_pixel(x, y, Luma([245]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            precaptured_image: dir.join("captured_image.png"),
            intermediate_image: dir.join("final_image.png"),
            pdf_output: dir.join("scanned_document.pdf"),
            text_output: dir.join("saved_text.txt"),
            storage_root: dir.join("storage"),
            ..AppConfig::default()
        }
    }

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn precaptured_image_is_loaded_into_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        page_photo().save(&config.precaptured_image).unwrap();

        let mut services = AppServices::new(config).unwrap();
        let mut session = Session::default();
        services
            .perform(FlowAction::LoadPrecaptured, &mut session, &mut console(""))
            .unwrap();
        assert_eq!(session.captured.as_ref().map(|img| img.width()), Some(500));
        let flat = session.rectified().unwrap();
        assert!(flat.width().abs_diff(400) <= 10, "width {}", flat.width());
        assert!(flat.height().abs_diff(480) <= 10, "height {}", flat.height());
    }

    #[test]
    fn desktop_camera_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path())).unwrap();
        let mut session = Session::default();
        let err = services
            .perform(FlowAction::CaptureFromCamera, &mut session, &mut console(""))
            .unwrap_err();
        assert!(matches!(err, FlatscanError::PlatformUnavailable));
        assert!(session.captured.is_none());
    }

    #[test]
    fn enhance_then_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path()))
            .unwrap()
            .with_camera(Box::new(FixedCamera(page_photo())));
        let mut session = Session::default();
        let mut c = console("");

        services
            .perform(FlowAction::CaptureFromCamera, &mut session, &mut c)
            .unwrap();
        services
            .perform(FlowAction::Enhance { binarize: true }, &mut session, &mut c)
            .unwrap();
        let flat = session.final_image().unwrap();
        assert!(flat.width().abs_diff(400) <= 10, "width {}", flat.width());
        assert!(flat.height().abs_diff(480) <= 10, "height {}", flat.height());

        services
            .perform(FlowAction::ExportPdf, &mut session, &mut c)
            .unwrap();
        assert!(dir.path().join("final_image.png").is_file());
        assert_eq!(
            session.pdf_path.as_deref(),
            Some(dir.path().join("scanned_document.pdf").as_path())
        );
    }

    #[test]
    fn blank_photo_fails_at_capture() {
        let dir = tempfile::tempdir().unwrap();
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 300, Luma([128])));
        let mut services = AppServices::new(config_in(dir.path()))
            .unwrap()
            .with_camera(Box::new(FixedCamera(blank)));
        let mut session = Session::default();

        let err = services
            .perform(FlowAction::CaptureFromCamera, &mut session, &mut console(""))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(session.captured.is_none());
        assert!(session.rectified.is_none());
    }

    #[test]
    fn enhance_before_capture_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path())).unwrap();
        let mut session = Session::default();
        let err = services
            .perform(FlowAction::Enhance { binarize: true }, &mut session, &mut console(""))
            .unwrap_err();
        assert!(matches!(err, FlatscanError::Input(_)));
        assert!(session.final_image.is_none());
    }

    #[test]
    fn ocr_text_is_printed_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path()))
            .unwrap()
            .with_text_extractor(Box::new(FixedText));
        let mut session = Session {
            final_image: Some(page_photo()),
            ..Session::default()
        };
        let mut c = console("");
        services
            .perform(FlowAction::RunOcr, &mut session, &mut c)
            .unwrap();

        let saved = std::fs::read_to_string(dir.path().join("saved_text.txt")).unwrap();
        assert_eq!(saved, "INVOICE 42");
        assert_eq!(session.text.as_deref(), Some("INVOICE 42"));
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("INVOICE 42"));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn ocr_without_feature_is_an_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path())).unwrap();
        let mut session = Session {
            final_image: Some(page_photo()),
            ..Session::default()
        };
        let err = services
            .perform(FlowAction::RunOcr, &mut session, &mut console(""))
            .unwrap_err();
        assert!(matches!(err, FlatscanError::Ocr(_)));
        assert!(session.text.is_none());
    }

    #[test]
    fn save_image_asks_for_directory_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path())).unwrap();
        let mut session = Session {
            final_image: Some(page_photo()),
            ..Session::default()
        };
        let input = format!("{}\nreceipt\n", dir.path().display());
        let mut c = console(&input);
        services
            .perform(FlowAction::SaveImage, &mut session, &mut c)
            .unwrap();

        let expected = dir.path().join("receipt.png");
        assert!(expected.is_file());
        assert_eq!(session.saved_image, Some(expected));
    }

    #[test]
    fn export_before_enhance_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = AppServices::new(config_in(dir.path())).unwrap();
        let mut session = Session::default();
        let err = services
            .perform(FlowAction::ExportPdf, &mut session, &mut console(""))
            .unwrap_err();
        assert!(matches!(err, FlatscanError::Input(_)));
    }
}
