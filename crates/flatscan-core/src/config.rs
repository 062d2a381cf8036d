// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner and application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FlatscanError, Result};
use crate::types::PaperSize;

/// Tuning for document outline detection.
///
/// The defaults were tuned for one indoor webcam setup; treat them as a
/// starting point rather than derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Gamma applied through the lookup table; intensities are raised to
    /// `1 / gamma`, so values below 1 darken mid-tones.
    pub gamma: f32,
    /// Fixed cutoff separating page from background (values >= cutoff are white).
    pub threshold: u8,
    /// Chebyshev radius of the square closing element (2 gives 5x5).
    pub closing_radius: u8,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Contours enclosing this area or less (pixels squared) are ignored.
    pub min_contour_area: f64,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            gamma: 0.3,
            threshold: 80,
            closing_radius: 2,
            canny_low: 50.0,
            canny_high: 150.0,
            min_contour_area: 40_000.0,
            approx_epsilon_ratio: 0.02,
        }
    }
}

impl DetectorConfig {
    /// Reject values that would make detection meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(FlatscanError::InvalidConfig(format!(
                "gamma must be positive, got {}",
                self.gamma
            )));
        }
        if self.canny_low < 0.0 || self.canny_low > self.canny_high {
            return Err(FlatscanError::InvalidConfig(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if !self.approx_epsilon_ratio.is_finite() || self.approx_epsilon_ratio <= 0.0 {
            return Err(FlatscanError::InvalidConfig(format!(
                "approx_epsilon_ratio must be positive, got {}",
                self.approx_epsilon_ratio
            )));
        }
        if self.min_contour_area < 0.0 {
            return Err(FlatscanError::InvalidConfig(format!(
                "min_contour_area must not be negative, got {}",
                self.min_contour_area
            )));
        }
        Ok(())
    }
}

/// Which stage observer the pipeline reports to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObserverKind {
    #[default]
    None,
    Logging,
    /// Write a PNG per stage into `dir`.
    Preview { dir: PathBuf },
}

/// Scan pipeline settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub detector: DetectorConfig,
    pub observer: ObserverKind,
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    /// Page size of exported PDFs.
    pub paper_size: PaperSize,
    /// Image used when the user opts for a pre-captured photo.
    pub precaptured_image: PathBuf,
    /// Lossless copy of the final raster written before PDF assembly.
    pub intermediate_image: PathBuf,
    pub pdf_output: PathBuf,
    /// Where reviewed OCR text is saved.
    pub text_output: PathBuf,
    /// Root directory of the local folder storage used for uploads.
    pub storage_root: PathBuf,
    /// Directory holding the OCR models; `None` uses the default cache.
    pub ocr_model_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            paper_size: PaperSize::A4,
            precaptured_image: PathBuf::from("captured_image.jpeg"),
            intermediate_image: PathBuf::from("final_image.png"),
            pdf_output: PathBuf::from("scanned_document.pdf"),
            text_output: PathBuf::from("saved_text.txt"),
            storage_root: PathBuf::from("flatscan-storage"),
            ocr_model_dir: None,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.scan.detector.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Persist as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
