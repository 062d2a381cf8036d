// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extraction seam and saving of reviewed text.

use std::path::Path;

use flatscan_core::error::Result;
use image::DynamicImage;
use tracing::info;

/// Anything that can read text off a finished scan.
pub trait TextExtractor {
    fn extract_text(&self, raster: &DynamicImage) -> Result<String>;
}

/// Write reviewed OCR text to `path`, replacing any earlier file.
pub fn save_text(text: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, text)?;
    info!(path = %path.display(), chars = text.len(), "Text saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText(&'static str);

    impl TextExtractor for FixedText {
        fn extract_text(&self, _raster: &DynamicImage) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn extracted_text_is_saved_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_text.txt");
        let extractor: &dyn TextExtractor = &FixedText("Invoice 42\nTotal: 10 EUR\n");
        let text = extractor.extract_text(&DynamicImage::new_luma8(1, 1)).unwrap();
        save_text(&text, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Invoice 42\nTotal: 10 EUR\n");
    }
}
