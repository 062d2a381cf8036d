// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub camera for desktop/CI builds where no native camera API is reachable.

use flatscan_core::error::{FlatscanError, Result};
use image::DynamicImage;

use crate::traits::Camera;

/// Camera that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubCamera;

impl Camera for StubCamera {
    fn capture(&self) -> Result<DynamicImage> {
        tracing::warn!("Camera::capture called on stub camera");
        Err(FlatscanError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_camera_is_unavailable() {
        let err = StubCamera.capture().unwrap_err();
        assert!(matches!(err, FlatscanError::PlatformUnavailable));
    }
}
