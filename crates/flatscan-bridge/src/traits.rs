// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for the collaborators the scanner talks to.
//
// The pipeline itself never acquires images or moves files off the machine;
// the app reaches those capabilities through these traits.

use std::path::Path;

use flatscan_core::RemoteFolder;
use flatscan_core::error::Result;
use image::DynamicImage;

/// Source of photographs to scan.
pub trait Camera {
    /// Acquire one frame.
    ///
    /// Fails with `FlatscanError::Capture` when a frame could not be taken and
    /// `FlatscanError::PlatformUnavailable` when no camera exists.
    fn capture(&self) -> Result<DynamicImage>;
}

/// Destination for finished scans.
pub trait RemoteStorage {
    /// Upload `file` into the folder `folder_id` (or the storage root when
    /// `None`) and return the id assigned by the remote side.
    fn upload(&self, file: &Path, folder_id: Option<&str>) -> Result<String>;

    /// All folders, ordered by name.
    fn list_folders(&self) -> Result<Vec<RemoteFolder>>;

    /// Create a folder and return its id.
    fn create_folder(&self, name: &str) -> Result<String>;
}
