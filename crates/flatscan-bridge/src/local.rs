// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop implementations of the bridge traits.
//
// `FileCamera` replays a pre-captured photo. `LocalFolderStorage` stands in
// for a cloud drive: folders are directories named by id under a root, and
// `index.json` maps ids to human-readable names.

use std::fs;
use std::path::{Path, PathBuf};

use flatscan_core::RemoteFolder;
use flatscan_core::error::{FlatscanError, Result};
use flatscan_document::raster;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::traits::{Camera, RemoteStorage};

const INDEX_FILE: &str = "index.json";

// ---------------------------------------------------------------------------
// FileCamera
// ---------------------------------------------------------------------------

/// Camera that returns the same photo from disk on every capture.
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Camera for FileCamera {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn capture(&self) -> Result<DynamicImage> {
        if !self.path.is_file() {
            return Err(FlatscanError::Capture(format!(
                "no pre-captured image at {}",
                self.path.display()
            )));
        }
        raster::load(&self.path).map_err(|err| match err {
            FlatscanError::Input(msg) => FlatscanError::Capture(msg),
            other => other,
        })
    }
}

// ---------------------------------------------------------------------------
// LocalFolderStorage
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageIndex {
    folders: Vec<RemoteFolder>,
    #[serde(default)]
    uploads: Vec<UploadRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UploadRecord {
    id: String,
    name: String,
    folder_id: Option<String>,
}

/// Remote storage backed by a directory tree.
#[derive(Debug, Clone)]
pub struct LocalFolderStorage {
    root: PathBuf,
}

impl LocalFolderStorage {
    /// Open (and create if needed) the storage rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| {
            FlatscanError::Upload(format!(
                "cannot create storage root {}: {}",
                root.display(),
                err
            ))
        })?;
        debug!(root = %root.display(), "Local folder storage opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the contents of `folder_id`, or the root itself.
    pub fn folder_path(&self, folder_id: Option<&str>) -> PathBuf {
        match folder_id {
            Some(id) => self.root.join(id),
            None => self.root.clone(),
        }
    }

    fn load_index(&self) -> Result<StorageIndex> {
        let path = self.root.join(INDEX_FILE);
        if !path.exists() {
            return Ok(StorageIndex::default());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_index(&self, index: &StorageIndex) -> Result<()> {
        let json = serde_json::to_string_pretty(index)?;
        fs::write(self.root.join(INDEX_FILE), json)?;
        Ok(())
    }
}

impl RemoteStorage for LocalFolderStorage {
    #[instrument(skip(self), fields(file = %file.display()))]
    fn upload(&self, file: &Path, folder_id: Option<&str>) -> Result<String> {
        let mut index = self.load_index()?;
        if let Some(id) = folder_id {
            if !index.folders.iter().any(|f| f.id == id) {
                return Err(FlatscanError::Upload(format!("unknown folder {}", id)));
            }
        }

        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FlatscanError::Upload(format!("{} has no file name", file.display()))
            })?
            .to_string();

        let id = Uuid::new_v4().to_string();
        let dir = self.folder_path(folder_id);
        fs::create_dir_all(&dir).map_err(|err| {
            FlatscanError::Upload(format!("cannot create {}: {}", dir.display(), err))
        })?;
        let target = dir.join(format!("{}-{}", id, name));
        fs::copy(file, &target).map_err(|err| {
            FlatscanError::Upload(format!("failed to upload {}: {}", file.display(), err))
        })?;

        index.uploads.push(UploadRecord {
            id: id.clone(),
            name,
            folder_id: folder_id.map(str::to_string),
        });
        self.save_index(&index)?;

        info!(%id, target = %target.display(), "File uploaded");
        Ok(id)
    }

    fn list_folders(&self) -> Result<Vec<RemoteFolder>> {
        let mut folders = self.load_index()?.folders;
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    #[instrument(skip(self))]
    fn create_folder(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FlatscanError::Upload("folder name must not be empty".into()));
        }

        let mut index = self.load_index()?;
        let id = Uuid::new_v4().to_string();
        let dir = self.folder_path(Some(&id));
        fs::create_dir_all(&dir).map_err(|err| {
            FlatscanError::Upload(format!("cannot create {}: {}", dir.display(), err))
        })?;

        index.folders.push(RemoteFolder {
            id: id.clone(),
            name: name.to_string(),
        });
        self.save_index(&index)?;

        info!(%id, "Folder created");
        Ok(id)
    }
}
