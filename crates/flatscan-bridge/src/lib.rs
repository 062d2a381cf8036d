// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan-bridge: image acquisition and remote storage behind traits.
//
// Desktop builds get a stub camera, a camera that replays a pre-captured
// photo from disk, and a remote storage that mirrors folders as local
// directories.

pub mod local;
pub mod stub;
pub mod traits;

pub use local::{FileCamera, LocalFolderStorage};
pub use stub::StubCamera;
pub use traits::{Camera, RemoteStorage};
