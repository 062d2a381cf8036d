// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the interactive scanner.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity decides whether the driver offers another attempt.

use crate::error::FlatscanError;
use crate::types::Stage;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Try again, possibly with a different photo.
    Transient,
    /// The user must change something (file path, lighting, settings).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `FlatscanError` into something a non-technical user can act on.
pub fn humanize_error(err: &FlatscanError) -> HumanError {
    match err {
        // -- Pipeline --
        FlatscanError::Input(_) => HumanError {
            message: "The photo couldn't be opened.".into(),
            suggestion: "Check the file exists and is a JPEG or PNG image.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FlatscanError::Detection(_) => HumanError {
            message: "We couldn't find a document in the photo.".into(),
            suggestion: "Place the page on a dark surface so all four edges are visible, then take the photo again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FlatscanError::Geometry(_) => HumanError {
            message: "The document's corners couldn't be worked out.".into(),
            suggestion: "Hold the camera more squarely above the page and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FlatscanError::Processing { stage, message } => humanize_processing(*stage, message),

        // -- Collaborators --
        FlatscanError::Capture(_) => HumanError {
            message: "The camera didn't return a picture.".into(),
            suggestion: "Make sure no other program is using the camera, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FlatscanError::Ocr(_) => HumanError {
            message: "Text recognition didn't work on this scan.".into(),
            suggestion: "Try scanning the document again with better lighting, making sure the text is clear and in focus.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FlatscanError::Export(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Check there is free disk space and the output folder is writable.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FlatscanError::Upload(detail) => {
            if detail.contains("folder") {
                HumanError {
                    message: "That folder doesn't exist.".into(),
                    suggestion: "Choose one of the listed folders or create a new one.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The file couldn't be uploaded.".into(),
                    suggestion: "Check the storage location is reachable, then try again.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        // -- Configuration / persistence --
        FlatscanError::InvalidConfig(detail) => HumanError {
            message: "The settings file has a value that can't be used.".into(),
            suggestion: format!("Fix the setting and start again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FlatscanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "The app doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or pick a different location.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        FlatscanError::Serialization(_) => HumanError {
            message: "A saved settings or index file is damaged.".into(),
            suggestion: "Delete or fix the file and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FlatscanError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Use a pre-captured image instead of the camera.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

fn humanize_processing(stage: Stage, detail: &str) -> HumanError {
    match stage {
        Stage::Rectification => HumanError {
            message: "The page couldn't be straightened.".into(),
            suggestion: format!("Take the photo again from directly above. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        },
        _ => HumanError {
            message: "The image couldn't be processed.".into(),
            suggestion: format!("Try a different photo. If this keeps happening, please report it. ({stage}: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
