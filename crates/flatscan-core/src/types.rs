// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the flatscan document scanner.

use serde::{Deserialize, Serialize};

/// A point in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Four document corners.
///
/// After [`order_points`](../../flatscan_document/geometry/fn.order_points.html)
/// the corners are `[top_left, top_right, bottom_right, bottom_left]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub corners: [Point; 4],
}

impl Quadrilateral {
    pub const fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    /// Corners as plain tuples, the form `imageproc` projections expect.
    pub fn as_tuples(&self) -> [(f32, f32); 4] {
        self.corners.map(Into::into)
    }
}

/// Pipeline stages, in execution order.
///
/// Used to tag processing errors and to label observer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Grayscale,
    Gamma,
    Threshold,
    Closing,
    Edges,
    Detection,
    Rectification,
    Binarization,
    Sharpening,
}

impl Stage {
    /// Lower-case name used in log fields and preview file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Gamma => "gamma",
            Self::Threshold => "threshold",
            Self::Closing => "closing",
            Self::Edges => "edges",
            Self::Detection => "detection",
            Self::Rectification => "rectification",
            Self::Binarization => "binarization",
            Self::Sharpening => "sharpening",
        }
    }

    /// Position of the stage in the pipeline (1-based).
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Grayscale => 1,
            Self::Gamma => 2,
            Self::Threshold => 3,
            Self::Closing => 4,
            Self::Edges => 5,
            Self::Detection => 6,
            Self::Rectification => 7,
            Self::Binarization => 8,
            Self::Sharpening => 9,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Standard paper sizes for PDF export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// A folder in remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFolder {
    pub id: String,
    pub name: String,
}
