// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan: core types, errors, configuration and the scan flow shared across all crates.

pub mod config;
pub mod error;
pub mod flow;
pub mod human_errors;
pub mod types;

pub use config::{AppConfig, DetectorConfig, ObserverKind, ScanConfig};
pub use error::{FlatscanError, Result};
pub use types::*;
