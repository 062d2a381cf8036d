// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Default location of the configuration file.

use std::path::PathBuf;

/// `$XDG_CONFIG_HOME/flatscan/config.json`, falling back to `~/.config`.
///
/// The directory is not created; a missing file just means default settings.
pub fn config_path() -> PathBuf {
    config_base().join("flatscan").join("config.json")
}

fn config_base() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
