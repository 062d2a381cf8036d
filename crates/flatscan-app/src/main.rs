// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan: turn a photo of a page into a flat, clean scan.
//
// Entry point. Parses the command line, initialises logging, loads the
// configuration, then walks the user through the scan flow on the terminal.

mod console;
mod driver;
mod services;
mod state;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flatscan_bridge::LocalFolderStorage;
use flatscan_core::error::Result;
use flatscan_core::human_errors::humanize_error;
use flatscan_core::{AppConfig, ObserverKind};
use tracing::{error, info};

use console::Console;
use services::app_services::AppServices;
use services::data_dir;
use state::Session;

#[derive(Parser, Debug)]
#[command(name = "flatscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flatten photographed documents into clean scans", long_about = None)]
struct Cli {
    /// JSON configuration file (defaults to $XDG_CONFIG_HOME/flatscan/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Photo used when answering yes to "Use a pre-captured image?"
    #[arg(long)]
    image: Option<PathBuf>,

    /// Write a PNG of every pipeline stage into this directory
    #[arg(long = "preview-dir")]
    preview_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("flatscan starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "flatscan failed");
            eprintln!("{}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Config file merged with command-line overrides.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = cli.config.clone().unwrap_or_else(data_dir::config_path);
    let mut config = AppConfig::load_or_default(&path)?;
    if let Some(image) = &cli.image {
        config.precaptured_image = image.clone();
    }
    if let Some(dir) = &cli.preview_dir {
        config.scan.observer = ObserverKind::Preview { dir: dir.clone() };
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let mut services = AppServices::new(config)?;
    let mut session = Session::default();

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    driver::run_flow(&mut console, &mut services, &mut session)?;
    if !session.state.is_terminal() {
        return Ok(());
    }

    let storage = LocalFolderStorage::open(&services.config().storage_root)?;
    if let Err(err) = driver::run_upload(&mut console, &storage, &session) {
        driver::report(&mut console, &err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "flatscan",
            "--config",
            dir.path().join("absent.json").to_str().unwrap(),
            "--image",
            "page.jpg",
            "--preview-dir",
            "previews",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.precaptured_image, PathBuf::from("page.jpg"));
        assert_eq!(
            config.scan.observer,
            ObserverKind::Preview {
                dir: PathBuf::from("previews")
            }
        );
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let saved = AppConfig {
            pdf_output: PathBuf::from("out.pdf"),
            ..AppConfig::default()
        };
        saved.save(&path).unwrap();

        let cli = Cli::parse_from(["flatscan", "--config", path.to_str().unwrap()]);
        assert_eq!(load_config(&cli).unwrap(), saved);
    }
}
