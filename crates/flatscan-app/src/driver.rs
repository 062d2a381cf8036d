// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drives the scan flow from yes/no answers, then offers the upload.

use std::io::{BufRead, Write};

use flatscan_bridge::RemoteStorage;
use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::flow::{Answer, step};
use flatscan_core::human_errors::humanize_error;
use tracing::{info, warn};

use crate::console::Console;
use crate::services::app_services::AppServices;
use crate::state::Session;

/// Ask the flow's questions until it is done or input runs out.
///
/// A failed action leaves the state where it was, so the same question is
/// asked again. Detection and geometry failures also discard whatever the
/// session holds and go back to the capture question.
pub fn run_flow<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    services: &mut AppServices,
    session: &mut Session,
) -> Result<()> {
    while let Some(question) = session.state.prompt() {
        let Some(answer) = console.ask_yes_no(question)? else {
            info!(state = ?session.state, "input closed, leaving the scan flow");
            return Ok(());
        };
        let Some(transition) = step(session.state, answer) else {
            break;
        };

        let outcome = match transition.action {
            Some(action) => services.perform(action, session, console),
            None => Ok(()),
        };
        match outcome {
            Ok(()) => {
                info!(from = ?session.state, to = ?transition.next, "flow advanced");
                session.state = transition.next;
            }
            Err(err) => {
                report(console, &err)?;
                if err.is_recoverable() {
                    console.say("Please capture the document again.")?;
                    session.restart();
                }
            }
        }
    }
    Ok(())
}

/// Offer to upload the session's output. Returns the remote id on upload.
pub fn run_upload<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    storage: &dyn RemoteStorage,
    session: &Session,
) -> Result<Option<String>> {
    let Some(file) = session.upload_candidate() else {
        console.say("Nothing to upload.")?;
        return Ok(None);
    };
    let question = format!("Upload {} to remote storage?", file.display());
    if console.ask_yes_no(&question)? != Some(Answer::Yes) {
        return Ok(None);
    }

    let folders = storage.list_folders()?;
    if folders.is_empty() {
        console.say("No folders yet.")?;
    } else {
        console.say("Folders:")?;
        for (n, folder) in folders.iter().enumerate() {
            console.say(format!("  {}. {}", n + 1, folder.name))?;
        }
    }

    let choice = console
        .ask_line("Folder number, a new folder name, or empty for the top level:")?
        .unwrap_or_default();
    let folder_id = if choice.is_empty() {
        None
    } else if let Ok(n) = choice.parse::<usize>() {
        let folder = n
            .checked_sub(1)
            .and_then(|i| folders.get(i))
            .ok_or_else(|| FlatscanError::Upload(format!("no folder numbered {}", n)))?;
        Some(folder.id.clone())
    } else {
        let id = storage.create_folder(&choice)?;
        console.say(format!("Created folder {}.", choice))?;
        Some(id)
    };

    let remote_id = storage.upload(file, folder_id.as_deref())?;
    console.say(format!("Uploaded as {}.", remote_id))?;
    Ok(Some(remote_id))
}

/// Show a failure the way a user can act on it.
pub fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    err: &FlatscanError,
) -> Result<()> {
    warn!(error = %err, "action failed");
    let human = humanize_error(err);
    console.say(&human.message)?;
    console.say(format!("  {}", human.suggestion))
}
