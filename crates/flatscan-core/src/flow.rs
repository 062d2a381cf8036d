// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive scan flow as an explicit state machine.
//
// The flow only decides what happens next. Performing an action is the
// driver's job, and the driver commits `Transition::next` only once the
// action has succeeded.

use serde::{Deserialize, Serialize};

/// Where the user is in the scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    Initial,
    ImageCaptured,
    Binarized,
    OcrCompleted,
    Final,
    Done,
}

/// Reply to a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Parse `y`/`yes`/`n`/`no`, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Self::Yes),
            "n" | "no" => Some(Self::No),
            _ => None,
        }
    }
}

/// Work the driver performs on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    /// Acquire a photo, then detect and flatten the page in it.
    LoadPrecaptured,
    CaptureFromCamera,
    /// Binarize (optionally) and sharpen the flattened page.
    Enhance { binarize: bool },
    RunOcr,
    ExportPdf,
    SaveImage,
}

/// The outcome of answering a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// `None` when the answer only moves the flow along.
    pub action: Option<FlowAction>,
    pub next: FlowState,
}

impl FlowState {
    /// The question asked in this state. `None` once the flow is done.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Self::Initial => Some("Use a pre-captured image?"),
            Self::ImageCaptured => Some("Binarize the document?"),
            Self::Binarized => Some("Run OCR on the document?"),
            Self::OcrCompleted | Self::Final => Some("Export the result as PDF?"),
            Self::Done => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Pure transition function of the scan flow.
pub fn step(state: FlowState, answer: Answer) -> Option<Transition> {
    use Answer::{No, Yes};
    use FlowState::*;

    let (action, next) = match (state, answer) {
        (Initial, Yes) => (Some(FlowAction::LoadPrecaptured), ImageCaptured),
        (Initial, No) => (Some(FlowAction::CaptureFromCamera), ImageCaptured),
        (ImageCaptured, Yes) => (Some(FlowAction::Enhance { binarize: true }), Binarized),
        (ImageCaptured, No) => (Some(FlowAction::Enhance { binarize: false }), Binarized),
        (Binarized, Yes) => (Some(FlowAction::RunOcr), OcrCompleted),
        (Binarized, No) => (None, Final),
        (OcrCompleted | Final, Yes) => (Some(FlowAction::ExportPdf), Done),
        (OcrCompleted | Final, No) => (Some(FlowAction::SaveImage), Done),
        (Done, _) => return None,
    };
    Some(Transition { action, next })
}
