// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-oriented terminal prompts.
//
// Generic over reader and writer so the flow can be driven from scripted
// input in tests.

use std::fmt::Display;
use std::io::{BufRead, Write};

use flatscan_core::error::Result;
use flatscan_core::flow::Answer;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Ask a free-form question. `None` once input is exhausted.
    pub fn ask_line(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until the reply parses as yes or no. `None` once input is exhausted.
    pub fn ask_yes_no(&mut self, question: &str) -> Result<Option<Answer>> {
        let prompt = format!("{} [y/n]", question);
        loop {
            let Some(reply) = self.ask_line(&prompt)? else {
                return Ok(None);
            };
            match Answer::parse(&reply) {
                Some(answer) => return Ok(Some(answer)),
                None => self.say("Please answer y or n.")?,
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn yes_no_reprompts_on_garbage() {
        let mut c = console("maybe\nYES\n");
        assert_eq!(c.ask_yes_no("Continue?").unwrap(), Some(Answer::Yes));
        let out = String::from_utf8(c.into_output()).unwrap();
        assert_eq!(out.matches("Continue? [y/n]").count(), 2);
        assert!(out.contains("Please answer y or n."));
    }

    #[test]
    fn exhausted_input_yields_none() {
        let mut c = console("");
        assert_eq!(c.ask_yes_no("Continue?").unwrap(), None);
        assert_eq!(c.ask_line("Name:").unwrap(), None);
    }

    #[test]
    fn lines_are_trimmed() {
        let mut c = console("  scans/out  \n");
        assert_eq!(c.ask_line("Dir:").unwrap().as_deref(), Some("scans/out"));
    }
}
