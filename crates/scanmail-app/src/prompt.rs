// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator input and output.
//
// Every interactive step talks to the operator through `Prompter`, so the
// menu and the scanning session can be driven by a script in tests.

use dialoguer::{Input, Password};
use scanmail_core::error::{Result, ScanmailError};

/// Line-oriented conversation with the operator.
pub trait Prompter {
    /// Show `prompt` and block until the operator answers. Empty answers are allowed.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Like [`ask`](Self::ask), without echoing the answer.
    fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)
    }

    /// Show one line of output.
    fn say(&mut self, line: &str);
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ScanmailError::Prompt(e.to_string()))
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| ScanmailError::Prompt(e.to_string()))
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Answers from a fixed script; records everything shown.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Whether any line shown so far contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(prompt.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| ScanmailError::Prompt(format!("script exhausted at {prompt:?}")))
    }

    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_owned());
    }
}
