// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning session controller.
//
// Idle -> DeviceReady -> (Scanning -> Converting -> Sending -> AwaitingContinue)*
// -> Closed. Any failure aborts the session; the device is closed and the
// driver released on every path once the device has been opened.

use std::path::PathBuf;

use scanmail_core::error::Result;
use scanmail_core::{AppConfig, ConfigStore, ScanJob, ScanSettings, ScanSize, SessionState};
use scanmail_device::{ScannerDevice, ScannerDriver};
use scanmail_document::DocumentConverter;
use scanmail_notify::DocumentSender;
use tracing::{debug, info, warn};

use crate::prompt::Prompter;
use crate::selector;

/// Files produced by a completed session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub documents: Vec<PathBuf>,
    pub emailed: usize,
}

/// How a session ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// No default scanner is set or it is not attached.
    NoDevice,
    Completed(SessionReport),
}

/// Drives one scanning session against an injected driver and prompter.
pub struct ScanSession<'a> {
    config: &'a AppConfig,
    store: &'a ConfigStore,
    sender: Option<&'a dyn DocumentSender>,
    state: SessionState,
}

impl<'a> ScanSession<'a> {
    /// `sender` is `None` when no email settings are stored.
    pub fn new(
        config: &'a AppConfig,
        store: &'a ConfigStore,
        sender: Option<&'a dyn DocumentSender>,
    ) -> Self {
        Self {
            config,
            store,
            sender,
            state: SessionState::Idle,
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }

    /// Run the session to completion.
    pub fn run(
        &mut self,
        driver: &mut dyn ScannerDriver,
        prompter: &mut dyn Prompter,
    ) -> Result<SessionOutcome> {
        let Some(mut device) = selector::open_default_scanner(driver, self.store)? else {
            prompter.say("No scanner selected. Exiting...");
            return Ok(SessionOutcome::NoDevice);
        };
        info!(device = %device.descriptor().id, "scanning session started");

        let result = self.capture_loop(device.as_mut(), prompter);

        let closed = device.close();
        let released = driver.exit();
        self.transition(SessionState::Closed);

        let report = result?;
        closed?;
        released?;

        prompter.say(&format!("Total files scanned: {}", report.documents.len()));
        info!(
            documents = report.documents.len(),
            emailed = report.emailed,
            "scanning session finished"
        );
        Ok(SessionOutcome::Completed(report))
    }

    fn capture_loop(
        &mut self,
        device: &mut dyn ScannerDevice,
        prompter: &mut dyn Prompter,
    ) -> Result<SessionReport> {
        let size = select_scan_size(prompter)?;
        device.configure(&ScanSettings {
            mode: self.config.scan_mode,
            resolution_dpi: self.config.resolution_dpi,
            size,
        })?;
        self.transition(SessionState::DeviceReady);

        let prefix = ask_prefix(prompter)?;
        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir)?;

        if self.sender.is_none() {
            warn!("no email settings stored; documents will not be sent");
        }

        let converter = DocumentConverter::new(size);
        let mut report = SessionReport::default();

        loop {
            let job = ScanJob::new(prefix.as_str(), size).unused_in(output_dir);

            self.transition(SessionState::Scanning);
            prompter.say("Scanning document...");
            let page = device.scan()?;
            let raster = job.raster_path(output_dir);
            converter.save_raster(page, &raster)?;

            self.transition(SessionState::Converting);
            let conversion = converter.raster_to_pdf(&raster, &job.document_path(output_dir))?;
            let document = conversion.document_path;

            if let Some(sender) = self.sender {
                self.transition(SessionState::Sending);
                sender.send_document(&document)?;
                report.emailed += 1;
                prompter.say(&format!(
                    "Email with {} attached sent successfully to {}",
                    document.display(),
                    sender.recipient()
                ));
            }

            prompter.say(&format!("Scan complete. Saved as {}", document.display()));
            report.documents.push(document);

            self.transition(SessionState::AwaitingContinue);
            prompter.say(
                "Press 'e' to complete scanning session or any other key to continue scanning.",
            );
            let choice = prompter.ask("Enter your choice: ")?;
            if choice.trim().eq_ignore_ascii_case("e") {
                break;
            }
        }

        Ok(report)
    }
}

/// Ask for one of the fixed scan sizes until a valid choice is made.
pub fn select_scan_size(prompter: &mut dyn Prompter) -> Result<ScanSize> {
    loop {
        prompter.say("Select scan size:");
        for (idx, size) in ScanSize::ALL.iter().enumerate() {
            prompter.say(&format!("{}. {}", idx + 1, size.label()));
        }
        let answer = prompter.ask("Enter your choice: ")?;
        match answer.trim().parse::<u32>().ok().and_then(ScanSize::from_menu_choice) {
            Some(size) => return Ok(size),
            None => prompter.say("Invalid choice. Try again."),
        }
    }
}

/// Ask for the output file prefix; path separators are refused.
fn ask_prefix(prompter: &mut dyn Prompter) -> Result<String> {
    loop {
        let prefix = prompter.ask("Enter filename prefix: ")?;
        let prefix = prefix.trim();
        if prefix.contains(['/', '\\']) {
            prompter.say("The prefix cannot contain path separators. Try again.");
            continue;
        }
        return Ok(prefix.to_owned());
    }
}
