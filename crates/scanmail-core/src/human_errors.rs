// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the person at the scanner.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing in Scanmail retries on its own, so the severity only tells the
// operator whether running the step again could help.

use crate::error::ScanmailError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or busy device: running the step again may work.
    Transient,
    /// The operator must do something first (select a scanner, fix a setting).
    ActionRequired,
    /// Cannot be fixed by trying again.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.message, self.suggestion)
    }
}

fn human(message: &str, suggestion: impl Into<String>, severity: Severity) -> HumanError {
    HumanError {
        message: message.into(),
        suggestion: suggestion.into(),
        severity,
    }
}

/// Convert a `ScanmailError` into a `HumanError` for the terminal.
pub fn humanize_error(err: &ScanmailError) -> HumanError {
    match err {
        // -- Configuration --
        ScanmailError::ConfigNotFound(_) => human(
            "Nothing has been configured yet.",
            "Choose \"Set default scanner\" and \"Set email configuration\" from the menu first.",
            Severity::ActionRequired,
        ),

        ScanmailError::MissingSetting(key) => human(
            "The email configuration is incomplete.",
            format!("Choose \"Set email configuration\" and fill in every answer. ({key} is missing)"),
            Severity::ActionRequired,
        ),

        ScanmailError::InvalidSetting { key, value } => human(
            "A saved setting doesn't look right.",
            format!("Enter the setting again from the menu. ({key} = {value:?})"),
            Severity::ActionRequired,
        ),

        // -- Scanner --
        ScanmailError::Driver(detail) => humanize_driver_error(detail),

        ScanmailError::DeviceNotFound(id) => human(
            "The chosen scanner isn't connected.",
            format!("Check the scanner is switched on and plugged in, or choose another one. ({id})"),
            Severity::ActionRequired,
        ),

        ScanmailError::NoDeviceSelected => human(
            "No scanner selected.",
            "Choose \"Set default scanner\" from the menu, then start the session again.",
            Severity::ActionRequired,
        ),

        ScanmailError::DriverReleased => human(
            "The scanner connection was already closed.",
            "Start Scanmail again.",
            Severity::Permanent,
        ),

        // -- Document --
        ScanmailError::ImageError(_) => human(
            "The scanned image couldn't be read.",
            "Scan the page again. If this keeps happening, try a different colour mode.",
            Severity::Transient,
        ),

        ScanmailError::PdfError(_) => human(
            "The PDF couldn't be created.",
            "Scan the page again. The scanned image has been kept next to the PDF.",
            Severity::Transient,
        ),

        // -- Mail --
        ScanmailError::InvalidAddress { address, .. } => human(
            "An email address doesn't look right.",
            format!("Enter the email configuration again. ({address})"),
            Severity::ActionRequired,
        ),

        ScanmailError::MessageBuild(_) => human(
            "The email couldn't be put together.",
            "Check the document still exists and try again.",
            Severity::Permanent,
        ),

        ScanmailError::Smtp(detail) => humanize_smtp_error(detail),

        // -- Terminal --
        ScanmailError::Prompt(_) => human(
            "The terminal stopped answering.",
            "Run Scanmail from an interactive terminal.",
            Severity::Permanent,
        ),

        // -- Storage --
        ScanmailError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => human(
                "A file couldn't be found.",
                "It may have been moved or deleted. Check the output folder and try again.",
                Severity::ActionRequired,
            ),
            std::io::ErrorKind::PermissionDenied => human(
                "Scanmail doesn't have permission to write there.",
                "Run Scanmail from a folder you can write to.",
                Severity::ActionRequired,
            ),
            _ => human(
                "There was a problem reading or writing a file.",
                "Try again. If this keeps happening, the disk may be full.",
                Severity::Transient,
            ),
        },

        ScanmailError::Serialization(_) => human(
            "The configuration file is damaged.",
            "Fix or delete config.json, then enter the settings again from the menu.",
            Severity::ActionRequired,
        ),

        ScanmailError::PlatformUnavailable => human(
            "Scanning isn't available on this computer.",
            "Install SANE (the scanimage command) and try again.",
            Severity::Permanent,
        ),
    }
}

/// Parse driver error details into human-readable messages.
fn humanize_driver_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("device busy") {
        human(
            "The scanner is busy.",
            "Wait for the scanner to finish, then try again.",
            Severity::Transient,
        )
    } else if lower.contains("no such file") || lower.contains("not installed") {
        human(
            "The scanner software isn't installed.",
            "Install SANE (the scanimage command) and try again.",
            Severity::Permanent,
        )
    } else if lower.contains("document feeder") || lower.contains("jammed") {
        human(
            "The paper didn't feed through the scanner.",
            "Clear the feeder, reload the page, and try again.",
            Severity::ActionRequired,
        )
    } else {
        human(
            "The scanner reported a problem.",
            format!("Switch the scanner off and on again, then retry. (Detail: {detail})"),
            Severity::Transient,
        )
    }
}

/// Parse SMTP error details into human-readable messages.
fn humanize_smtp_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("authentication") || lower.contains("535") {
        human(
            "The mail server rejected the username or password.",
            "Enter the email configuration again with the right login.",
            Severity::ActionRequired,
        )
    } else if lower.contains("connection refused") || lower.contains("timed out") {
        human(
            "The mail server couldn't be reached.",
            "Check the SMTP server name, port, and your network connection. The PDF was still saved.",
            Severity::Transient,
        )
    } else if lower.contains("tls") || lower.contains("certificate") {
        human(
            "A secure connection to the mail server couldn't be set up.",
            "Check that the port supports STARTTLS (usually 587).",
            Severity::ActionRequired,
        )
    } else {
        human(
            "The email couldn't be sent.",
            format!("The PDF was still saved. Try sending it yourself. (Detail: {detail})"),
            Severity::Transient,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_device_is_action_required() {
        let human = humanize_error(&ScanmailError::NoDeviceSelected);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("Set default scanner"));
    }

    #[test]
    fn smtp_auth_failure_asks_for_new_login() {
        let err = ScanmailError::Smtp("permanent error (535): authentication failed".into());
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn smtp_timeout_is_transient() {
        let err = ScanmailError::Smtp("network error: connection timed out".into());
        assert_eq!(humanize_error(&err).severity, Severity::Transient);
    }

    #[test]
    fn busy_scanner_is_transient() {
        let err = ScanmailError::Driver("scanimage: open of device failed: Device busy".into());
        assert_eq!(humanize_error(&err).severity, Severity::Transient);
    }

    #[test]
    fn missing_setting_names_the_key() {
        let human = humanize_error(&ScanmailError::MissingSetting("SMTP_SERVER"));
        assert!(human.suggestion.contains("SMTP_SERVER"));
    }

    #[test]
    fn unavailable_platform_is_permanent() {
        let human = humanize_error(&ScanmailError::PlatformUnavailable);
        assert_eq!(human.severity, Severity::Permanent);
    }
}
