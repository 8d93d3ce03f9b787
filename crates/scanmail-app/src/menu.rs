// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Top-level numbered menu.

use scanmail_core::error::Result;
use scanmail_core::{AppConfig, ConfigKey, ConfigStore, EmailSettings};
use scanmail_core::email::parse_port;
use scanmail_device::ScannerDriver;
use scanmail_notify::{DocumentSender, Notifier};
use tracing::{debug, info};

use crate::prompt::Prompter;
use crate::selector;
use crate::session::{ScanSession, SessionOutcome};

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SetDefaultScanner,
    SetEmailConfig,
    StartSession,
    Exit,
}

impl MenuChoice {
    /// Parse the operator's answer; anything outside 1-4 is `None`.
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(Self::SetDefaultScanner),
            2 => Some(Self::SetEmailConfig),
            3 => Some(Self::StartSession),
            4 => Some(Self::Exit),
            _ => None,
        }
    }
}

fn show_menu(prompter: &mut dyn Prompter) {
    prompter.say("Selection an option:");
    prompter.say("1. Set default scanner");
    prompter.say("2. Set email configuration");
    prompter.say("3. Start a scanning session");
    prompter.say("4. Exit");
}

/// Loop over the menu until a session has run or the operator exits.
pub fn run_menu(
    config: &AppConfig,
    driver: &mut dyn ScannerDriver,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let store = ConfigStore::new(&config.config_path);

    loop {
        show_menu(prompter);
        let answer = prompter.ask("Enter your choice: ")?;
        let Some(choice) = MenuChoice::from_input(&answer) else {
            debug!(input = %answer.trim(), "unrecognised menu input");
            continue;
        };
        debug!(?choice, "menu choice");

        match choice {
            MenuChoice::SetDefaultScanner => {
                selector::set_default_scanner(driver, &store, prompter)?;
            }
            MenuChoice::SetEmailConfig => set_email_config(&store, prompter)?,
            MenuChoice::StartSession => {
                start_session(config, &store, driver, prompter)?;
                break;
            }
            MenuChoice::Exit => break,
        }
    }

    prompter.say("Exiting...");
    Ok(())
}

/// Prompt for every email setting, persisting each answer as it is given.
pub fn set_email_config(store: &ConfigStore, prompter: &mut dyn Prompter) -> Result<()> {
    for key in ConfigKey::EMAIL {
        let value = match key {
            ConfigKey::SmtpPort => ask_port(prompter)?.to_string(),
            ConfigKey::SmtpPassword => prompter.ask_secret(email_prompt(key))?,
            _ => prompter.ask(email_prompt(key))?.trim().to_owned(),
        };
        store.set_key(key, &value)?;
    }
    info!(path = %store.path().display(), "email configuration saved");
    Ok(())
}

fn email_prompt(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::EmailRecipient => "Enter email recipient: ",
        ConfigKey::EmailSender => "Enter email sender: ",
        ConfigKey::SmtpServer => "Enter SMTP server: ",
        ConfigKey::SmtpPort => "Enter SMTP TLS port: ",
        ConfigKey::SmtpUsername => "Enter SMTP username: ",
        ConfigKey::SmtpPassword => "Enter SMTP password: ",
        ConfigKey::DefaultDevice => "Enter scanner identifier: ",
    }
}

fn ask_port(prompter: &mut dyn Prompter) -> Result<u16> {
    loop {
        let answer = prompter.ask(email_prompt(ConfigKey::SmtpPort))?;
        match parse_port(&answer) {
            Ok(port) => return Ok(port),
            Err(_) => prompter.say("Invalid port. Enter a number between 1 and 65535."),
        }
    }
}

fn start_session(
    config: &AppConfig,
    store: &ConfigStore,
    driver: &mut dyn ScannerDriver,
    prompter: &mut dyn Prompter,
) -> Result<SessionOutcome> {
    if selector::find_default_scanner(driver, store)?.is_none() {
        prompter.say("No scanner selected. Exiting...");
        return Ok(SessionOutcome::NoDevice);
    }

    let notifier = match EmailSettings::load(store)? {
        Some(settings) => Some(Notifier::smtp(settings, config.email_subject.as_str())?),
        None => None,
    };
    let sender = notifier.as_ref().map(|n| n as &dyn DocumentSender);

    ScanSession::new(config, store, sender).run(driver, prompter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use scanmail_core::error::ScanmailError;
    use scanmail_device::MemoryDriver;

    fn config(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            config_path: dir.path().join("config.json"),
            output_dir: dir.path().join("out"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn choices_parse_within_range() {
        assert_eq!(MenuChoice::from_input("1"), Some(MenuChoice::SetDefaultScanner));
        assert_eq!(MenuChoice::from_input(" 4\n"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::from_input("0"), None);
        assert_eq!(MenuChoice::from_input("5"), None);
        assert_eq!(MenuChoice::from_input("exit"), None);
    }

    #[test]
    fn invalid_input_redisplays_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MemoryDriver::single();
        let mut prompter = ScriptedPrompter::new(["9", "scan", "4"]);

        run_menu(&config(&dir), &mut driver, &mut prompter).unwrap();

        let shown = prompter
            .transcript
            .iter()
            .filter(|line| *line == "Selection an option:")
            .count();
        assert_eq!(shown, 3);
        assert!(prompter.saw("Exiting..."));
    }

    #[test]
    fn email_settings_are_persisted_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let mut driver = MemoryDriver::single();
        let mut prompter = ScriptedPrompter::new([
            "2",
            "inbox@example.com",
            "scanner@example.com",
            "smtp.example.com",
            "not-a-port",
            "587",
            "scanner",
            "hunter2",
            "4",
        ]);

        run_menu(&cfg, &mut driver, &mut prompter).unwrap();

        let store = ConfigStore::new(&cfg.config_path);
        let settings = EmailSettings::load(&store).unwrap().unwrap();
        assert_eq!(settings.recipient, "inbox@example.com");
        assert_eq!(settings.sender, "scanner@example.com");
        assert_eq!(settings.smtp_host, "smtp.example.com");
        assert_eq!(settings.smtp_port, 587);
        assert_eq!(settings.smtp_username, "scanner");
        assert!(prompter.saw("Invalid port"));
    }

    #[test]
    fn scanner_choice_then_session_ends_menu() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let mut driver = MemoryDriver::single();
        let log = driver.log();
        let mut prompter = ScriptedPrompter::new(["1", "1", "3", "2", "memo", "e"]);

        run_menu(&cfg, &mut driver, &mut prompter).unwrap();

        assert!(prompter.saw("Default scanner set to Scanmail virtual flatbed"));
        assert!(prompter.saw("Total files scanned: 1"));
        assert_eq!(prompter.remaining(), 0);
        assert!(log.borrow().exited);
    }

    #[test]
    fn session_without_scanner_returns_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MemoryDriver::single();
        let mut prompter = ScriptedPrompter::new(["3"]);

        run_menu(&config(&dir), &mut driver, &mut prompter).unwrap();
        assert!(prompter.saw("No scanner selected. Exiting..."));
    }

    #[test]
    fn missing_scanner_is_reported_before_email_settings() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let store = ConfigStore::new(&cfg.config_path);
        store.set_key(ConfigKey::EmailRecipient, "inbox@example.com").unwrap();
        let mut driver = MemoryDriver::single();
        let log = driver.log();
        let mut prompter = ScriptedPrompter::new(["3"]);

        run_menu(&cfg, &mut driver, &mut prompter).unwrap();
        assert!(prompter.saw("No scanner selected. Exiting..."));
        assert_eq!(prompter.transcript.last().map(String::as_str), Some("Exiting..."));
        assert!(log.borrow().opened.is_empty());
    }

    #[test]
    fn partial_email_settings_abort_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let store = ConfigStore::new(&cfg.config_path);
        store.set_key(ConfigKey::DefaultDevice, "memory:0").unwrap();
        store.set_key(ConfigKey::EmailRecipient, "inbox@example.com").unwrap();
        let mut driver = MemoryDriver::single();
        let log = driver.log();
        let mut prompter = ScriptedPrompter::new(["3"]);

        let err = run_menu(&cfg, &mut driver, &mut prompter).unwrap_err();
        assert!(matches!(err, ScanmailError::MissingSetting(_)));
        assert!(log.borrow().opened.is_empty());
    }
}
