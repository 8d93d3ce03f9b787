// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed view over the email entries of the config store.

use secrecy::SecretString;

use crate::error::{Result, ScanmailError};
use crate::store::{ConfigKey, ConfigStore};

/// Everything needed to deliver a scanned document by SMTP.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub sender: String,
    pub recipient: String,
    pub smtp_host: String,
    /// STARTTLS submission port, usually 587.
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
}

impl EmailSettings {
    /// Read the email settings from `store`.
    ///
    /// Returns `Ok(None)` when no email key has ever been stored, and
    /// [`ScanmailError::MissingSetting`] when only some of them have.
    pub fn load(store: &ConfigStore) -> Result<Option<Self>> {
        let entries = match store.load() {
            Ok(entries) => entries,
            Err(ScanmailError::ConfigNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        if ConfigKey::EMAIL
            .iter()
            .all(|key| !entries.contains_key(key.as_str()))
        {
            return Ok(None);
        }

        let require = |key: ConfigKey| -> Result<String> {
            entries
                .get(key.as_str())
                .filter(|value| !value.trim().is_empty())
                .cloned()
                .ok_or(ScanmailError::MissingSetting(key.as_str()))
        };

        let port = require(ConfigKey::SmtpPort)?;
        Ok(Some(Self {
            sender: require(ConfigKey::EmailSender)?,
            recipient: require(ConfigKey::EmailRecipient)?,
            smtp_host: require(ConfigKey::SmtpServer)?,
            smtp_port: parse_port(&port)?,
            smtp_username: require(ConfigKey::SmtpUsername)?,
            smtp_password: SecretString::from(require(ConfigKey::SmtpPassword)?),
        }))
    }
}

/// Parse an SMTP port as entered by the operator.
pub fn parse_port(value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| ScanmailError::InvalidSetting {
            key: ConfigKey::SmtpPort.as_str(),
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn write_all(store: &ConfigStore) {
        store.set_key(ConfigKey::EmailRecipient, "inbox@example.com").unwrap();
        store.set_key(ConfigKey::EmailSender, "scanner@example.com").unwrap();
        store.set_key(ConfigKey::SmtpServer, "smtp.example.com").unwrap();
        store.set_key(ConfigKey::SmtpPort, "587").unwrap();
        store.set_key(ConfigKey::SmtpUsername, "scanner").unwrap();
        store.set_key(ConfigKey::SmtpPassword, "hunter2").unwrap();
    }

    #[test]
    fn complete_settings_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        write_all(&store);

        let settings = EmailSettings::load(&store).unwrap().unwrap();
        assert_eq!(settings.smtp_host, "smtp.example.com");
        assert_eq!(settings.smtp_port, 587);
        assert_eq!(settings.recipient, "inbox@example.com");
        assert_eq!(settings.smtp_password.expose_secret(), "hunter2");
    }

    #[test]
    fn no_file_means_no_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert!(EmailSettings::load(&store).unwrap().is_none());
    }

    #[test]
    fn device_only_config_means_no_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.set_key(ConfigKey::DefaultDevice, "test:0").unwrap();
        assert!(EmailSettings::load(&store).unwrap().is_none());
    }

    #[test]
    fn partial_settings_name_the_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.set_key(ConfigKey::EmailRecipient, "inbox@example.com").unwrap();

        match EmailSettings::load(&store) {
            Err(ScanmailError::MissingSetting(key)) => assert_eq!(key, "SMTP_TLS_PORT"),
            other => panic!("expected MissingSetting, got {other:?}"),
        }
    }

    #[test]
    fn bad_port_is_rejected() {
        assert_eq!(parse_port(" 465 ").unwrap(), 465);
        assert!(parse_port("smtp").is_err());
        assert!(parse_port("0").is_err());
        assert!(parse_port("70000").is_err());
    }
}
