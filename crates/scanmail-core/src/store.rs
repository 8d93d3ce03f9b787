// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flat key/value settings persisted as a single JSON object.
//
// Every write loads the whole file, replaces one key, and rewrites the whole
// file. There is no locking: one operator, one process.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{Result, ScanmailError};

/// Keys understood by Scanmail. The strings match existing `config.json` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    DefaultDevice,
    EmailRecipient,
    EmailSender,
    SmtpServer,
    SmtpPort,
    SmtpUsername,
    SmtpPassword,
}

impl ConfigKey {
    /// The email-related keys, in prompt order.
    pub const EMAIL: [ConfigKey; 6] = [
        Self::EmailRecipient,
        Self::EmailSender,
        Self::SmtpServer,
        Self::SmtpPort,
        Self::SmtpUsername,
        Self::SmtpPassword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultDevice => "SANE_DEFAULT_DEVICE",
            Self::EmailRecipient => "EMAIL_RECIPIENT",
            Self::EmailSender => "EMAIL_SENDER",
            Self::SmtpServer => "SMTP_SERVER",
            Self::SmtpPort => "SMTP_TLS_PORT",
            Self::SmtpUsername => "SMTP_USERNAME",
            Self::SmtpPassword => "SMTP_PASSWORD",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to the settings file. Holds only the path; nothing is cached.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `value` under `key`, rewriting the whole file.
    ///
    /// A missing file starts from an empty mapping. Unrelated keys survive.
    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(ScanmailError::ConfigNotFound(_)) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, json)?;
        debug!(entries = entries.len(), "config written");
        Ok(())
    }

    /// Read `key` from the file.
    ///
    /// Fails with [`ScanmailError::ConfigNotFound`] when the file does not exist.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    /// Like [`get`](Self::get), but a missing file reads as an unset key.
    pub fn get_optional(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            Err(ScanmailError::ConfigNotFound(_)) => Ok(None),
            other => other,
        }
    }

    pub fn set_key(&self, key: ConfigKey, value: &str) -> Result<()> {
        self.set(key.as_str(), value)
    }

    pub fn get_key(&self, key: ConfigKey) -> Result<Option<String>> {
        self.get_optional(key.as_str())
    }

    /// Load the whole mapping.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScanmailError::ConfigNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }
}
