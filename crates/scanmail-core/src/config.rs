// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ScanMode;
use crate::error::{Result, ScanmailError};

/// Default settings file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Runtime settings passed explicitly into every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location of the persistent key/value settings file.
    pub config_path: PathBuf,
    /// Directory that receives raster and document files.
    pub output_dir: PathBuf,
    /// Colour mode requested from the scanner.
    pub scan_mode: ScanMode,
    /// Scan resolution in DPI.
    pub resolution_dpi: u32,
    /// Subject line of every outgoing email.
    pub email_subject: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            output_dir: PathBuf::from("."),
            scan_mode: ScanMode::Color,
            resolution_dpi: 300,
            email_subject: "Scanned Document".into(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the `SCANMAIL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup("SCANMAIL_CONFIG") {
            self.config_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("SCANMAIL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("SCANMAIL_SCAN_MODE") {
            self.scan_mode = ScanMode::from_name(mode.trim()).ok_or(
                ScanmailError::InvalidSetting {
                    key: "SCANMAIL_SCAN_MODE",
                    value: mode,
                },
            )?;
        }
        if let Some(dpi) = lookup("SCANMAIL_RESOLUTION") {
            self.resolution_dpi = dpi
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|dpi| *dpi > 0)
                .ok_or(ScanmailError::InvalidSetting {
                    key: "SCANMAIL_RESOLUTION",
                    value: dpi,
                })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_scan_workflow() {
        let config = AppConfig::default();
        assert_eq!(config.config_path, PathBuf::from("config.json"));
        assert_eq!(config.scan_mode, ScanMode::Color);
        assert_eq!(config.resolution_dpi, 300);
        assert_eq!(config.email_subject, "Scanned Document");
    }

    #[test]
    fn overrides_replace_paths() {
        let config = AppConfig::default()
            .with_overrides(|name| match name {
                "SCANMAIL_CONFIG" => Some("/etc/scanmail.json".into()),
                "SCANMAIL_OUTPUT_DIR" => Some(String::new()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.config_path, PathBuf::from("/etc/scanmail.json"));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn overrides_set_mode_and_resolution() {
        let config = AppConfig::default()
            .with_overrides(|name| match name {
                "SCANMAIL_SCAN_MODE" => Some("Grey".into()),
                "SCANMAIL_RESOLUTION" => Some("150".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.scan_mode, ScanMode::Gray);
        assert_eq!(config.resolution_dpi, 150);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = AppConfig::default()
            .with_overrides(|name| (name == "SCANMAIL_SCAN_MODE").then(|| "sepia".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ScanmailError::InvalidSetting { key: "SCANMAIL_SCAN_MODE", .. }
        ));
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let err = AppConfig::default()
            .with_overrides(|name| (name == "SCANMAIL_RESOLUTION").then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ScanmailError::InvalidSetting { key: "SCANMAIL_RESOLUTION", .. }
        ));
    }
}
