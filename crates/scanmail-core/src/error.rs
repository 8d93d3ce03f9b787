// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanmail.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Scanmail operations.
#[derive(Debug, Error)]
pub enum ScanmailError {
    // -- Configuration --
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("setting {0} is not configured")]
    MissingSetting(&'static str),

    #[error("setting {key} has an invalid value: {value:?}")]
    InvalidSetting { key: &'static str, value: String },

    // -- Scanner --
    #[error("scanner driver error: {0}")]
    Driver(String),

    #[error("scanner device not found: {0}")]
    DeviceNotFound(String),

    #[error("no scanner selected")]
    NoDeviceSelected,

    #[error("scanner driver already released")]
    DriverReleased,

    // -- Document --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Mail --
    #[error("invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build email: {0}")]
    MessageBuild(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    // -- Terminal --
    #[error("prompt failed: {0}")]
    Prompt(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanmailError>;
