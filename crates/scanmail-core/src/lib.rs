// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanmail — Core types, error definitions, and the config store shared
// across all crates.

pub mod config;
pub mod email;
pub mod error;
pub mod human_errors;
pub mod store;
pub mod types;

pub use config::AppConfig;
pub use email::EmailSettings;
pub use error::ScanmailError;
pub use store::{ConfigKey, ConfigStore};
pub use types::*;
