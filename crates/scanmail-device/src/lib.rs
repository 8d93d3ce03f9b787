// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanmail-device — Scanner driver abstractions.
//
// The traits let the workflow drive a real scanner through SANE or a
// simulated one in memory, selected once at startup.

pub mod memory;
pub mod traits;

#[cfg(unix)]
pub mod sane;

use scanmail_core::error::{Result, ScanmailError};

pub use memory::MemoryDriver;
pub use traits::{ScannerDevice, ScannerDriver};

/// Which backend to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// Real hardware through the SANE `scanimage` front-end.
    Sane,
    /// Simulated flatbed for dry runs.
    Memory,
}

impl DriverKind {
    /// Parse the `SCANMAIL_DRIVER` value; unset means SANE.
    pub fn from_setting(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("sane") => Ok(Self::Sane),
            Some("memory") => Ok(Self::Memory),
            Some(_) => Err(ScanmailError::InvalidSetting {
                key: "SCANMAIL_DRIVER",
                value: value.unwrap_or_default().to_owned(),
            }),
        }
    }
}

/// Initialise the driver session for `kind`.
pub fn scanner_driver(kind: DriverKind) -> Result<Box<dyn ScannerDriver>> {
    match kind {
        DriverKind::Memory => Ok(Box::new(MemoryDriver::single())),
        DriverKind::Sane => {
            #[cfg(unix)]
            {
                Ok(Box::new(sane::SaneDriver::init()?))
            }
            #[cfg(not(unix))]
            {
                Err(ScanmailError::PlatformUnavailable)
            }
        }
    }
}
