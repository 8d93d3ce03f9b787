// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanmail workflow.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// File extension of the raster intermediate.
pub const RASTER_EXTENSION: &str = "jpg";

/// File extension of the converted document.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Timestamp layout used in output file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The fixed scan area presets offered to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanSize {
    A4,
    A5,
    A6,
    /// Long, narrow fuel-station receipt.
    Receipt,
}

impl ScanSize {
    /// All presets in menu order.
    pub const ALL: [ScanSize; 4] = [Self::A4, Self::A5, Self::A6, Self::Receipt];

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::A6 => (105, 148),
            Self::Receipt => (60, 190),
        }
    }

    /// Label shown in the size menu.
    pub fn label(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::A6 => "A6",
            Self::Receipt => "Shell Malaysia Receipt",
        }
    }

    /// Map a 1-based menu choice to a preset.
    pub fn from_menu_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::A4),
            2 => Some(Self::A5),
            3 => Some(Self::A6),
            4 => Some(Self::Receipt),
            _ => None,
        }
    }
}

/// Colour mode requested from the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    Color,
    Gray,
    Lineart,
}

impl ScanMode {
    /// SANE `--mode` option value.
    pub fn sane_value(&self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Gray => "Gray",
            Self::Lineart => "Lineart",
        }
    }

    /// Parse a mode name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "color" | "colour" => Some(Self::Color),
            "gray" | "grey" => Some(Self::Gray),
            "lineart" => Some(Self::Lineart),
            _ => None,
        }
    }
}

/// Settings applied to an open device before capturing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub mode: ScanMode,
    pub resolution_dpi: u32,
    /// Bottom-right corner of the scan area; the top-left is the origin.
    pub size: ScanSize,
}

impl ScanSettings {
    /// Bounding box as (top-left x, top-left y, bottom-right x, bottom-right y) in mm.
    pub fn bounding_box_mm(&self) -> (u32, u32, u32, u32) {
        let (width, height) = self.size.dimensions_mm();
        (0, 0, width, height)
    }
}

/// A scanner reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Driver-level identifier, e.g. `epson2:libusb:001:004`.
    pub id: String,
    /// Human-readable vendor and model.
    pub name: String,
}

/// One iteration of a scanning session: where its files go and what they're called.
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub prefix: String,
    pub timestamp: DateTime<Local>,
    pub size: ScanSize,
    /// Disambiguates jobs started within the same second.
    pub sequence: Option<u32>,
}

impl ScanJob {
    /// Create a job stamped with the current local time.
    pub fn new(prefix: impl Into<String>, size: ScanSize) -> Self {
        Self::at(prefix, size, Local::now())
    }

    pub fn at(prefix: impl Into<String>, size: ScanSize, timestamp: DateTime<Local>) -> Self {
        Self {
            prefix: prefix.into(),
            timestamp,
            size,
            sequence: None,
        }
    }

    /// The first job name in `dir` whose raster and document are both unused.
    pub fn unused_in(mut self, dir: &Path) -> Self {
        let mut next = 2;
        while self.raster_path(dir).exists() || self.document_path(dir).exists() {
            self.sequence = Some(next);
            next += 1;
        }
        self
    }

    /// `<prefix>_<YYYYMMDD_HHMMSS>`, with `_<n>` appended after a collision.
    pub fn base_name(&self) -> String {
        let stamp = self.timestamp.format(TIMESTAMP_FORMAT);
        match self.sequence {
            Some(n) => format!("{}_{}_{}", self.prefix, stamp, n),
            None => format!("{}_{}", self.prefix, stamp),
        }
    }

    pub fn raster_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.base_name(), RASTER_EXTENSION))
    }

    pub fn document_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.base_name(), DOCUMENT_EXTENSION))
    }
}

/// Lifecycle states of a scanning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    /// Device opened and configured.
    DeviceReady,
    Scanning,
    Converting,
    Sending,
    /// Waiting for the operator to continue or stop.
    AwaitingContinue,
    /// Device closed and driver released.
    Closed,
}
