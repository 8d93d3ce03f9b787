// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend-agnostic trait definitions for scanner access.
//
// A driver is the session with the scanning library; a device is one opened
// scanner obtained from it. Both are released with explicit calls.

use image::DynamicImage;
use scanmail_core::error::Result;
use scanmail_core::types::{DeviceDescriptor, ScanSettings};

/// Session with the scanner control library.
pub trait ScannerDriver {
    /// Short backend name for logs (e.g. "sane", "memory").
    fn backend_name(&self) -> &str;

    /// Enumerate the scanners currently attached.
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>>;

    /// Open a scanner for exclusive use.
    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn ScannerDevice>>;

    /// Release the driver. Further calls fail with `DriverReleased`.
    fn exit(&mut self) -> Result<()>;
}

/// One opened scanner.
pub trait ScannerDevice {
    fn descriptor(&self) -> &DeviceDescriptor;

    /// Apply mode, resolution and scan area for subsequent captures.
    fn configure(&mut self, settings: &ScanSettings) -> Result<()>;

    /// Capture one page. Blocks until the scanner returns the image.
    fn scan(&mut self) -> Result<DynamicImage>;

    /// Release the scanner. Calling it twice is harmless.
    fn close(&mut self) -> Result<()>;
}
