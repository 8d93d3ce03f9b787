// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process scanner for dry runs and tests.
//
// Pages are rendered as a white sheet with a dark frame at the configured size.
// Every driver and device call is recorded in a shared log so callers can
// check that devices were configured and released.

use std::cell::RefCell;
use std::rc::Rc;

use image::{DynamicImage, Rgb, RgbImage};
use scanmail_core::error::{Result, ScanmailError};
use scanmail_core::types::{DeviceDescriptor, ScanSettings};
use tracing::{debug, warn};

use crate::traits::{ScannerDevice, ScannerDriver};

/// Rendering resolution cap; keeps simulated pages small.
const MAX_RENDER_DPI: u32 = 50;

/// Calls observed by a [`MemoryDriver`] and its devices.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriverLog {
    pub opened: Vec<String>,
    pub closed: Vec<String>,
    pub configured: Vec<ScanSettings>,
    pub scans: usize,
    pub exited: bool,
}

/// A scanner driver that lives entirely in memory.
pub struct MemoryDriver {
    devices: Vec<DeviceDescriptor>,
    log: Rc<RefCell<DriverLog>>,
    /// Fail every capture after this many successful ones.
    fail_after: Option<usize>,
    released: bool,
}

impl MemoryDriver {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            devices,
            log: Rc::new(RefCell::new(DriverLog::default())),
            fail_after: None,
            released: false,
        }
    }

    /// A driver exposing a single simulated flatbed.
    pub fn single() -> Self {
        Self::new(vec![DeviceDescriptor {
            id: "memory:0".into(),
            name: "Scanmail virtual flatbed".into(),
        }])
    }

    /// Make captures fail once `successes` pages have been produced.
    pub fn failing_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    /// Shared handle to the call log.
    pub fn log(&self) -> Rc<RefCell<DriverLog>> {
        Rc::clone(&self.log)
    }
}

impl ScannerDriver for MemoryDriver {
    fn backend_name(&self) -> &str {
        "memory"
    }

    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        if self.released {
            return Err(ScanmailError::DriverReleased);
        }
        Ok(self.devices.clone())
    }

    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn ScannerDevice>> {
        if self.released {
            return Err(ScanmailError::DriverReleased);
        }
        if !self.devices.iter().any(|d| d.id == device.id) {
            return Err(ScanmailError::DeviceNotFound(device.id.clone()));
        }
        self.log.borrow_mut().opened.push(device.id.clone());
        Ok(Box::new(MemoryDevice {
            descriptor: device.clone(),
            log: Rc::clone(&self.log),
            settings: None,
            fail_after: self.fail_after,
            closed: false,
        }))
    }

    fn exit(&mut self) -> Result<()> {
        self.released = true;
        self.log.borrow_mut().exited = true;
        Ok(())
    }
}

/// A simulated scanner handed out by [`MemoryDriver`].
pub struct MemoryDevice {
    descriptor: DeviceDescriptor,
    log: Rc<RefCell<DriverLog>>,
    settings: Option<ScanSettings>,
    fail_after: Option<usize>,
    closed: bool,
}

impl ScannerDevice for MemoryDevice {
    fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    fn configure(&mut self, settings: &ScanSettings) -> Result<()> {
        if self.closed {
            return Err(ScanmailError::Driver("device already closed".into()));
        }
        self.settings = Some(settings.clone());
        self.log.borrow_mut().configured.push(settings.clone());
        Ok(())
    }

    fn scan(&mut self) -> Result<DynamicImage> {
        if self.closed {
            return Err(ScanmailError::Driver("device already closed".into()));
        }
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| ScanmailError::Driver("scan requested before configure".into()))?;

        let done = self.log.borrow().scans;
        if self.fail_after.is_some_and(|limit| done >= limit) {
            warn!(device = %self.descriptor.id, "simulated capture failure");
            return Err(ScanmailError::Driver("simulated paper jam: document feeder".into()));
        }

        let page = render_page(settings);
        self.log.borrow_mut().scans += 1;
        debug!(width = page.width(), height = page.height(), "simulated page captured");
        Ok(page)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.log.borrow_mut().closed.push(self.descriptor.id.clone());
        }
        Ok(())
    }
}

fn render_page(settings: &ScanSettings) -> DynamicImage {
    let dpi = settings.resolution_dpi.clamp(1, MAX_RENDER_DPI) as f32;
    let (w_mm, h_mm) = settings.size.dimensions_mm();
    let width = ((w_mm as f32 / 25.4) * dpi).round().max(1.0) as u32;
    let height = ((h_mm as f32 / 25.4) * dpi).round().max(1.0) as u32;
    let border = (width.min(height) / 20).max(1);

    let page = RgbImage::from_fn(width, height, |x, y| {
        let edge = x < border || y < border || x >= width - border || y >= height - border;
        if edge { Rgb([40, 40, 40]) } else { Rgb([250, 250, 250]) }
    });
    DynamicImage::ImageRgb8(page)
}
