// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SANE backend driven through the `scanimage` front-end.
//
// Listing uses a formatted device list so the output is machine-readable.
// Captures are requested as PNM on stdout and decoded in memory; nothing is
// written to disk by the driver itself.
//
// Every `scanimage` run opens the device, captures, and releases it again, so
// nothing holds the scanner between captures. `open`, `close` and `exit` only
// track handle state here; a closed device or released driver refuses further
// calls.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use scanmail_core::error::{Result, ScanmailError};
use scanmail_core::types::{DeviceDescriptor, ScanSettings};
use tracing::{debug, info, instrument};

use crate::traits::{ScannerDevice, ScannerDriver};

/// Default front-end binary.
pub const SCANIMAGE: &str = "scanimage";

/// `%d` device name, `%v` vendor, `%m` model, `%n` newline.
const DEVICE_LIST_FORMAT: &str = "%d|%v %m%n";

/// Driver session backed by the `scanimage` command.
pub struct SaneDriver {
    program: PathBuf,
    released: bool,
}

impl SaneDriver {
    /// Initialise the backend, checking that `scanimage` can be run.
    pub fn init() -> Result<Self> {
        Self::with_program(SCANIMAGE)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Result<Self> {
        let program = program.into();
        let version = run(&program, &["--version".to_owned()])?;
        info!(
            program = %program.display(),
            version = %String::from_utf8_lossy(&version).trim(),
            "SANE backend initialised"
        );
        Ok(Self {
            program,
            released: false,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.released {
            return Err(ScanmailError::DriverReleased);
        }
        Ok(())
    }
}

impl ScannerDriver for SaneDriver {
    fn backend_name(&self) -> &str {
        "sane"
    }

    #[instrument(skip(self))]
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        self.ensure_active()?;
        let args = vec![format!("--formatted-device-list={DEVICE_LIST_FORMAT}")];
        let stdout = run(&self.program, &args)?;
        let devices = parse_device_list(&String::from_utf8_lossy(&stdout));
        debug!(count = devices.len(), "devices enumerated");
        Ok(devices)
    }

    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn ScannerDevice>> {
        self.ensure_active()?;
        info!(device = %device.id, "opening scanner");
        Ok(Box::new(SaneDevice {
            program: self.program.clone(),
            descriptor: device.clone(),
            settings: None,
            closed: false,
        }))
    }

    fn exit(&mut self) -> Result<()> {
        if !self.released {
            debug!("SANE backend released");
        }
        self.released = true;
        Ok(())
    }
}

/// A scanner opened through `scanimage`.
pub struct SaneDevice {
    program: PathBuf,
    descriptor: DeviceDescriptor,
    settings: Option<ScanSettings>,
    closed: bool,
}

impl ScannerDevice for SaneDevice {
    fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    fn configure(&mut self, settings: &ScanSettings) -> Result<()> {
        if self.closed {
            return Err(ScanmailError::Driver("device already closed".into()));
        }
        debug!(?settings, "scanner configured");
        self.settings = Some(settings.clone());
        Ok(())
    }

    #[instrument(skip(self), fields(device = %self.descriptor.id))]
    fn scan(&mut self) -> Result<DynamicImage> {
        if self.closed {
            return Err(ScanmailError::Driver("device already closed".into()));
        }
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| ScanmailError::Driver("scan requested before configure".into()))?;

        let args = capture_args(&self.descriptor.id, settings);
        let stdout = run(&self.program, &args)?;
        let image = image::load_from_memory_with_format(&stdout, ImageFormat::Pnm)
            .map_err(|e| ScanmailError::ImageError(format!("failed to decode scan: {e}")))?;

        info!(
            width = image.width(),
            height = image.height(),
            "page captured"
        );
        Ok(image)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            info!(device = %self.descriptor.id, "closing scanner");
        }
        self.closed = true;
        Ok(())
    }
}

/// Parse `scanimage --formatted-device-list` output.
pub(crate) fn parse_device_list(output: &str) -> Vec<DeviceDescriptor> {
    output
        .lines()
        .filter_map(|line| {
            let (id, name) = line.split_once('|')?;
            let id = id.trim();
            if id.is_empty() {
                return None;
            }
            let name = name.trim();
            Some(DeviceDescriptor {
                id: id.to_owned(),
                name: if name.is_empty() { id } else { name }.to_owned(),
            })
        })
        .collect()
}

/// Arguments for a single capture with the given settings.
pub(crate) fn capture_args(device_id: &str, settings: &ScanSettings) -> Vec<String> {
    let (left, top, right, bottom) = settings.bounding_box_mm();
    vec![
        format!("--device-name={device_id}"),
        "--mode".into(),
        settings.mode.sane_value().into(),
        "--resolution".into(),
        settings.resolution_dpi.to_string(),
        "-l".into(),
        left.to_string(),
        "-t".into(),
        top.to_string(),
        "-x".into(),
        (right - left).to_string(),
        "-y".into(),
        (bottom - top).to_string(),
        "--format=pnm".into(),
    ]
}

/// Run the front-end and return stdout, mapping failures to driver errors.
fn run(program: &Path, args: &[String]) -> Result<Vec<u8>> {
    debug!(program = %program.display(), ?args, "running scanner front-end");
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ScanmailError::Driver(format!("{} not installed: {e}", program.display()))
        } else {
            ScanmailError::Driver(format!("failed to run {}: {e}", program.display()))
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScanmailError::Driver(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            stderr.trim()
        )));
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmail_core::types::{ScanMode, ScanSize};

    #[test]
    fn device_list_parses_id_and_name() {
        let output = "epson2:libusb:001:004|Epson GT-F720\n\
                      hpaio:/usb/Deskjet_2540?serial=CN3|HP Deskjet_2540_series\n";
        let devices = parse_device_list(output);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "epson2:libusb:001:004");
        assert_eq!(devices[0].name, "Epson GT-F720");
        assert_eq!(devices[1].name, "HP Deskjet_2540_series");
    }

    #[test]
    fn device_list_skips_noise_and_blank_names() {
        let output = "\nNo scanners were identified.\ntest:0| \n";
        let devices = parse_device_list(output);
        assert_eq!(
            devices,
            vec![DeviceDescriptor {
                id: "test:0".into(),
                name: "test:0".into()
            }]
        );
    }

    #[test]
    fn capture_args_carry_mode_resolution_and_area() {
        let settings = ScanSettings {
            mode: ScanMode::Color,
            resolution_dpi: 300,
            size: ScanSize::Receipt,
        };
        let args = capture_args("test:0", &settings);
        assert_eq!(
            args,
            [
                "--device-name=test:0",
                "--mode",
                "Color",
                "--resolution",
                "300",
                "-l",
                "0",
                "-t",
                "0",
                "-x",
                "60",
                "-y",
                "190",
                "--format=pnm",
            ]
        );
    }

    /// Stand-in for `scanimage` answering the calls the driver makes.
    const FAKE_FRONT_END: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "scanimage (sane-backends) 1.2.1" ;;
  --formatted-device-list=*) printf 'fake:0|Acme Flatbed\nbroken:0|Jammed Feeder\n' ;;
  --device-name=broken:0) echo "scanimage: sane_start: Document feeder jammed" >&2; exit 9 ;;
  --device-name=*) printf 'P5\n4 2\n255\n'; printf '\377\377\377\377\000\000\000\000' ;;
  *) exit 1 ;;
esac
"#;

    fn fake_front_end(dir: &tempfile::TempDir) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("scanimage");
        std::fs::write(&path, FAKE_FRONT_END).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn front_end_lists_opens_and_captures() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = SaneDriver::with_program(fake_front_end(&dir)).unwrap();

        let devices = driver.list_devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "fake:0");
        assert_eq!(devices[0].name, "Acme Flatbed");

        let settings = ScanSettings {
            mode: ScanMode::Gray,
            resolution_dpi: 75,
            size: ScanSize::A6,
        };

        let mut scanner = driver.open(&devices[0]).unwrap();
        assert!(matches!(scanner.scan(), Err(ScanmailError::Driver(_))));
        scanner.configure(&settings).unwrap();
        let page = scanner.scan().unwrap();
        assert_eq!((page.width(), page.height()), (4, 2));
        let gray = page.to_luma8();
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
        assert_eq!(gray.get_pixel(3, 1).0, [0]);

        let mut jammed = driver.open(&devices[1]).unwrap();
        jammed.configure(&settings).unwrap();
        match jammed.scan() {
            Err(ScanmailError::Driver(detail)) => assert!(detail.contains("jammed"), "{detail}"),
            other => panic!("expected a driver error, got {:?}", other.map(|p| p.width())),
        }

        scanner.close().unwrap();
        assert!(matches!(scanner.scan(), Err(ScanmailError::Driver(_))));
        driver.exit().unwrap();
        assert!(matches!(
            driver.list_devices(),
            Err(ScanmailError::DriverReleased)
        ));
    }

    #[test]
    fn missing_front_end_is_a_driver_error() {
        match SaneDriver::with_program("/nonexistent/scanimage-for-tests") {
            Err(ScanmailError::Driver(detail)) => assert!(detail.contains("not installed")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("front-end should not exist"),
        }
    }
}
