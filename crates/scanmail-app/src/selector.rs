// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Default scanner selection.
//
// Only the chosen identifier is persisted. Names and availability always come
// from a fresh device listing.

use scanmail_core::error::Result;
use scanmail_core::{ConfigKey, ConfigStore, DeviceDescriptor};
use scanmail_device::{ScannerDevice, ScannerDriver};
use tracing::{debug, info, warn};

use crate::prompt::Prompter;

/// List the attached scanners, ask for one, and persist its identifier.
///
/// Returns the chosen device, or `None` when nothing was persisted.
pub fn set_default_scanner(
    driver: &dyn ScannerDriver,
    store: &ConfigStore,
    prompter: &mut dyn Prompter,
) -> Result<Option<DeviceDescriptor>> {
    let devices = driver.list_devices()?;
    if devices.is_empty() {
        prompter.say("No scanners found.");
        return Ok(None);
    }

    prompter.say("Available scanners:");
    for (idx, device) in devices.iter().enumerate() {
        prompter.say(&format!("{}. {} ({})", idx + 1, device.id, device.name));
    }

    let answer = prompter.ask("Select a scanner: ")?;
    let chosen = answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| devices.get(idx));

    let Some(device) = chosen else {
        prompter.say("Invalid choice. Default scanner unchanged.");
        return Ok(None);
    };

    store.set_key(ConfigKey::DefaultDevice, &device.id)?;
    info!(device = %device.id, "default scanner saved");
    prompter.say(&format!("Default scanner set to {}", device.name));
    Ok(Some(device.clone()))
}

/// The persisted scanner, if it is currently attached.
pub fn find_default_scanner(
    driver: &dyn ScannerDriver,
    store: &ConfigStore,
) -> Result<Option<DeviceDescriptor>> {
    let Some(id) = store.get_key(ConfigKey::DefaultDevice)? else {
        debug!("no default scanner configured");
        return Ok(None);
    };

    let found = driver.list_devices()?.into_iter().find(|d| d.id == id);
    if found.is_none() {
        warn!(device = %id, "default scanner is not attached");
    }
    Ok(found)
}

/// Open the persisted scanner, or `None` if it is unset or absent.
pub fn open_default_scanner(
    driver: &mut dyn ScannerDriver,
    store: &ConfigStore,
) -> Result<Option<Box<dyn ScannerDevice>>> {
    match find_default_scanner(driver, store)? {
        Some(device) => Ok(Some(driver.open(&device)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use scanmail_device::MemoryDriver;

    fn two_scanners() -> MemoryDriver {
        MemoryDriver::new(vec![
            DeviceDescriptor {
                id: "epson2:libusb:001:004".into(),
                name: "Epson GT-F720".into(),
            },
            DeviceDescriptor {
                id: "hpaio:/usb/Deskjet".into(),
                name: "HP Deskjet".into(),
            },
        ])
    }

    fn store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        (dir, store)
    }

    #[test]
    fn choice_is_persisted_by_identifier() {
        let (_dir, store) = store();
        let driver = two_scanners();
        let mut prompter = ScriptedPrompter::new(["2"]);

        let chosen = set_default_scanner(&driver, &store, &mut prompter).unwrap();
        assert_eq!(chosen.unwrap().id, "hpaio:/usb/Deskjet");
        assert_eq!(
            store.get("SANE_DEFAULT_DEVICE").unwrap().as_deref(),
            Some("hpaio:/usb/Deskjet")
        );
        assert!(prompter.saw("1. epson2:libusb:001:004 (Epson GT-F720)"));
        assert!(prompter.saw("Default scanner set to HP Deskjet"));
    }

    #[test]
    fn out_of_range_choice_persists_nothing() {
        let (_dir, store) = store();
        let driver = two_scanners();

        for answer in ["0", "3", "two"] {
            let mut prompter = ScriptedPrompter::new([answer]);
            assert!(set_default_scanner(&driver, &store, &mut prompter)
                .unwrap()
                .is_none());
            assert!(prompter.saw("Invalid choice"));
        }
        assert!(!store.path().exists());
    }

    #[test]
    fn empty_listing_is_reported() {
        let (_dir, store) = store();
        let driver = MemoryDriver::new(Vec::new());
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        assert!(set_default_scanner(&driver, &store, &mut prompter)
            .unwrap()
            .is_none());
        assert!(prompter.saw("No scanners found."));
    }

    #[test]
    fn lookup_matches_live_device() {
        let (_dir, store) = store();
        store.set_key(ConfigKey::DefaultDevice, "epson2:libusb:001:004").unwrap();
        let mut driver = two_scanners();

        let found = find_default_scanner(&driver, &store).unwrap().unwrap();
        assert_eq!(found.name, "Epson GT-F720");

        let device = open_default_scanner(&mut driver, &store).unwrap().unwrap();
        assert_eq!(device.descriptor().id, "epson2:libusb:001:004");
    }

    #[test]
    fn lookup_without_config_is_no_device() {
        let (_dir, store) = store();
        let mut driver = two_scanners();
        assert!(find_default_scanner(&driver, &store).unwrap().is_none());
        assert!(open_default_scanner(&mut driver, &store).unwrap().is_none());
    }

    #[test]
    fn lookup_of_unplugged_device_is_no_device() {
        let (_dir, store) = store();
        store.set_key(ConfigKey::DefaultDevice, "genesys:libusb:002:007").unwrap();
        let mut driver = two_scanners();

        assert!(find_default_scanner(&driver, &store).unwrap().is_none());
        assert!(open_default_scanner(&mut driver, &store).unwrap().is_none());
        assert!(driver.log().borrow().opened.is_empty());
    }
}
