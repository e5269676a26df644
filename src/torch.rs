// SPDX-License-Identifier: GPL-3.0-only

//! Torch (flashlight) control via Linux sysfs
//!
//! Discovers flash LEDs exposed at `/sys/class/leds/*:flash` and drives
//! them in torch mode through the group-writable `brightness` file,
//! avoiding the root-only strobe interface.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A torch-capable LED discovered via sysfs
#[derive(Debug, Clone)]
pub struct TorchDevice {
    /// Sysfs path, e.g. `/sys/class/leds/white:flash`
    path: PathBuf,
    /// Maximum brightness value (from `max_brightness` file)
    max_brightness: u32,
    /// Human-readable name (directory basename)
    name: String,
}

impl TorchDevice {
    /// Get the device name (e.g. "white:flash")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set raw brightness value (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> io::Result<()> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.path.join("brightness"), clamped.to_string())
    }

    /// Turn on at a fraction of max brightness (0.0 = off, 1.0 = full)
    pub fn on(&self, intensity: f32) -> io::Result<()> {
        let clamped = intensity.clamp(0.0, 1.0);
        let value = (clamped * self.max_brightness as f32).round() as u32;
        self.set_brightness(value)
    }

    /// Turn off the LED
    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }
}

/// Result of torch hardware detection.
///
/// Separates "hardware exists" from "we can control it" so callers can
/// surface a permission message instead of silently hiding the control.
pub struct TorchHardware {
    /// Devices we can actually control (writable)
    pub devices: Vec<TorchDevice>,
    /// User-facing error if hardware was found but not writable
    pub permission_error: Option<String>,
}

impl TorchHardware {
    /// Scan `/sys/class/leds/` for `*:flash` entries.
    ///
    /// Missing hardware is not an error; the scan just comes back empty.
    pub fn detect() -> TorchHardware {
        let leds_dir = Path::new("/sys/class/leds");
        let Ok(entries) = std::fs::read_dir(leds_dir) else {
            warn!("Cannot read /sys/class/leds — torch discovery skipped");
            return TorchHardware {
                devices: Vec::new(),
                permission_error: None,
            };
        };

        let mut devices = Vec::new();
        let mut unwritable = Vec::new();

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name_str) = name.to_str() else {
                continue;
            };

            // Match entries like "white:flash", "yellow:flash"
            if !name_str.ends_with(":flash") {
                continue;
            }

            let led_path = entry.path();
            let brightness_path = led_path.join("brightness");
            let max_brightness_path = led_path.join("max_brightness");

            let max_brightness = match std::fs::read_to_string(&max_brightness_path) {
                Ok(s) => match s.trim().parse::<u32>() {
                    Ok(v) if v > 0 => v,
                    _ => {
                        warn!(
                            path = %max_brightness_path.display(),
                            "Invalid max_brightness value"
                        );
                        continue;
                    }
                },
                Err(e) => {
                    warn!(
                        path = %max_brightness_path.display(),
                        error = %e,
                        "Cannot read max_brightness"
                    );
                    continue;
                }
            };

            match std::fs::OpenOptions::new()
                .write(true)
                .open(&brightness_path)
            {
                Ok(_) => {
                    info!(name = name_str, max_brightness, "Discovered torch LED");
                    devices.push(TorchDevice {
                        path: led_path,
                        max_brightness,
                        name: name_str.to_string(),
                    });
                }
                Err(_) => {
                    warn!(
                        path = %brightness_path.display(),
                        "Torch LED found but not writable"
                    );
                    unwritable.push(name_str.to_string());
                }
            }
        }

        // Deterministic ordering (white before yellow)
        devices.sort_by(|a, b| a.name.cmp(&b.name));

        let permission_error = if devices.is_empty() && !unwritable.is_empty() {
            Some(build_permission_error(&unwritable))
        } else {
            None
        };

        TorchHardware {
            devices,
            permission_error,
        }
    }

    /// Whether any controllable torch devices were found
    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }
}

/// Build a user-friendly permission error message.
fn build_permission_error(names: &[String]) -> String {
    let username = std::env::var("USER").unwrap_or_else(|_| "user".to_string());

    let escalation_tool = if Path::new("/usr/bin/doas").exists() {
        "doas"
    } else {
        "sudo"
    };

    format!(
        "Torch LEDs detected ({}) but cannot be controlled.\n\n\
         Run: {escalation_tool} adduser {username} feedbackd\n\n\
         Then log out and back in.",
        names.join(", ")
    )
}

/// Turn on all discovered torch devices at the given intensity
pub fn all_on(devices: &[TorchDevice], intensity: f32) {
    for dev in devices {
        if let Err(e) = dev.on(intensity) {
            warn!(device = %dev.name, error = %e, "Failed to turn on torch LED");
        }
    }
}

/// Turn off all discovered torch devices
pub fn all_off(devices: &[TorchDevice]) {
    for dev in devices {
        if let Err(e) = dev.off() {
            warn!(device = %dev.name, error = %e, "Failed to turn off torch LED");
        }
    }
}
