// SPDX-License-Identifier: GPL-3.0-only

//! User configuration handling
//!
//! Stored as JSON under the user config directory. A missing file yields
//! the defaults; a malformed file is a configuration error rather than a
//! panic.

use crate::constants::{detector, timing, torch, view};
use crate::errors::{ScanError, ScanResult};
use crate::overlay::{ContentFit, ViewSettings};
use crate::roi::{RegionOfInterest, RoiFractions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// View width in logical pixels (the screen space the overlay lives in)
    pub view_width: f32,
    /// View height in logical pixels
    pub view_height: f32,
    /// Region-of-interest insets as view fractions
    pub roi: RoiFractions,
    /// Delay before scanning auto-resumes after a detection, in ms
    pub resume_delay_ms: u64,
    /// Duration of one overlay corner glide, in ms
    pub animation_duration_ms: u64,
    /// How the camera frame is fitted into the view
    pub content_fit: ContentFit,
    /// Mirror the preview horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Maximum dimension for decode processing
    pub max_decode_dimension: u32,
    /// Torch intensity as a fraction of max brightness
    pub torch_intensity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view_width: view::DEFAULT_WIDTH,
            view_height: view::DEFAULT_HEIGHT,
            roi: RoiFractions::default(),
            resume_delay_ms: timing::RESUME_DELAY.as_millis() as u64,
            animation_duration_ms: timing::CORNER_ANIMATION.as_millis() as u64,
            content_fit: ContentFit::default(), // Cover, matching the preview
            mirror_preview: false,
            max_decode_dimension: detector::MAX_DECODE_DIMENSION,
            torch_intensity: torch::DEFAULT_INTENSITY,
        }
    }
}

impl Config {
    /// Auto-resume delay as a [`Duration`]
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    /// Corner animation duration as a [`Duration`]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// The session's region of interest, in screen space
    pub fn region_of_interest(&self) -> RegionOfInterest {
        RegionOfInterest::from_fractions(&self.roi, self.view_width, self.view_height)
    }

    /// The session's view settings
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            width: self.view_width,
            height: self.view_height,
            content_fit: self.content_fit,
            mirrored: self.mirror_preview,
        }
    }

    /// Path of the on-disk config file, if a config directory exists
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qrscan").join("config.json"))
    }

    /// Load the config from disk, falling back to defaults when absent
    pub fn load() -> ScanResult<Config> {
        let Some(path) = Self::path() else {
            return Ok(Config::default());
        };
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Persist the config to disk
    pub fn save(&self) -> ScanResult<()> {
        let Some(path) = Self::path() else {
            return Err(ScanError::Config("no config directory available".to_string()));
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }
}
