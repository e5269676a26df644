// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Delay before scanning auto-resumes after a detection
    pub const RESUME_DELAY: Duration = Duration::from_millis(500);

    /// Duration of one overlay corner glide
    pub const CORNER_ANIMATION: Duration = Duration::from_millis(300);
}

/// Region-of-interest defaults, as fractions of the view dimensions
pub mod roi {
    /// Left edge fraction of view width
    pub const LEFT_FRACTION: f32 = 0.10;

    /// Top edge fraction of view height
    pub const TOP_FRACTION: f32 = 0.25;

    /// Right edge fraction of view width
    pub const RIGHT_FRACTION: f32 = 0.89;

    /// Bottom edge fraction of view height
    pub const BOTTOM_FRACTION: f32 = 0.65;
}

/// View defaults (the screen space the overlay renders into)
pub mod view {
    /// Default view width in logical pixels
    pub const DEFAULT_WIDTH: f32 = 360.0;

    /// Default view height in logical pixels
    pub const DEFAULT_HEIGHT: f32 = 800.0;
}

/// Decoder constants
pub mod detector {
    /// Maximum dimension for decode processing; larger frames are
    /// downscaled to this before the QR search
    pub const MAX_DECODE_DIMENSION: u32 = 640;
}

/// Event channel constants
pub mod channel {
    /// Decode event queue depth. Capacity 1 doubles as the reentrancy
    /// guard: an event arriving while the previous one is still queued
    /// is dropped.
    pub const DECODE_QUEUE_DEPTH: usize = 1;
}

/// Torch constants
pub mod torch {
    /// Default torch intensity (fraction of max brightness)
    pub const DEFAULT_INTENSITY: f32 = 1.0;
}

/// Supported file formats for the frame-directory source
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
