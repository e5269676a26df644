// SPDX-License-Identifier: MPL-2.0

//! Error types for the scan application
//!
//! Decode events carrying zero codes, multiple codes, or codes without
//! corner geometry are NOT errors — the detection gate discards those
//! silently. Errors here cover the camera boundary, configuration, and
//! frame I/O.

use std::fmt;

/// Result type alias using ScanError
pub type ScanResult<T> = Result<T, ScanError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Camera-related errors
    Camera(CameraError),
    /// Configuration errors
    Config(String),
    /// Frame decoding/loading errors
    Decode(String),
    /// Filesystem errors
    Io(String),
}

/// Camera-boundary errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// Camera permission missing; render a permission-request
    /// affordance and wait for the user to re-trigger
    PermissionDenied,
    /// No camera device found; fatal for this screen instance
    NoCameraFound,
    /// Device disappeared mid-session
    Disconnected,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Camera(e) => write!(f, "Camera error: {}", e),
            ScanError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ScanError::Decode(msg) => write!(f, "Decode error: {}", msg),
            ScanError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied => write!(f, "Camera permission required"),
            CameraError::NoCameraFound => write!(f, "No camera device found"),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
        }
    }
}

impl std::error::Error for ScanError {}
impl std::error::Error for CameraError {}

impl From<CameraError> for ScanError {
    fn from(err: CameraError) -> Self {
        ScanError::Camera(err)
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Config(err.to_string())
    }
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::Decode(err.to_string())
    }
}
