// SPDX-License-Identifier: MPL-2.0

//! QR scan gating with region-of-interest detection and overlay corner
//! tracking
//!
//! This library sits between a QR decoder and a rendering layer: decode
//! events flow through a detection gate that accepts a code only when it
//! lies inside a fixed region of interest while scanning is active, and
//! accepted detections drive a four-corner overlay animation.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: The scan session controller and state machine
//! - [`gate`]: The detection gate deciding which decode events count
//! - [`geometry`]: Points, corner quadrilaterals, frame sizes
//! - [`roi`]: The region of interest and its containment test
//! - [`overlay`]: Corner animation and frame-to-screen mapping
//! - [`detector`]: The vendor QR decoder adapter
//! - [`torch`]: Flashlight control via sysfs
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! let config = qrscan::Config::default();
//! let (handle, _join) = qrscan::ScanSession::spawn(&config);
//! handle.feed().offer(event);
//! ```

pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod gate;
pub mod geometry;
pub mod overlay;
pub mod roi;
pub mod session;
pub mod torch;

// Re-export commonly used types
pub use config::Config;
pub use detector::{DecodeEvent, DecodedCode, QrDetector};
pub use errors::{CameraError, ScanError, ScanResult};
pub use gate::{Detection, DetectionGate, GateVerdict, IgnoreReason};
pub use geometry::{Corners, FrameSize, Point};
pub use overlay::{ContentFit, CornerAnimation, OverlayFrame, ViewSettings, ViewTransform};
pub use roi::{RegionOfInterest, RoiFractions};
pub use session::{DecodeFeed, ScanSession, ScanState, SessionHandle};
