// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! Wraps the rqrr decoder: grayscale frames are searched for QR grids,
//! returning decoded payloads with their corner geometry in full-frame
//! coordinates. Optimized for real-time use with frame downscaling.

use crate::geometry::{Corners, FrameSize, Point};
use image::GrayImage;
use image::imageops::{self, FilterType};
use tracing::{debug, trace, warn};

/// One decoded code from a frame
///
/// Corner geometry is optional: the decoder can recognize a payload
/// without locating a clean quadrilateral for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCode {
    /// Raw decoded payload
    pub content: String,
    /// Code outline in frame space, canonical corner order
    pub corners: Option<Corners>,
}

/// Everything one decode callback delivers: the codes found in a frame
/// plus the frame's own dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeEvent {
    pub codes: Vec<DecodedCode>,
    pub frame: FrameSize,
}

impl DecodeEvent {
    /// An event carrying no codes (frame scanned clean)
    pub fn empty(frame: FrameSize) -> Self {
        Self {
            codes: Vec::new(),
            frame,
        }
    }
}

/// QR code detector
///
/// Analyzes grayscale frames to detect and decode QR codes. Frames larger
/// than the processing limit are downscaled first and corner coordinates
/// scaled back to full-frame space.
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new QR detector with default settings
    pub fn new() -> Self {
        Self {
            // QR codes are typically large enough to be detected at 640px
            max_dimension: crate::constants::detector::MAX_DECODE_DIMENSION,
        }
    }

    /// Create a QR detector with a custom max processing dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Detect QR codes in a grayscale frame
    ///
    /// CPU-intensive; runs on a blocking task so the async runtime is not
    /// stalled while a frame is searched.
    pub async fn detect(&self, frame: GrayImage) -> DecodeEvent {
        let max_dim = self.max_dimension;
        let (width, height) = frame.dimensions();
        let size = FrameSize::new(width, height);

        tokio::task::spawn_blocking(move || detect_sync(frame, max_dim))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "QR detection task panicked");
                DecodeEvent::empty(size)
            })
    }
}

/// Synchronous QR detection (runs in a blocking task)
fn detect_sync(frame: GrayImage, max_dimension: u32) -> DecodeEvent {
    let start = std::time::Instant::now();

    let (width, height) = frame.dimensions();
    let size = FrameSize::new(width, height);

    let (processed, scale) = if width.max(height) > max_dimension {
        let scale = width.max(height) as f32 / max_dimension as f32;
        let new_width = (width as f32 / scale) as u32;
        let new_height = (height as f32 / scale) as u32;
        (
            imageops::resize(&frame, new_width, new_height, FilterType::Triangle),
            scale,
        )
    } else {
        (frame, 1.0)
    };

    let conversion_time = start.elapsed();
    trace!(
        scale,
        conversion_ms = conversion_time.as_millis(),
        "Prepared frame for processing"
    );

    let mut prepared = rqrr::PreparedImage::prepare(processed);
    let grids = prepared.detect_grids();

    let detection_time = start.elapsed() - conversion_time;
    trace!(
        count = grids.len(),
        detection_ms = detection_time.as_millis(),
        "QR grid detection complete"
    );

    let mut codes = Vec::with_capacity(grids.len());

    for grid in grids {
        let corners = corners_from_bounds(&grid.bounds, scale);

        let content = match grid.decode() {
            Ok((_meta, content)) => content,
            Err(e) => {
                debug!(error = %e, "Failed to decode located QR grid");
                continue;
            }
        };

        debug!(
            content = %content,
            tl_x = corners.top_left().x,
            tl_y = corners.top_left().y,
            "Detected QR code"
        );

        codes.push(DecodedCode {
            content,
            corners: Some(corners),
        });
    }

    if !codes.is_empty() {
        debug!(
            count = codes.len(),
            total_ms = start.elapsed().as_millis(),
            "QR detection found codes"
        );
    }

    DecodeEvent { codes, frame: size }
}

/// Scale rqrr grid bounds back to full-frame coordinates
///
/// rqrr reports bounds in canonical order: top-left, top-right,
/// bottom-right, bottom-left.
fn corners_from_bounds(bounds: &[rqrr::Point; 4], scale: f32) -> Corners {
    let map = |p: &rqrr::Point| Point::new(p.x as f32 * scale, p.y as f32 * scale);
    Corners::new(map(&bounds[0]), map(&bounds[1]), map(&bounds[2]), map(&bounds[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_from_bounds_scales_back() {
        let bounds = [
            rqrr::Point { x: 10, y: 20 },
            rqrr::Point { x: 110, y: 20 },
            rqrr::Point { x: 110, y: 120 },
            rqrr::Point { x: 10, y: 120 },
        ];

        let corners = corners_from_bounds(&bounds, 2.0);
        assert_eq!(corners.top_left(), Point::new(20.0, 40.0));
        assert_eq!(corners.bottom_right(), Point::new(220.0, 240.0));
    }

    #[test]
    fn test_detect_sync_clean_frame() {
        // A flat gray frame holds no codes
        let frame = GrayImage::from_pixel(64, 48, image::Luma([128u8]));
        let event = detect_sync(frame, 640);

        assert!(event.codes.is_empty());
        assert_eq!(event.frame, FrameSize::new(64, 48));
    }
}
