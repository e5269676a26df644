// SPDX-License-Identifier: MPL-2.0

//! Overlay corner animation and frame-to-screen mapping
//!
//! Detections arrive in frame space (the camera's pixel grid) but the
//! overlay renders in screen space. [`ViewTransform`] handles the mapping,
//! accounting for video scaling, letterboxing, and mirroring.
//!
//! The overlay itself is four corner marks that glide from their resting
//! position (the region of interest) to a detected code's corners and
//! back. [`CornerAnimation`] describes one such glide; sampling is pure so
//! renderers and tests drive the clock explicitly.

use crate::geometry::{Corners, FrameSize, Point};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the camera frame is fitted into the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentFit {
    /// Scale to fit within the view, letterboxing the remainder
    Contain,
    /// Scale to fill the view, cropping the overflow
    #[default]
    Cover,
}

/// The screen-space view the overlay renders into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub width: f32,
    pub height: f32,
    pub content_fit: ContentFit,
    /// Mirror horizontally (selfie preview)
    pub mirrored: bool,
}

/// Maps frame-space points into screen space
///
/// Built per decode event from the source frame size and the view
/// settings; frame dimensions may change between events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    offset_x: f32,
    offset_y: f32,
    scale: f32,
    video_width: f32,
    mirrored: bool,
}

impl ViewTransform {
    pub fn new(frame: FrameSize, view: &ViewSettings) -> Self {
        let frame_aspect = frame.aspect();
        let view_aspect = view.width / view.height;

        // Uniform scale in both fits; Contain letterboxes, Cover crops
        let (video_width, video_height) = match view.content_fit {
            ContentFit::Contain => {
                if frame_aspect > view_aspect {
                    (view.width, view.width / frame_aspect)
                } else {
                    (view.height * frame_aspect, view.height)
                }
            }
            ContentFit::Cover => {
                if frame_aspect > view_aspect {
                    (view.height * frame_aspect, view.height)
                } else {
                    (view.width, view.width / frame_aspect)
                }
            }
        };

        Self {
            offset_x: (view.width - video_width) / 2.0,
            offset_y: (view.height - video_height) / 2.0,
            scale: video_width / frame.width as f32,
            video_width,
            mirrored: view.mirrored,
        }
    }

    /// Map a single frame-space point into screen space
    pub fn map_point(&self, point: Point) -> Point {
        let mut x = point.x * self.scale;
        let y = point.y * self.scale;

        if self.mirrored {
            x = self.video_width - x;
        }

        Point::new(x + self.offset_x, y + self.offset_y)
    }

    /// Map a detected code's corners into screen space
    ///
    /// Mirroring flips left and right, so the mapped points are re-swapped
    /// to keep the canonical top-left, top-right, bottom-right, bottom-left
    /// ordering intact.
    pub fn map_corners(&self, corners: &Corners) -> Corners {
        let tl = self.map_point(corners.top_left());
        let tr = self.map_point(corners.top_right());
        let br = self.map_point(corners.bottom_right());
        let bl = self.map_point(corners.bottom_left());

        if self.mirrored {
            Corners::new(tr, tl, bl, br)
        } else {
            Corners::new(tl, tr, br, bl)
        }
    }
}

/// One glide of the four overlay corner marks
///
/// All four corners interpolate simultaneously over a fixed duration.
/// Sampling takes the elapsed time explicitly; there is no clock inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerAnimation {
    from: Corners,
    to: Corners,
    duration: Duration,
}

impl CornerAnimation {
    pub fn new(from: Corners, to: Corners, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// An already-settled animation resting at `corners`
    pub fn settled(corners: Corners) -> Self {
        Self {
            from: corners,
            to: corners,
            duration: Duration::ZERO,
        }
    }

    /// The animation's end position
    pub fn target(&self) -> Corners {
        self.to
    }

    /// Corner positions after `elapsed` time; clamps to the target once
    /// the duration has passed
    pub fn sample(&self, elapsed: Duration) -> Corners {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from.lerp(&self.to, t)
    }

    /// Whether the glide has finished at `elapsed` time
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// What the rendering layer needs to draw the overlay
///
/// Published by the scan session whenever the animation target changes.
/// `detected` switches the corner highlight color and line visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    pub animation: CornerAnimation,
    pub detected: bool,
}

impl OverlayFrame {
    /// The initial overlay: resting on the region of interest, idle
    pub fn resting(corners: Corners) -> Self {
        Self {
            animation: CornerAnimation::settled(corners),
            detected: false,
        }
    }
}
