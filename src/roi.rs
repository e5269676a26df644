// SPDX-License-Identifier: GPL-3.0-only

//! Region of interest for scan gating
//!
//! The region of interest is the fixed screen rectangle within which
//! detections are accepted. It is built once at session start from
//! screen-fraction insets and stays immutable for the session lifetime.

use crate::constants::roi;
use crate::geometry::{Corners, Point};
use serde::{Deserialize, Serialize};

/// Screen-fraction insets defining the region of interest
///
/// Each field is a fraction of the view dimension: `left`/`right` of the
/// view width, `top`/`bottom` of the view height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiFractions {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for RoiFractions {
    fn default() -> Self {
        Self {
            left: roi::LEFT_FRACTION,
            top: roi::TOP_FRACTION,
            right: roi::RIGHT_FRACTION,
            bottom: roi::BOTTOM_FRACTION,
        }
    }
}

/// The fixed screen rectangle within which detections are accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionOfInterest {
    corners: Corners,
}

impl RegionOfInterest {
    /// Build from explicit corner points (already in screen space)
    pub const fn new(corners: Corners) -> Self {
        Self { corners }
    }

    /// Build from screen-fraction insets and the view size
    pub fn from_fractions(fractions: &RoiFractions, view_width: f32, view_height: f32) -> Self {
        let left = view_width * fractions.left;
        let right = view_width * fractions.right;
        let top = view_height * fractions.top;
        let bottom = view_height * fractions.bottom;

        Self {
            corners: Corners::new(
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ),
        }
    }

    /// Whether a detected code's corners all fall inside the region
    ///
    /// Axis-aligned half-plane test per corner, with inclusive bounds:
    /// the code's top-left must be at or below-right of the region's
    /// top-left, the top-right at or below-left of the region's top-right,
    /// and so on. Deliberately not a polygon-in-polygon test.
    pub fn contains(&self, code: &Corners) -> bool {
        let region = &self.corners;

        code.top_left().x >= region.top_left().x
            && code.top_left().y >= region.top_left().y
            && code.top_right().x <= region.top_right().x
            && code.top_right().y >= region.top_right().y
            && code.bottom_right().x <= region.bottom_right().x
            && code.bottom_right().y <= region.bottom_right().y
            && code.bottom_left().x >= region.bottom_left().x
            && code.bottom_left().y <= region.bottom_left().y
    }

    /// The region's own corners: the overlay's resting animation target
    pub fn resting_corners(&self) -> Corners {
        self.corners
    }
}
