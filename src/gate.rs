// SPDX-License-Identifier: GPL-3.0-only

//! Detection gate
//!
//! Sits between the decoder callback and the overlay: decides whether a
//! decode event counts as a valid detection. An event passes only when
//! scanning is active, exactly one code is present, the code carries
//! corner geometry, and every corner falls inside the region of interest.
//! Everything else is discarded silently; a rejected event simply waits
//! for the next decode callback.

use crate::detector::DecodeEvent;
use crate::geometry::Corners;
use crate::overlay::ViewTransform;
use crate::roi::RegionOfInterest;
use crate::session::ScanState;

/// A decode event the gate accepted
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Decoded payload
    pub content: String,
    /// Code outline in screen space: the overlay's animation target
    pub corners: Corners,
}

/// Why the gate discarded an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Scanning is paused
    NotScanning,
    /// The frame held no codes
    NoCodes,
    /// More than one code at once: ambiguous target
    MultipleCodes,
    /// The code carries no corner geometry
    NoCorners,
    /// At least one corner falls outside its region half-plane
    OutsideRegion,
}

/// Gate decision for one decode event
#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    Detected(Detection),
    Ignored(IgnoreReason),
}

impl GateVerdict {
    pub fn is_detected(&self) -> bool {
        matches!(self, GateVerdict::Detected(_))
    }
}

/// Decides whether decode events count as valid detections
#[derive(Debug, Clone)]
pub struct DetectionGate {
    region: RegionOfInterest,
}

impl DetectionGate {
    pub fn new(region: RegionOfInterest) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &RegionOfInterest {
        &self.region
    }

    /// Evaluate one decode event against the current scan state
    ///
    /// Corners are mapped into screen space through `view` before the
    /// containment test, so the region and the tested corners always
    /// share a coordinate space.
    pub fn evaluate(
        &self,
        event: &DecodeEvent,
        view: &ViewTransform,
        state: ScanState,
    ) -> GateVerdict {
        if !state.is_scanning() {
            return GateVerdict::Ignored(IgnoreReason::NotScanning);
        }

        let code = match event.codes.as_slice() {
            [] => return GateVerdict::Ignored(IgnoreReason::NoCodes),
            [code] => code,
            _ => return GateVerdict::Ignored(IgnoreReason::MultipleCodes),
        };

        let Some(corners) = code.corners else {
            return GateVerdict::Ignored(IgnoreReason::NoCorners);
        };

        let screen = view.map_corners(&corners);
        if !self.region.contains(&screen) {
            return GateVerdict::Ignored(IgnoreReason::OutsideRegion);
        }

        GateVerdict::Detected(Detection {
            content: code.content.clone(),
            corners: screen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::DecodedCode;
    use crate::geometry::{FrameSize, Point};
    use crate::overlay::{ContentFit, ViewSettings, ViewTransform};

    fn identity_view() -> ViewTransform {
        ViewTransform::new(
            FrameSize::new(100, 100),
            &ViewSettings {
                width: 100.0,
                height: 100.0,
                content_fit: ContentFit::Cover,
                mirrored: false,
            },
        )
    }

    fn gate() -> DetectionGate {
        DetectionGate::new(RegionOfInterest::new(Corners::new(
            Point::new(10.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(90.0, 90.0),
            Point::new(10.0, 90.0),
        )))
    }

    fn code_at(left: f32, top: f32, size: f32) -> DecodedCode {
        DecodedCode {
            content: "hello".to_string(),
            corners: Some(Corners::new(
                Point::new(left, top),
                Point::new(left + size, top),
                Point::new(left + size, top + size),
                Point::new(left, top + size),
            )),
        }
    }

    fn event_with(codes: Vec<DecodedCode>) -> DecodeEvent {
        DecodeEvent {
            codes,
            frame: FrameSize::new(100, 100),
        }
    }

    #[test]
    fn test_accepts_code_inside_region() {
        let verdict = gate().evaluate(
            &event_with(vec![code_at(20.0, 20.0, 60.0)]),
            &identity_view(),
            ScanState::Scanning,
        );

        match verdict {
            GateVerdict::Detected(detection) => {
                assert_eq!(detection.content, "hello");
                assert_eq!(detection.corners.top_left(), Point::new(20.0, 20.0));
            }
            other => panic!("expected detection, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_code_outside_region() {
        // Top-left x = 5 violates the region's left bound of 10
        let verdict = gate().evaluate(
            &event_with(vec![DecodedCode {
                content: "hello".to_string(),
                corners: Some(Corners::new(
                    Point::new(5.0, 20.0),
                    Point::new(80.0, 20.0),
                    Point::new(80.0, 80.0),
                    Point::new(20.0, 80.0),
                )),
            }]),
            &identity_view(),
            ScanState::Scanning,
        );

        assert_eq!(verdict, GateVerdict::Ignored(IgnoreReason::OutsideRegion));
    }

    #[test]
    fn test_rejects_while_paused() {
        let verdict = gate().evaluate(
            &event_with(vec![code_at(20.0, 20.0, 60.0)]),
            &identity_view(),
            ScanState::Paused,
        );

        assert_eq!(verdict, GateVerdict::Ignored(IgnoreReason::NotScanning));
    }

    #[test]
    fn test_rejects_empty_frame() {
        let verdict = gate().evaluate(&event_with(Vec::new()), &identity_view(), ScanState::Scanning);

        assert_eq!(verdict, GateVerdict::Ignored(IgnoreReason::NoCodes));
    }

    #[test]
    fn test_rejects_multiple_codes() {
        let verdict = gate().evaluate(
            &event_with(vec![code_at(20.0, 20.0, 20.0), code_at(50.0, 50.0, 20.0)]),
            &identity_view(),
            ScanState::Scanning,
        );

        assert_eq!(verdict, GateVerdict::Ignored(IgnoreReason::MultipleCodes));
    }

    #[test]
    fn test_rejects_code_without_corners() {
        let verdict = gate().evaluate(
            &event_with(vec![DecodedCode {
                content: "hello".to_string(),
                corners: None,
            }]),
            &identity_view(),
            ScanState::Scanning,
        );

        assert_eq!(verdict, GateVerdict::Ignored(IgnoreReason::NoCorners));
    }
}
