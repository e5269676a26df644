// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the scan session state machine
//!
//! These run on a paused tokio clock so the auto-resume timing is exact
//! and the tests never actually wait.

use qrscan::config::Config;
use qrscan::detector::{DecodeEvent, DecodedCode};
use qrscan::geometry::{Corners, FrameSize, Point};
use qrscan::overlay::ContentFit;
use qrscan::roi::RoiFractions;
use qrscan::session::ScanSession;
use std::time::Duration;

/// 100x100 view over a 100x100 frame: the view transform is identity,
/// so test corner coordinates read directly against the region.
fn test_config() -> Config {
    Config {
        view_width: 100.0,
        view_height: 100.0,
        roi: RoiFractions {
            left: 0.1,
            top: 0.1,
            right: 0.9,
            bottom: 0.9,
        },
        resume_delay_ms: 500,
        animation_duration_ms: 300,
        content_fit: ContentFit::Cover,
        mirror_preview: false,
        ..Config::default()
    }
}

fn square(left: f32, top: f32, size: f32) -> Corners {
    Corners::new(
        Point::new(left, top),
        Point::new(left + size, top),
        Point::new(left + size, top + size),
        Point::new(left, top + size),
    )
}

fn event_in_region() -> DecodeEvent {
    DecodeEvent {
        codes: vec![DecodedCode {
            content: "payload".to_string(),
            corners: Some(square(20.0, 20.0, 60.0)),
        }],
        frame: FrameSize::new(100, 100),
    }
}

fn event_outside_region() -> DecodeEvent {
    DecodeEvent {
        codes: vec![DecodedCode {
            content: "outside".to_string(),
            corners: Some(square(0.0, 0.0, 60.0)),
        }],
        frame: FrameSize::new(100, 100),
    }
}

/// Let the session task drain its queues without advancing past any
/// pending auto-resume timer.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_detection_pauses_then_auto_resumes() {
    let config = test_config();
    let resting = config.region_of_interest().resting_corners();
    let (mut handle, join) = ScanSession::spawn_with_torch(&config, Vec::new());
    let mut overlay = handle.overlay();
    let mut detections = handle.take_detections().expect("detection stream");
    overlay.borrow_and_update();

    assert!(handle.feed().offer(event_in_region()));

    // The gate accepts: overlay flips to detected, payload lands
    overlay.changed().await.expect("overlay update");
    let frame = *overlay.borrow_and_update();
    assert!(frame.detected);
    assert_eq!(frame.animation.target(), square(20.0, 20.0, 60.0));

    let detection = detections.recv().await.expect("accepted payload");
    assert_eq!(detection.content, "payload");

    // With no manual intervention the session resumes on its own and the
    // overlay glides back to rest
    overlay.changed().await.expect("overlay reset");
    let frame = *overlay.borrow_and_update();
    assert!(!frame.detected);
    assert_eq!(frame.animation.target(), resting);

    handle.shutdown();
    join.await.expect("session task");
}

#[tokio::test(start_paused = true)]
async fn test_events_rejected_while_paused() {
    let config = test_config();
    let (mut handle, join) = ScanSession::spawn_with_torch(&config, Vec::new());
    let mut detections = handle.take_detections().expect("detection stream");
    let feed = handle.feed();

    assert!(feed.offer(event_in_region()));
    settle().await;
    assert_eq!(detections.recv().await.expect("first payload").content, "payload");

    // Session is paused now; an in-region event must be ignored
    assert!(feed.offer(event_in_region()));
    settle().await;
    assert!(detections.try_recv().is_err(), "paused session accepted a detection");

    handle.shutdown();
    join.await.expect("session task");
}

#[tokio::test(start_paused = true)]
async fn test_out_of_region_event_is_ignored() {
    let config = test_config();
    let (mut handle, join) = ScanSession::spawn_with_torch(&config, Vec::new());
    let mut detections = handle.take_detections().expect("detection stream");

    assert!(handle.feed().offer(event_outside_region()));
    settle().await;
    assert!(detections.try_recv().is_err());

    handle.shutdown();
    join.await.expect("session task");
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_events_drop_the_second() {
    let config = test_config();
    let (handle, join) = ScanSession::spawn_with_torch(&config, Vec::new());
    let feed = handle.feed();

    // The session task has not run between these two offers, so the
    // capacity-1 queue accepts the first and sheds the second
    assert!(feed.offer(event_in_region()));
    assert!(!feed.offer(event_in_region()));

    handle.shutdown();
    join.await.expect("session task");
}

#[tokio::test(start_paused = true)]
async fn test_manual_toggle_cancels_pending_auto_resume() {
    let config = test_config();
    let (mut handle, join) = ScanSession::spawn_with_torch(&config, Vec::new());
    let mut overlay = handle.overlay();
    let mut detections = handle.take_detections().expect("detection stream");
    overlay.borrow_and_update();

    assert!(handle.feed().offer(event_in_region()));
    overlay.changed().await.expect("detection overlay");
    overlay.borrow_and_update();
    detections.recv().await.expect("accepted payload");

    // Toggle back to scanning before the timer fires; the overlay resets
    // immediately
    handle.toggle_scanning();
    overlay.changed().await.expect("reset overlay");
    let frame = *overlay.borrow_and_update();
    assert!(!frame.detected);

    // Ride past the original resume deadline: the cancelled timer must
    // not publish anything further
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(!overlay.has_changed().expect("session alive"));

    handle.shutdown();
    join.await.expect("session task");
}

#[tokio::test(start_paused = true)]
async fn test_manual_pause_blocks_and_manual_resume_restores() {
    let config = test_config();
    let (mut handle, join) = ScanSession::spawn_with_torch(&config, Vec::new());
    let mut detections = handle.take_detections().expect("detection stream");
    let feed = handle.feed();

    handle.toggle_scanning();
    settle().await;

    assert!(feed.offer(event_in_region()));
    settle().await;
    assert!(detections.try_recv().is_err(), "paused session accepted a detection");

    handle.toggle_scanning();
    settle().await;

    assert!(feed.offer(event_in_region()));
    settle().await;
    assert_eq!(detections.recv().await.expect("payload").content, "payload");

    handle.shutdown();
    join.await.expect("session task");
}
