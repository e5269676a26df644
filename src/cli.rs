// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for scan operations
//!
//! This module provides command-line functionality for:
//! - Decoding QR codes in an image file
//! - Running a single image through the detection gate
//! - Driving a full scan session over a directory of frames

use qrscan::config::Config;
use qrscan::constants::file_formats;
use qrscan::detector::QrDetector;
use qrscan::errors::CameraError;
use qrscan::gate::{DetectionGate, GateVerdict};
use qrscan::geometry::Corners;
use qrscan::overlay::ViewTransform;
use qrscan::session::{ScanSession, ScanState};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Decode QR codes in an image file and print the results
pub fn decode_image(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let image = image::open(path)?.to_luma8();
    let detector = QrDetector::new();

    let runtime = tokio::runtime::Runtime::new()?;
    let event = runtime.block_on(detector.detect(image));

    if event.codes.is_empty() {
        println!("No QR codes found.");
        return Ok(());
    }

    println!(
        "Found {} code(s) in {}x{} frame:",
        event.codes.len(),
        event.frame.width,
        event.frame.height
    );
    println!();
    for (index, code) in event.codes.iter().enumerate() {
        println!("  [{}] {}", index, code.content);
        match &code.corners {
            Some(corners) => println!("      Corners: {}", format_corners(corners)),
            None => println!("      Corners: (none)"),
        }
    }

    Ok(())
}

/// Run one image through the detection gate and print the verdict
pub fn gate_image(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let image = image::open(path)?.to_luma8();
    let detector = QrDetector::with_max_dimension(config.max_decode_dimension);

    let runtime = tokio::runtime::Runtime::new()?;
    let event = runtime.block_on(detector.detect(image));

    let gate = DetectionGate::new(config.region_of_interest());
    let view = ViewTransform::new(event.frame, &config.view_settings());

    match gate.evaluate(&event, &view, ScanState::Scanning) {
        GateVerdict::Detected(detection) => {
            println!("Detected: {}", detection.content);
            println!("Corners (screen space): {}", format_corners(&detection.corners));
        }
        GateVerdict::Ignored(reason) => {
            println!("Ignored: {:?}", reason);
        }
    }

    Ok(())
}

/// Drive a full scan session over a directory of frames
///
/// Each image in the directory is treated as one camera frame and fed
/// through detector, gate, and overlay in order. Accepted payloads are
/// printed as they land.
pub fn run_session(frames_dir: &Path, fps: u32) -> Result<(), Box<dyn std::error::Error>> {
    let frames = collect_frames(frames_dir)?;
    let config = Config::load()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let (mut handle, join) = ScanSession::spawn(&config);
        let mut detections = handle
            .take_detections()
            .expect("fresh session always has a detection stream");
        let detector = QrDetector::with_max_dimension(config.max_decode_dimension);
        let feed = handle.feed();

        let frame_interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        let mut accepted = 0usize;

        for path in &frames {
            let image = match image::open(path) {
                Ok(image) => image.to_luma8(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable frame");
                    continue;
                }
            };

            let event = detector.detect(image).await;
            if !feed.offer(event) {
                debug!(path = %path.display(), "Frame dropped, session busy");
            }

            tokio::time::sleep(frame_interval).await;

            while let Ok(detection) = detections.try_recv() {
                accepted += 1;
                println!("Scanned: {}", detection.content);
            }
        }

        // Let a trailing auto-resume land before shutting down
        tokio::time::sleep(config.resume_delay()).await;
        while let Ok(detection) = detections.try_recv() {
            accepted += 1;
            println!("Scanned: {}", detection.content);
        }

        handle.shutdown();
        let _ = join.await;

        println!();
        println!("{} frame(s) processed, {} code(s) accepted.", frames.len(), accepted);
    });

    Ok(())
}

/// Collect the image files of a frame directory in name order
///
/// A missing directory maps to the no-camera affordance; an unreadable
/// one to the permission affordance.
fn collect_frames(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !dir.exists() {
        return Err(CameraError::NoCameraFound.into());
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(CameraError::PermissionDenied.into());
        }
        Err(e) => return Err(e.into()),
    };

    let mut frames: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(file_formats::is_image_extension)
        })
        .collect();
    frames.sort();

    if frames.is_empty() {
        return Err(CameraError::NoCameraFound.into());
    }

    Ok(frames)
}

fn format_corners(corners: &Corners) -> String {
    let p = corners.points();
    format!(
        "({:.1},{:.1}) ({:.1},{:.1}) ({:.1},{:.1}) ({:.1},{:.1})",
        p[0].x, p[0].y, p[1].x, p[1].y, p[2].x, p[2].y, p[3].x, p[3].y
    )
}
