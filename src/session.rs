// SPDX-License-Identifier: GPL-3.0-only

//! Scan session controller
//!
//! Owns the scan state machine and processes decode events one at a time.
//! Events arrive on a bounded channel of capacity 1 with non-blocking
//! send, so a second event arriving before the first has been handled is
//! dropped — that channel is the reentrancy guard. The auto-resume timer
//! is a cancellable delayed task owned by the controller; a manual toggle
//! cancels any pending resume so a stale transition can never fire.

use crate::config::Config;
use crate::constants::channel;
use crate::detector::DecodeEvent;
use crate::gate::{Detection, DetectionGate, GateVerdict};
use crate::geometry::Corners;
use crate::overlay::{CornerAnimation, OverlayFrame, ViewSettings, ViewTransform};
use crate::torch::{self, TorchDevice, TorchHardware};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, trace, warn};

/// Whether the session is accepting new detections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Actively accepting detections
    #[default]
    Scanning,
    /// Detections are ignored until resume
    Paused,
}

impl ScanState {
    pub fn is_scanning(&self) -> bool {
        matches!(self, ScanState::Scanning)
    }

    /// The opposite state (manual toggle)
    pub fn toggled(self) -> Self {
        match self {
            ScanState::Scanning => ScanState::Paused,
            ScanState::Paused => ScanState::Scanning,
        }
    }
}

/// Control commands accepted by the session
#[derive(Debug)]
enum Command {
    /// Flip scanning paused/active, cancelling any pending auto-resume
    ToggleScanning,
    /// Flip the torch on/off
    ToggleTorch,
    /// Auto-resume timer fired
    AutoResume,
    /// Stop the session
    Shutdown,
}

/// Producer handle for decode events
///
/// `offer` never blocks: when the session is still busy with the previous
/// event the new one is dropped, matching the one-at-a-time processing
/// model.
#[derive(Debug, Clone)]
pub struct DecodeFeed {
    tx: mpsc::Sender<DecodeEvent>,
}

impl DecodeFeed {
    /// Offer a decode event to the session; returns whether it was queued
    pub fn offer(&self, event: DecodeEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                trace!("Decode event dropped, previous event still queued");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Decode event dropped, session is gone");
                false
            }
        }
    }
}

/// Handle to a running scan session
pub struct SessionHandle {
    feed: DecodeFeed,
    control: mpsc::UnboundedSender<Command>,
    overlay: watch::Receiver<OverlayFrame>,
    detections: Option<mpsc::UnboundedReceiver<Detection>>,
}

impl SessionHandle {
    /// Producer handle for decode events (cloneable)
    pub fn feed(&self) -> DecodeFeed {
        self.feed.clone()
    }

    /// Overlay frames for the rendering layer
    pub fn overlay(&self) -> watch::Receiver<OverlayFrame> {
        self.overlay.clone()
    }

    /// Take the accepted-detection stream; yields each payload the gate
    /// lets through. Can be taken once.
    pub fn take_detections(&mut self) -> Option<mpsc::UnboundedReceiver<Detection>> {
        self.detections.take()
    }

    /// Flip scanning paused/active
    pub fn toggle_scanning(&self) {
        let _ = self.control.send(Command::ToggleScanning);
    }

    /// Flip the torch on/off
    pub fn toggle_torch(&self) {
        let _ = self.control.send(Command::ToggleTorch);
    }

    /// Stop the session
    pub fn shutdown(&self) {
        let _ = self.control.send(Command::Shutdown);
    }
}

/// The scan session: detection gate, scan state, torch, and overlay
/// publishing behind a single owner
pub struct ScanSession {
    state: ScanState,
    gate: DetectionGate,
    view: ViewSettings,
    resume_delay: Duration,
    animation_duration: Duration,

    torch_on: bool,
    torch_intensity: f32,
    torch_devices: Vec<TorchDevice>,

    /// Last published animation target; the next glide starts here
    current_corners: Corners,
    overlay_tx: watch::Sender<OverlayFrame>,
    detections_tx: mpsc::UnboundedSender<Detection>,

    /// Cancel handle for the pending auto-resume task. `Some` doubles as
    /// the "auto-resume armed" flag: a stale timer message arriving after
    /// a manual toggle finds `None` and is ignored.
    resume_cancel: Option<oneshot::Sender<()>>,
    control_tx: mpsc::UnboundedSender<Command>,
}

impl ScanSession {
    /// Spawn a session task configured from `config`
    ///
    /// Torch hardware is discovered at spawn; missing hardware leaves the
    /// toggle operating on the session flag alone.
    pub fn spawn(config: &Config) -> (SessionHandle, tokio::task::JoinHandle<()>) {
        let hardware = TorchHardware::detect();
        if let Some(message) = &hardware.permission_error {
            warn!(message, "Torch hardware present but not controllable");
        }
        Self::spawn_with_torch(config, hardware.devices)
    }

    /// Spawn a session with explicit torch devices (empty to skip hardware)
    pub fn spawn_with_torch(
        config: &Config,
        torch_devices: Vec<TorchDevice>,
    ) -> (SessionHandle, tokio::task::JoinHandle<()>) {
        let region = config.region_of_interest();
        let resting = region.resting_corners();

        let (decode_tx, decode_rx) = mpsc::channel(channel::DECODE_QUEUE_DEPTH);
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (detections_tx, detections_rx) = mpsc::unbounded_channel();
        let (overlay_tx, overlay_rx) = watch::channel(OverlayFrame::resting(resting));

        let session = ScanSession {
            state: ScanState::Scanning,
            gate: DetectionGate::new(region),
            view: config.view_settings(),
            resume_delay: config.resume_delay(),
            animation_duration: config.animation_duration(),
            torch_on: false,
            torch_intensity: config.torch_intensity,
            torch_devices,
            current_corners: resting,
            overlay_tx,
            detections_tx,
            resume_cancel: None,
            control_tx: control_tx.clone(),
        };

        let handle = SessionHandle {
            feed: DecodeFeed { tx: decode_tx },
            control: control_tx,
            overlay: overlay_rx,
            detections: Some(detections_rx),
        };

        let join = tokio::spawn(session.run(decode_rx, control_rx));
        (handle, join)
    }

    async fn run(
        mut self,
        mut decode_rx: mpsc::Receiver<DecodeEvent>,
        mut control_rx: mpsc::UnboundedReceiver<Command>,
    ) {
        info!("Scan session started");

        loop {
            tokio::select! {
                event = decode_rx.recv() => match event {
                    Some(event) => self.on_decode(event),
                    None => break,
                },
                command = control_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.on_command(command),
                },
            }
        }

        if self.torch_on {
            torch::all_off(&self.torch_devices);
        }
        info!("Scan session stopped");
    }

    fn on_decode(&mut self, event: DecodeEvent) {
        let view = ViewTransform::new(event.frame, &self.view);

        match self.gate.evaluate(&event, &view, self.state) {
            GateVerdict::Detected(detection) => {
                debug!(content = %detection.content, "Detection accepted");
                self.state = ScanState::Paused;
                self.publish(detection.corners, true);
                let _ = self.detections_tx.send(detection);
                self.arm_auto_resume();
            }
            GateVerdict::Ignored(reason) => {
                trace!(?reason, "Decode event ignored");
            }
        }
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::ToggleScanning => {
                if let Some(cancel) = self.resume_cancel.take() {
                    let _ = cancel.send(());
                }
                self.state = self.state.toggled();
                info!(state = ?self.state, "Scan state toggled");
                if self.state.is_scanning() {
                    self.publish(self.gate.region().resting_corners(), false);
                }
            }
            Command::ToggleTorch => {
                self.torch_on = !self.torch_on;
                if self.torch_on {
                    torch::all_on(&self.torch_devices, self.torch_intensity);
                } else {
                    torch::all_off(&self.torch_devices);
                }
                info!(on = self.torch_on, "Torch toggled");
            }
            Command::AutoResume => {
                if self.resume_cancel.take().is_none() {
                    trace!("Stale auto-resume ignored");
                    return;
                }
                debug!("Auto-resume, scanning again");
                self.state = ScanState::Scanning;
                self.publish(self.gate.region().resting_corners(), false);
            }
            Command::Shutdown => unreachable!("handled in run loop"),
        }
    }

    /// Publish a new overlay frame gliding from the current corner
    /// positions to `target`
    fn publish(&mut self, target: Corners, detected: bool) {
        let animation = CornerAnimation::new(self.current_corners, target, self.animation_duration);
        self.current_corners = target;
        self.overlay_tx.send_replace(OverlayFrame {
            animation,
            detected,
        });
    }

    /// Start the auto-resume timer, replacing any previous one
    fn arm_auto_resume(&mut self) {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.resume_cancel = Some(cancel_tx);

        let control = self.control_tx.clone();
        let delay = self.resume_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let _ = control.send(Command::AutoResume);
                }
                _ = cancel_rx => {}
            }
        });
    }
}
