//! Camera capture with front/back facing selection

use crate::config::VisionConfig;
use crate::error::VisionError;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{VideoCapture, CAP_ANY, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Which physical camera supplies the video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingMode {
    /// User-facing (selfie) camera
    Front,
    /// Environment-facing (rear) camera
    Back,
}

impl FacingMode {
    /// The other of the two fixed facing modes
    pub fn flipped(self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Back,
            FacingMode::Back => FacingMode::Front,
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacingMode::Front => write!(f, "front"),
            FacingMode::Back => write!(f, "back"),
        }
    }
}

impl FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(FacingMode::Front),
            "back" => Ok(FacingMode::Back),
            other => Err(format!("Unknown facing mode: {}", other)),
        }
    }
}

/// Camera manager owning at most one open capture at a time
///
/// The capture handle is replaced wholesale (stop, then start) rather than
/// mutated in place, so a failed start never leaves a half-open stream.
pub struct CameraManager {
    config: Arc<VisionConfig>,
    capture: RwLock<Option<VideoCapture>>,
    facing: RwLock<FacingMode>,
}

impl CameraManager {
    /// Create a new camera manager; no device is opened until `start`
    pub fn new(config: Arc<VisionConfig>, initial_facing: FacingMode) -> Self {
        Self {
            config,
            capture: RwLock::new(None),
            facing: RwLock::new(initial_facing),
        }
    }

    fn device_for(&self, facing: FacingMode) -> u32 {
        match facing {
            FacingMode::Front => self.config.front_camera_id,
            FacingMode::Back => self.config.back_camera_id,
        }
    }

    /// Open the capture for the given facing mode, stopping any existing one
    ///
    /// On failure no capture is left active and the error describes the
    /// device that could not be opened.
    pub fn start(&self, facing: FacingMode) -> Result<(), VisionError> {
        self.stop();

        let device = self.device_for(facing);
        let mut capture = VideoCapture::new(device as i32, CAP_ANY)
            .map_err(|e| VisionError::Camera(format!("Failed to open camera {}: {}", device, e)))?;

        let opened = capture.is_opened()
            .map_err(|e| VisionError::Camera(format!("Camera {} not opened: {}", device, e)))?;
        if !opened {
            return Err(VisionError::Camera(format!(
                "Camera {} ({} facing) is unavailable or access was denied",
                device, facing
            )));
        }

        // Preferred resolution; the device may ignore it
        let (width, height) = self.config.resolution;
        for (prop, value) in [
            (CAP_PROP_FRAME_WIDTH, width as f64),
            (CAP_PROP_FRAME_HEIGHT, height as f64),
        ] {
            if let Err(e) = capture.set(prop, value) {
                warn!("Failed to set capture property {}: {}", prop, e);
            }
        }

        *self.capture.write() = Some(capture);
        *self.facing.write() = facing;
        info!(
            "Camera {} started ({} facing) at preferred {}x{}",
            device, facing, width, height
        );

        Ok(())
    }

    /// Release the current capture; a no-op when none is active
    pub fn stop(&self) {
        if let Some(mut capture) = self.capture.write().take() {
            if let Err(e) = capture.release() {
                warn!("Failed to release capture cleanly: {}", e);
            }
            info!("Camera stopped");
        }
    }

    /// Toggle facing mode and restart the capture; returns the new mode
    pub fn flip(&self) -> Result<FacingMode, VisionError> {
        let next = {
            let mut facing = self.facing.write();
            *facing = facing.flipped();
            *facing
        };
        self.start(next)?;
        Ok(next)
    }

    /// Read a single frame from the active capture
    pub fn capture_frame(&self) -> Result<Mat, VisionError> {
        let mut guard = self.capture.write();
        let capture = guard
            .as_mut()
            .ok_or_else(|| VisionError::Camera("Camera is not started".to_string()))?;

        let mut frame = Mat::default();
        let grabbed = capture.read(&mut frame)
            .map_err(|e| VisionError::Camera(format!("Failed to read frame: {}", e)))?;

        if !grabbed || frame.empty()? {
            return Err(VisionError::Camera("Camera produced an empty frame".to_string()));
        }

        Ok(frame)
    }

    /// Current facing mode (the mode of the active or most recent capture)
    pub fn facing(&self) -> FacingMode {
        *self.facing.read()
    }

    /// Whether a capture is currently open
    pub fn is_active(&self) -> bool {
        self.capture.read().is_some()
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        self.stop();
    }
}
