//! Viewport configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bounds and step sizes for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Stage units moved per keyboard pan at zoom 1.0.
    pub pan_step: f32,
    /// Zoom factor applied per wheel notch.
    pub wheel_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            pan_step: 10.0,
            wheel_step: 1.1,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom > 0.0) || !self.max_zoom.is_finite() || self.min_zoom > self.max_zoom {
            return Err(Error::InvalidConfig(format!(
                "zoom range [{}, {}] must be positive and ordered",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.pan_step > 0.0) || !self.pan_step.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "pan_step {} must be positive",
                self.pan_step
            )));
        }
        if !(self.wheel_step > 1.0) || !self.wheel_step.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "wheel_step {} must be greater than 1.0",
                self.wheel_step
            )));
        }
        Ok(())
    }
}
