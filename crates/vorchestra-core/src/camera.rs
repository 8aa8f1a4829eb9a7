//! Viewport transform between screen pixels and stage coordinates.
//!
//! The stage is the unbounded plane instruments are placed on. The camera
//! looks at it from `offset` (the stage point under the screen origin) with a
//! uniform `zoom`:
//!
//! ```text
//! stage  = screen / zoom + offset
//! screen = (stage - offset) * zoom
//! ```

use crate::config::CameraConfig;
use crate::Result;
use tracing::warn;

/// Keyboard pan directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    zoom: f32,
    offset_x: f32,
    offset_y: f32,
    config: CameraConfig,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            config: CameraConfig::default(),
        }
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            zoom: 1.0_f32.clamp(config.min_zoom, config.max_zoom),
            offset_x: 0.0,
            offset_y: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.offset_x = x;
        self.offset_y = y;
    }

    /// Set the zoom directly, clamped to the configured range. The screen
    /// origin stays fixed.
    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() || zoom <= 0.0 {
            warn!("Ignoring invalid zoom {}", zoom);
            return;
        }
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
    }

    /// Back to zoom 1.0 looking at the stage origin.
    pub fn reset(&mut self) {
        self.zoom = 1.0_f32.clamp(self.config.min_zoom, self.config.max_zoom);
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    pub fn screen_to_stage(&self, sx: f32, sy: f32) -> (f32, f32) {
        (sx / self.zoom + self.offset_x, sy / self.zoom + self.offset_y)
    }

    pub fn stage_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.offset_x) * self.zoom, (y - self.offset_y) * self.zoom)
    }

    /// Move the view by a stage-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the zoom by `factor`, keeping the stage point under the
    /// screen anchor `(ax, ay)` fixed. The result is clamped to the configured
    /// range; non-positive or non-finite factors are ignored.
    pub fn zoom_by(&mut self, factor: f32, ax: f32, ay: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            warn!("Ignoring invalid zoom factor {}", factor);
            return;
        }

        let (before_x, before_y) = self.screen_to_stage(ax, ay);
        self.zoom = (self.zoom * factor).clamp(self.config.min_zoom, self.config.max_zoom);
        let (after_x, after_y) = self.screen_to_stage(ax, ay);

        self.offset_x += before_x - after_x;
        self.offset_y += before_y - after_y;
    }

    /// One frame of held-key panning. The step is constant on screen, so it
    /// covers more stage when zoomed out.
    pub fn keyboard_pan(&mut self, direction: PanDirection) {
        let step = self.config.pan_step / self.zoom;
        match direction {
            PanDirection::Up => self.pan(0.0, -step),
            PanDirection::Down => self.pan(0.0, step),
            PanDirection::Left => self.pan(-step, 0.0),
            PanDirection::Right => self.pan(step, 0.0),
        }
    }

    /// Drag the stage along with the mouse by a relative motion in pixels.
    pub fn mouse_pan(&mut self, rel_x: i32, rel_y: i32) {
        self.pan(-(rel_x as f32) / self.zoom, -(rel_y as f32) / self.zoom);
    }

    /// Zoom by `wheel_step ^ precise_y` around the cursor.
    pub fn wheel_zoom(&mut self, precise_y: f32, ax: f32, ay: f32) {
        if precise_y == 0.0 {
            return;
        }
        self.zoom_by(self.config.wheel_step.powf(precise_y), ax, ay);
    }
}
