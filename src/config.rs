//! Engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use vorchestra_core::CameraConfig;

/// Runtime parameters for an [`OrchestraEngine`](crate::OrchestraEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    /// Sample rate used when no audio device is open.
    pub fallback_sample_rate: u32,
    /// Gain applied to every voice on the synth bus.
    pub gain: f32,
    /// Open the default audio device when the engine owns the SoundFonts.
    pub audio_output: bool,
    /// Octave the performance keys start at.
    pub base_octave: i8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            fallback_sample_rate: 44100,
            gain: 1.0,
            audio_output: true,
            base_octave: crate::input::DEFAULT_BASE_OCTAVE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.camera.validate()?;

        if !(8000..=192_000).contains(&self.fallback_sample_rate) {
            return Err(invalid(format!(
                "fallback_sample_rate {} outside 8000..=192000",
                self.fallback_sample_rate
            )));
        }
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(invalid(format!("gain {} must be non-negative", self.gain)));
        }
        if !(crate::input::MIN_BASE_OCTAVE..=crate::input::MAX_BASE_OCTAVE)
            .contains(&self.base_octave)
        {
            return Err(invalid(format!(
                "base_octave {} outside {}..={}",
                self.base_octave,
                crate::input::MIN_BASE_OCTAVE,
                crate::input::MAX_BASE_OCTAVE
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    vorchestra_core::Error::InvalidConfig(msg).into()
}
