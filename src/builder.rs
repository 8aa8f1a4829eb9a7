//! Builder for configuring and constructing an `OrchestraEngine`.

use crate::config::EngineConfig;
use crate::engine::missing;
use crate::{OrchestraEngine, Result};
use std::sync::Arc;
use tracing::info;
use vorchestra_core::{Camera, GraphicsBackend, VoiceBinder};
use vorchestra_synth::{SoundFontSystem, SynthBus};

#[cfg(feature = "output")]
use tracing::warn;
#[cfg(feature = "output")]
use vorchestra_synth::{AudioOutput, AudioOutputConfig};

/// A graphics backend is required. Without a custom voice binder the engine
/// creates its own [`SoundFontSystem`] and, with the `output` feature and
/// `audio_output` enabled, opens an audio device to play it.
///
/// The sample rate comes from the audio device when one opens, otherwise
/// from [`EngineConfig::fallback_sample_rate`].
///
/// # Example
///
/// ```ignore
/// use vorchestra::prelude::*;
///
/// let engine = OrchestraEngine::builder()
///     .graphics(Box::new(backend))
///     .output_device(1)
///     .build()?;
///
/// let sr = engine.sample_rate(); // e.g. 44100 or 48000
/// ```
#[derive(Default)]
pub struct OrchestraEngineBuilder {
    config: EngineConfig,
    graphics: Option<Box<dyn GraphicsBackend>>,
    voices: Option<Box<dyn VoiceBinder>>,
    #[cfg_attr(not(feature = "output"), allow(dead_code))]
    output_device: Option<usize>,
}

impl OrchestraEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graphics(mut self, graphics: Box<dyn GraphicsBackend>) -> Self {
        self.graphics = Some(graphics);
        self
    }

    /// Bind instrument voices through `voices` instead of SoundFonts.
    /// No audio device is opened.
    pub fn voice_binder(mut self, voices: Box<dyn VoiceBinder>) -> Self {
        self.voices = Some(voices);
        self
    }

    /// Output device index. Default: system default device
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    pub fn build(self) -> Result<OrchestraEngine> {
        self.config.validate()?;
        let graphics = self.graphics.ok_or_else(|| missing("graphics backend"))?;
        let camera = Camera::new(self.config.camera)?;

        if let Some(voices) = self.voices {
            let sample_rate = self.config.fallback_sample_rate;
            info!("OrchestraEngine built with custom voice binder");
            return Ok(OrchestraEngine::from_parts(
                self.config,
                camera,
                graphics,
                voices,
                None,
                sample_rate,
                #[cfg(feature = "output")]
                None,
            ));
        }

        #[cfg(feature = "output")]
        let output = if self.config.audio_output {
            open_output(self.output_device)
        } else {
            None
        };

        #[cfg(feature = "output")]
        let sample_rate = output
            .as_ref()
            .map_or(self.config.fallback_sample_rate, AudioOutput::sample_rate);
        #[cfg(not(feature = "output"))]
        let sample_rate = self.config.fallback_sample_rate;

        let bus = Arc::new(SynthBus::new(self.config.gain));
        let soundfonts = Arc::new(SoundFontSystem::with_bus(sample_rate, Arc::clone(&bus)));

        #[cfg(feature = "output")]
        let output = output.and_then(|mut output| match output.start(bus) {
            Ok(()) => Some(output),
            Err(e) => {
                warn!("Audio output failed to start, running silent: {}", e);
                None
            }
        });

        info!("OrchestraEngine built at {} Hz", sample_rate);
        Ok(OrchestraEngine::from_parts(
            self.config,
            camera,
            graphics,
            Box::new(Arc::clone(&soundfonts)),
            Some(soundfonts),
            sample_rate,
            #[cfg(feature = "output")]
            output,
        ))
    }
}

#[cfg(feature = "output")]
fn open_output(device: Option<usize>) -> Option<AudioOutput> {
    match AudioOutput::new(AudioOutputConfig {
        output_device_index: device,
    }) {
        Ok(output) => Some(output),
        Err(e) => {
            warn!("No audio output device, running silent: {}", e);
            None
        }
    }
}
