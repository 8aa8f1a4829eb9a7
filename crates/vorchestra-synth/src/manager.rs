//! SoundFont file management and voice creation

use crate::bus::SynthBus;
use crate::error::{Error, Result, SoundFontError};
use crate::info::SoundFontInfo;
use crate::synth::SoundFontSynth;
use crate::voice::SoundFontVoice;
use core::sync::atomic::{AtomicUsize, Ordering};
use dashmap::DashMap;
use rustysynth::{SoundFont, SynthesizerSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use vorchestra_core::{BindError, BindStep, Voice, VoiceBinder, VoiceConfig};

/// Polyphony range accepted by the synthesizer.
pub const MIN_POLYPHONY: usize = 8;
pub const MAX_POLYPHONY: usize = 256;

/// Handle to a loaded SoundFont
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundFontHandle(usize);

impl SoundFontHandle {
    /// Get the internal ID (for debugging/logging only)
    pub fn id(&self) -> usize {
        self.0
    }
}

#[derive(Clone)]
struct LoadedSoundFont {
    soundfont: Arc<SoundFont>,
    info: Arc<SoundFontInfo>,
}

/// SoundFont cache and voice factory.
///
/// Each file is parsed once; every voice bound from it gets its own
/// synthesizer on the shared [`SynthBus`].
pub struct SoundFontSystem {
    sample_rate: u32,
    soundfonts: DashMap<usize, LoadedSoundFont>,
    path_to_handle: DashMap<PathBuf, SoundFontHandle>,
    next_handle: AtomicUsize,
    bus: Arc<SynthBus>,
}

impl SoundFontSystem {
    pub fn new(sample_rate: u32) -> Self {
        Self::with_bus(sample_rate, Arc::new(SynthBus::default()))
    }

    pub fn with_bus(sample_rate: u32, bus: Arc<SynthBus>) -> Self {
        Self {
            sample_rate,
            soundfonts: DashMap::new(),
            path_to_handle: DashMap::new(),
            next_handle: AtomicUsize::new(0),
            bus,
        }
    }

    /// Load a SoundFont from file or return existing handle.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<SoundFontHandle> {
        let path = path.as_ref().to_path_buf();

        if let Some(handle) = self.path_to_handle.get(&path) {
            return Ok(*handle);
        }

        if !path.exists() {
            return Err(SoundFontError::MissingFile(path).into());
        }
        let data = std::fs::read(&path)?;

        let info = Arc::new(SoundFontInfo::parse(&data)?);
        let soundfont = Arc::new(SoundFont::new(&mut data.as_slice()).map_err(|e| {
            Error::Synth(format!(
                "Failed to parse SoundFont file '{}': {}",
                path.display(),
                e
            ))
        })?);

        let handle_id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let handle = SoundFontHandle(handle_id);

        self.soundfonts
            .insert(handle_id, LoadedSoundFont { soundfont, info });
        info!("Loaded SoundFont '{}' as {}", path.display(), handle_id);
        self.path_to_handle.insert(path, handle);

        Ok(handle)
    }

    /// Header information of a loaded SoundFont.
    pub fn info(&self, handle: &SoundFontHandle) -> Option<Arc<SoundFontInfo>> {
        self.soundfonts
            .get(&handle.0)
            .map(|entry| entry.info.clone())
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The bus every voice renders into.
    pub fn bus(&self) -> &Arc<SynthBus> {
        &self.bus
    }

    /// Synthesizer settings for one voice.
    pub fn settings(&self, polyphony: usize) -> SynthesizerSettings {
        let mut settings = SynthesizerSettings::new(self.sample_rate as i32);
        settings.maximum_polyphony = polyphony;
        settings
    }

    /// Get the number of loaded SoundFonts
    pub fn len(&self) -> usize {
        self.soundfonts.len()
    }

    /// Check if no SoundFonts are loaded
    pub fn is_empty(&self) -> bool {
        self.soundfonts.is_empty()
    }

    fn bind_voice(&self, config: &VoiceConfig) -> std::result::Result<SoundFontVoice, BindError> {
        let handle = self
            .load(&config.soundfont)
            .map_err(|e| BindError::new(BindStep::LoadSoundFont, e.to_string()))?;
        let loaded = self
            .soundfonts
            .get(&handle.0)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BindError::new(BindStep::LoadSoundFont, "SoundFont was unloaded"))?;

        check_polyphony(config.polyphony)?;

        let mut synth = SoundFontSynth::new(&loaded.soundfont, &self.settings(config.polyphony))
            .map_err(|e| BindError::new(BindStep::CreateSynth, e.to_string()))?;

        if loaded
            .info
            .find_preset(config.bank as u16, config.preset as u16)
            .is_none()
        {
            return Err(BindError::new(
                BindStep::SelectPreset,
                format!(
                    "no preset {}:{} in '{}'",
                    config.bank,
                    config.preset,
                    config.soundfont.display()
                ),
            ));
        }
        synth.bank_select(0, config.bank as i32);
        synth.program_change(0, config.preset as i32);

        debug!(
            "Created synth for '{}' {}:{} ({} voices)",
            config.soundfont.display(),
            config.bank,
            config.preset,
            config.polyphony
        );

        Ok(SoundFontVoice::attach(synth, Arc::clone(&self.bus)))
    }
}

impl VoiceBinder for SoundFontSystem {
    fn bind(&self, config: &VoiceConfig) -> std::result::Result<Box<dyn Voice>, BindError> {
        Ok(Box::new(self.bind_voice(config)?))
    }
}

/// Reject polyphony the synthesizer cannot provide.
pub fn check_polyphony(polyphony: usize) -> std::result::Result<(), BindError> {
    if (MIN_POLYPHONY..=MAX_POLYPHONY).contains(&polyphony) {
        Ok(())
    } else {
        Err(BindError::new(
            BindStep::SetPolyphony,
            format!(
                "polyphony {} outside {}..={}",
                polyphony, MIN_POLYPHONY, MAX_POLYPHONY
            ),
        ))
    }
}
