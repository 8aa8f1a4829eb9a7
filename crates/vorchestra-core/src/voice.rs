//! Audio voice binding.
//!
//! An instrument that makes sound owns one [`VoiceBinding`]: a synthesizer
//! voice created by a [`VoiceBinder`] from a SoundFont, bank and preset. Notes
//! reach the voice as single MIDI keys on channel 0.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};
use vorchestra_midi::{to_midi_key, PitchClass};

/// Loudest dynamic level.
pub const DYNAMIC_LOUDEST: u8 = 1;
/// Quietest dynamic level.
pub const DYNAMIC_QUIETEST: u8 = 8;

/// Default note-on velocity for a dynamic level (1 = loudest, 8 = quietest).
///
/// Levels outside 1..=8 are clamped.
pub const fn dynamic_velocity(dynamic: u8) -> u8 {
    let level = if dynamic < DYNAMIC_LOUDEST {
        DYNAMIC_LOUDEST
    } else if dynamic > DYNAMIC_QUIETEST {
        DYNAMIC_QUIETEST
    } else {
        dynamic
    };
    127 - (level - 1) * (127 / 8)
}

/// A playable synthesizer voice. Channel 0 is implied.
pub trait Voice: Send {
    fn note_on(&mut self, key: u8, velocity: u8);
    fn note_off(&mut self, key: u8);
    fn all_notes_off(&mut self);
}

/// Factory for voices.
pub trait VoiceBinder {
    fn bind(&self, config: &VoiceConfig) -> std::result::Result<Box<dyn Voice>, BindError>;
}

impl<T: VoiceBinder + ?Sized> VoiceBinder for std::sync::Arc<T> {
    fn bind(&self, config: &VoiceConfig) -> std::result::Result<Box<dyn Voice>, BindError> {
        (**self).bind(config)
    }
}

/// What to load into a voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub soundfont: PathBuf,
    pub bank: u8,
    pub preset: u8,
    /// Maximum simultaneous synthesizer voices.
    pub polyphony: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            soundfont: PathBuf::from("res/soundfont/default.sf2"),
            bank: 0,
            preset: 0,
            polyphony: 256,
        }
    }
}

impl VoiceConfig {
    pub fn new(soundfont: impl Into<PathBuf>) -> Self {
        Self {
            soundfont: soundfont.into(),
            ..Self::default()
        }
    }

    pub fn bank(mut self, bank: u8) -> Self {
        self.bank = bank;
        self
    }

    pub fn preset(mut self, preset: u8) -> Self {
        self.preset = preset;
        self
    }

    pub fn polyphony(mut self, polyphony: usize) -> Self {
        self.polyphony = polyphony;
        self
    }
}

/// Stage of voice creation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindStep {
    LoadSoundFont,
    SetPolyphony,
    CreateSynth,
    SelectPreset,
}

impl fmt::Display for BindStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BindStep::LoadSoundFont => "load soundfont",
            BindStep::SetPolyphony => "set polyphony",
            BindStep::CreateSynth => "create synthesizer",
            BindStep::SelectPreset => "select preset",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step} failed: {reason}")]
pub struct BindError {
    pub step: BindStep,
    pub reason: String,
}

impl BindError {
    pub fn new(step: BindStep, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }
}

/// A bound voice plus the configuration it was created from.
pub struct VoiceBinding {
    voice: Box<dyn Voice>,
    config: VoiceConfig,
}

impl fmt::Debug for VoiceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceBinding")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VoiceBinding {
    pub fn bind(binder: &dyn VoiceBinder, config: VoiceConfig) -> Result<Self> {
        let voice = binder.bind(&config)?;
        debug!(
            "Bound voice: '{}' bank {} preset {}",
            config.soundfont.display(),
            config.bank,
            config.preset
        );
        Ok(Self { voice, config })
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Start a note. Without an explicit velocity the dynamic level decides.
    pub fn note_on(
        &mut self,
        pitch_class: PitchClass,
        octave: i32,
        velocity: Option<u8>,
        dynamic: u8,
    ) {
        let Some(key) = midi_key(pitch_class, octave) else {
            return;
        };
        let velocity = velocity.map_or_else(|| dynamic_velocity(dynamic), |v| v.min(127));
        self.voice.note_on(key, velocity);
    }

    pub fn note_off(&mut self, pitch_class: PitchClass, octave: i32) {
        if let Some(key) = midi_key(pitch_class, octave) {
            self.voice.note_off(key);
        }
    }

    pub fn all_notes_off(&mut self) {
        self.voice.all_notes_off();
    }

    /// Silence the voice and give it back to its binder.
    pub fn release(mut self) {
        self.voice.all_notes_off();
        debug!("Released voice '{}'", self.config.soundfont.display());
    }
}

fn midi_key(pitch_class: PitchClass, octave: i32) -> Option<u8> {
    let key = to_midi_key(pitch_class, octave);
    match u8::try_from(key) {
        Ok(key) if key <= 127 => Some(key),
        _ => {
            warn!("{}{} (key {}) is outside the MIDI range", pitch_class, octave, key);
            None
        }
    }
}
