//! SoundFont synthesizer wrapper

use crate::bus::Render;
use crate::error::{Error, Result};
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::sync::Arc;

const CONTROL_CHANGE: i32 = 0xB0;
const PROGRAM_CHANGE: i32 = 0xC0;
const BANK_SELECT_MSB: i32 = 0x00;

/// SoundFont synthesizer wrapper.
pub struct SoundFontSynth {
    synthesizer: Synthesizer,
}

impl SoundFontSynth {
    /// Create a new SoundFont synthesizer.
    pub fn new(soundfont: &Arc<SoundFont>, settings: &SynthesizerSettings) -> Result<Self> {
        let synthesizer = Synthesizer::new(soundfont, settings)
            .map_err(|e| Error::Synth(format!("Failed to create synthesizer: {}", e)))?;
        Ok(Self { synthesizer })
    }

    /// Note on.
    pub fn note_on(&mut self, channel: i32, key: i32, velocity: i32) {
        self.synthesizer.note_on(channel, key, velocity);
    }

    /// Note off
    ///
    /// # Arguments
    /// * `channel` - MIDI channel (0-15)
    /// * `key` - MIDI note number (0-127)
    pub fn note_off(&mut self, channel: i32, key: i32) {
        self.synthesizer.note_off(channel, key);
    }

    /// Select a bank (CC 0). Takes effect on the next program change.
    pub fn bank_select(&mut self, channel: i32, bank: i32) {
        self.synthesizer
            .process_midi_message(channel, CONTROL_CHANGE, BANK_SELECT_MSB, bank);
    }

    /// Change MIDI program (preset).
    pub fn program_change(&mut self, channel: i32, preset: i32) {
        self.synthesizer
            .process_midi_message(channel, PROGRAM_CHANGE, preset, 0);
    }

    /// Release every sounding note on every channel.
    pub fn all_notes_off(&mut self) {
        self.synthesizer.note_off_all(false);
    }
}

impl Render for SoundFontSynth {
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        self.synthesizer
            .render(&mut left[..frames], &mut right[..frames]);
    }
}
