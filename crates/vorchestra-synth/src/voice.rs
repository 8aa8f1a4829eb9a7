//! rustysynth-backed instrument voice.

use crate::bus::{BusSlot, SynthBus};
use crate::synth::SoundFontSynth;
use parking_lot::Mutex;
use std::sync::Arc;
use vorchestra_core::Voice;

const CHANNEL: i32 = 0;

/// A synthesizer attached to the bus for as long as the voice lives.
pub struct SoundFontVoice {
    synth: Arc<Mutex<SoundFontSynth>>,
    bus: Arc<SynthBus>,
    slot: BusSlot,
}

impl SoundFontVoice {
    pub(crate) fn attach(synth: SoundFontSynth, bus: Arc<SynthBus>) -> Self {
        let synth = Arc::new(Mutex::new(synth));
        let slot = bus.attach(synth.clone());
        Self { synth, bus, slot }
    }
}

impl Voice for SoundFontVoice {
    fn note_on(&mut self, key: u8, velocity: u8) {
        self.synth
            .lock()
            .note_on(CHANNEL, key as i32, velocity as i32);
    }

    fn note_off(&mut self, key: u8) {
        self.synth.lock().note_off(CHANNEL, key as i32);
    }

    fn all_notes_off(&mut self) {
        self.synth.lock().all_notes_off();
    }
}

impl Drop for SoundFontVoice {
    fn drop(&mut self) {
        self.bus.detach(self.slot);
    }
}
