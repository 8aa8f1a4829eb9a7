//! Timed note events used by file-driven playback.

use crate::note::Note;
use serde::{Deserialize, Serialize};

/// Articulation marks carried with a note. Reserved for dynamics shaping;
/// playback does not interpret them yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Articulation {
    pub accent: bool,
    pub staccato: bool,
    pub marcato: bool,
    pub forced_velocity: bool,
}

/// A note with a start/end window in milliseconds.
///
/// `end_ms >= start_ms` always holds. A note-on without a matching note-off
/// has `end_ms == start_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexNote {
    pub note: Note,
    pub midi_key: u8,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Set while playback holds the note down.
    pub playing: bool,
    pub articulation: Articulation,
}

impl ComplexNote {
    /// `end_ms` is raised to `start_ms` if it would precede it.
    pub fn new(midi_key: u8, velocity: u8, start_ms: u64, end_ms: u64) -> Self {
        let key = midi_key.min(127);
        Self {
            note: Note::from_midi(key).with_velocity(velocity),
            midi_key: key,
            start_ms,
            end_ms: end_ms.max(start_ms),
            playing: false,
            articulation: Articulation::default(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// True while `start_ms <= clock_ms <= end_ms`.
    pub fn contains(&self, clock_ms: u64) -> bool {
        self.start_ms <= clock_ms && clock_ms <= self.end_ms
    }
}
