//! Pitch classes, notes and MIDI key math.
//!
//! A pitch is a [`PitchClass`] (one of the 12 chromatic semitones) plus an
//! octave. The MIDI key is derived, never stored independently:
//!
//! ```ignore
//! use vorchestra_midi::{to_midi_key, PitchClass};
//!
//! assert_eq!(to_midi_key(PitchClass::C, 4), 60); // middle C
//! assert_eq!(to_midi_key(PitchClass::A, 4), 69); // concert A
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of pitch classes in an octave.
pub const PITCH_CLASSES: i32 = 12;

/// Chromatic pitch class, 0 = C.
///
/// Sharps are named with an `s` suffix; the flat spelling is the same class
/// (`Cs` is also D flat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PitchClass {
    C = 0,
    Cs = 1,
    D = 2,
    Ds = 3,
    E = 4,
    F = 5,
    Fs = 6,
    G = 7,
    Gs = 8,
    A = 9,
    As = 10,
    B = 11,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Returns `None` for values above 11.
    pub const fn new(value: u8) -> Option<PitchClass> {
        if value > 11 {
            return None;
        }
        Some(Self::ALL[value as usize])
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// True for the seven letter names, false for the five accidentals
    /// (the black keys of a piano).
    pub const fn is_natural(self) -> bool {
        !matches!(
            self,
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        PitchClass::new(value).ok_or(Error::InvalidPitchClass(value))
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc as u8
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `(octave + 1) * 12 + pitch_class`. May fall outside 0-127 for extreme octaves.
pub const fn to_midi_key(pitch_class: PitchClass, octave: i32) -> i32 {
    (octave + 1) * PITCH_CLASSES + pitch_class as i32
}

/// Inverse of [`to_midi_key`]; floors toward negative infinity so every key
/// maps back to the pair it came from.
pub const fn from_midi_key(key: i32) -> (PitchClass, i32) {
    let pc = key.rem_euclid(PITCH_CLASSES) as usize;
    let octave = key.div_euclid(PITCH_CLASSES) - 1;
    (PitchClass::ALL[pc], octave)
}

/// A pitch with an optional loudness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i8,
    /// 0-127; `None` lets the instrument pick from its dynamic level.
    pub velocity: Option<u8>,
}

impl Note {
    pub const fn new(pitch_class: PitchClass, octave: i8) -> Self {
        Self {
            pitch_class,
            octave,
            velocity: None,
        }
    }

    pub const fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = Some(if velocity > 127 { 127 } else { velocity });
        self
    }

    /// Build from a MIDI key (0-127).
    pub const fn from_midi(key: u8) -> Self {
        let (pitch_class, octave) = from_midi_key(key as i32);
        Self::new(pitch_class, octave as i8)
    }

    pub const fn midi_key(&self) -> i32 {
        to_midi_key(self.pitch_class, self.octave as i32)
    }

    /// Returns `None` if the key is outside the MIDI range.
    pub fn midi_key_u8(&self) -> Option<u8> {
        u8::try_from(self.midi_key()).ok().filter(|k| *k <= 127)
    }

    pub const fn is_natural(&self) -> bool {
        self.pitch_class.is_natural()
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}
