//! Five-octave piano.
//!
//! 61 keys from C2 to C7. Every key has a normal layer and a pressed layer
//! on top of it; pressing a key fades its pressed layer in.
//!
//! ```text
//! z 0  white keys          z 1  white keys pressed
//! z 2  black keys          z 3  black keys pressed
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use vorchestra_core::{
    Error, InitContext, InstrumentKind, InstrumentState, LayerIndex, Result, VoiceConfig,
};
use vorchestra_midi::{Note, PitchClass};

/// Width of one octave of key textures, in pixels.
pub const OCTAVE_WIDTH: i32 = 217;
/// Width of a white key texture, in pixels.
pub const WHITE_KEY_WIDTH: i32 = 31;
pub const LOWEST_OCTAVE: i8 = 2;
pub const HIGHEST_OCTAVE: i8 = 6;
pub const KEY_COUNT: usize = 61;

/// Opacity of a pressed-key layer while the key is down.
pub const PRESSED_OPACITY: u8 = 60;

const LOWEST_KEY: i32 = (LOWEST_OCTAVE as i32 + 1) * 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PianoConfig {
    /// Directory holding the four key textures.
    pub asset_dir: PathBuf,
    /// Voice to bind; `None` builds a silent piano.
    pub voice: Option<VoiceConfig>,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("res/instrument/piano"),
            voice: None,
        }
    }
}

impl PianoConfig {
    pub fn with_voice(mut self, voice: VoiceConfig) -> Self {
        self.voice = Some(voice);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct KeyLayers {
    normal: LayerIndex,
    pressed: LayerIndex,
}

/// Horizontal offset of a key within its octave.
fn key_offset(pitch_class: PitchClass) -> i32 {
    match pitch_class {
        PitchClass::C => 0,
        PitchClass::Cs => 14,
        PitchClass::D => WHITE_KEY_WIDTH,
        PitchClass::Ds => 49,
        PitchClass::E => 2 * WHITE_KEY_WIDTH,
        PitchClass::F => 3 * WHITE_KEY_WIDTH,
        PitchClass::Fs => 107,
        PitchClass::G => 4 * WHITE_KEY_WIDTH,
        PitchClass::Gs => 140,
        PitchClass::A => 5 * WHITE_KEY_WIDTH,
        PitchClass::As => 173,
        PitchClass::B => 6 * WHITE_KEY_WIDTH,
    }
}

pub struct Piano {
    config: PianoConfig,
    keys: Vec<KeyLayers>,
}

impl Piano {
    pub fn new(config: PianoConfig) -> Self {
        Self {
            config,
            keys: Vec::with_capacity(KEY_COUNT),
        }
    }

    /// Index into the key table, or `None` outside C2..=C7.
    pub fn key_index(note: Note) -> Option<usize> {
        let octave = note.octave;
        let in_range = (LOWEST_OCTAVE..=HIGHEST_OCTAVE).contains(&octave)
            || (octave == HIGHEST_OCTAVE + 1 && note.pitch_class == PitchClass::C);
        in_range.then(|| (note.midi_key() - LOWEST_KEY) as usize)
    }

    /// Normal and pressed layers of a key, once initialized.
    pub fn key_layers(&self, note: Note) -> Option<(LayerIndex, LayerIndex)> {
        let key = self.keys.get(Self::key_index(note)?)?;
        Some((key.normal, key.pressed))
    }

    fn pressed_layer(&self, note: Note) -> Result<LayerIndex> {
        Self::key_index(note)
            .and_then(|i| self.keys.get(i))
            .map(|k| k.pressed)
            .ok_or_else(|| Error::NoteOutOfRange {
                kind: self.name().to_string(),
                note,
            })
    }

    fn load_key(
        &mut self,
        ctx: &mut InitContext<'_>,
        pitch_class: PitchClass,
        x: i32,
    ) -> Result<()> {
        let (texture, pressed_texture, z) = if pitch_class.is_natural() {
            ("whitekey.png", "whitekey-pressed.png", 0)
        } else {
            ("blackkey.png", "blackkey-pressed.png", 2)
        };

        let dir = &self.config.asset_dir;
        let normal = ctx.add_layer(dir.join(texture), x, 0, z)?;
        let pressed = ctx.add_layer(dir.join(pressed_texture), x, 0, z + 1)?;
        ctx.state.layers.set_opacity(pressed, 0);

        self.keys.push(KeyLayers { normal, pressed });
        Ok(())
    }
}

impl Default for Piano {
    fn default() -> Self {
        Self::new(PianoConfig::default())
    }
}

impl InstrumentKind for Piano {
    fn name(&self) -> &str {
        "piano"
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        self.keys.clear();

        let octaves = (HIGHEST_OCTAVE - LOWEST_OCTAVE + 1) as i32;
        for octave in 0..octaves {
            for pitch_class in PitchClass::ALL {
                self.load_key(ctx, pitch_class, octave * OCTAVE_WIDTH + key_offset(pitch_class))?;
            }
        }
        self.load_key(ctx, PitchClass::C, octaves * OCTAVE_WIDTH)?;

        if let Some(voice) = self.config.voice.clone() {
            ctx.bind_voice(voice)?;
        }

        debug!(
            "Piano {} initialized with {} keys",
            ctx.state.id(),
            self.keys.len()
        );
        Ok(())
    }

    fn fini(&mut self, state: &mut InstrumentState) -> Result<()> {
        debug!("Piano {} destroyed", state.id());
        self.keys.clear();
        Ok(())
    }

    /// Show the pressed key and sound it. A velocity carried by the note,
    /// such as one read from a MIDI file, wins over the piano's dynamic.
    fn play_note(&mut self, state: &mut InstrumentState, note: Note) -> Result<()> {
        let pressed = self.pressed_layer(note)?;
        state.layers.set_opacity(pressed, PRESSED_OPACITY);
        state.sound_note_on(note);
        Ok(())
    }

    fn release_note(&mut self, state: &mut InstrumentState, note: Note) -> Result<()> {
        let pressed = self.pressed_layer(note)?;
        state.layers.set_opacity(pressed, 0);
        state.sound_note_off(note);
        Ok(())
    }
}
