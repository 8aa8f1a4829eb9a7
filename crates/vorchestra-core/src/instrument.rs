//! Instruments and the behaviour trait each kind implements.

use crate::graphics::GraphicsBackend;
use crate::layer::{LayerIndex, LayerSet};
use crate::voice::{VoiceBinder, VoiceBinding, VoiceConfig, DYNAMIC_LOUDEST, DYNAMIC_QUIETEST};
use crate::Result;
use std::fmt;
use std::path::Path;
use tracing::debug;
use vorchestra_midi::{ComplexNote, Note};

/// Registry-assigned instrument id. Never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrumentId(pub(crate) u32);

impl InstrumentId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything an instrument owns apart from its behaviour.
#[derive(Debug)]
pub struct InstrumentState {
    id: InstrumentId,
    pub x: f32,
    pub y: f32,
    pub layers: LayerSet,
    pub voice: Option<VoiceBinding>,
    dynamic: u8,
}

impl InstrumentState {
    pub(crate) fn new(id: InstrumentId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            layers: LayerSet::new(),
            voice: None,
            dynamic: DYNAMIC_LOUDEST,
        }
    }

    pub fn id(&self) -> InstrumentId {
        self.id
    }

    /// 1 = loudest, 8 = quietest.
    pub fn dynamic(&self) -> u8 {
        self.dynamic
    }

    pub fn set_dynamic(&mut self, dynamic: u8) {
        self.dynamic = dynamic.clamp(DYNAMIC_LOUDEST, DYNAMIC_QUIETEST);
    }

    /// Forward a note-on to the bound voice, if any.
    pub fn sound_note_on(&mut self, note: Note) {
        let dynamic = self.dynamic;
        if let Some(voice) = self.voice.as_mut() {
            voice.note_on(
                note.pitch_class,
                note.octave as i32,
                note.velocity,
                dynamic,
            );
        }
    }

    /// Forward a note-off to the bound voice, if any.
    pub fn sound_note_off(&mut self, note: Note) {
        if let Some(voice) = self.voice.as_mut() {
            voice.note_off(note.pitch_class, note.octave as i32);
        }
    }
}

/// Collaborators available while an instrument kind builds itself.
pub struct InitContext<'a> {
    pub state: &'a mut InstrumentState,
    pub graphics: &'a mut dyn GraphicsBackend,
    pub voices: &'a dyn VoiceBinder,
}

impl InitContext<'_> {
    pub fn add_layer(
        &mut self,
        path: impl AsRef<Path>,
        offset_x: i32,
        offset_y: i32,
        z_layer: i32,
    ) -> Result<LayerIndex> {
        self.state
            .layers
            .add_layer(&mut *self.graphics, path.as_ref(), offset_x, offset_y, z_layer)
    }

    /// Bind a voice for this instrument, replacing any previous one.
    pub fn bind_voice(&mut self, config: VoiceConfig) -> Result<()> {
        let binding = VoiceBinding::bind(self.voices, config)?;
        if let Some(old) = self.state.voice.replace(binding) {
            old.release();
        }
        Ok(())
    }
}

/// Behaviour of one kind of instrument.
///
/// A kind owns whatever it needs to map notes to its layers (a piano keeps
/// its key layer indices, for example). `init` runs once inside
/// [`InstrumentRegistry::create`](crate::InstrumentRegistry::create); anything
/// it loaded is released by the registry if it fails.
pub trait InstrumentKind: Send {
    fn name(&self) -> &str;

    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<()>;

    /// Runs before the registry releases the voice and layers.
    fn fini(&mut self, _state: &mut InstrumentState) -> Result<()> {
        Ok(())
    }

    fn play_note(&mut self, state: &mut InstrumentState, note: Note) -> Result<()>;

    fn release_note(&mut self, state: &mut InstrumentState, note: Note) -> Result<()>;
}

pub struct Instrument {
    pub(crate) kind: Box<dyn InstrumentKind>,
    pub(crate) state: InstrumentState,
    pub(crate) score: Vec<ComplexNote>,
}

impl fmt::Debug for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrument")
            .field("kind", &self.kind.name())
            .field("state", &self.state)
            .field("score", &self.score.len())
            .finish()
    }
}

impl Instrument {
    pub fn id(&self) -> InstrumentId {
        self.state.id
    }

    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    pub fn position(&self) -> (f32, f32) {
        (self.state.x, self.state.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.state.x = x;
        self.state.y = y;
    }

    pub fn state(&self) -> &InstrumentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InstrumentState {
        &mut self.state
    }

    pub fn layers(&self) -> &LayerSet {
        &self.state.layers
    }

    pub fn dynamic(&self) -> u8 {
        self.state.dynamic()
    }

    pub fn set_dynamic(&mut self, dynamic: u8) {
        self.state.set_dynamic(dynamic);
    }

    pub fn has_voice(&self) -> bool {
        self.state.voice.is_some()
    }

    pub fn play_note(&mut self, note: Note) -> Result<()> {
        self.kind.play_note(&mut self.state, note)
    }

    pub fn release_note(&mut self, note: Note) -> Result<()> {
        self.kind.release_note(&mut self.state, note)
    }

    /// The notes loaded for playback.
    pub fn score(&self) -> &[ComplexNote] {
        &self.score
    }

    pub(crate) fn set_score(&mut self, score: Vec<ComplexNote>) {
        self.score = score;
    }

    /// Sync every score note with the playback clock.
    pub(crate) fn advance_score(&mut self, clock_ms: u64) {
        let Self { kind, state, score } = self;

        for note in score.iter_mut() {
            if note.playing && note.end_ms <= clock_ms {
                note.playing = false;
                if let Err(e) = kind.release_note(state, note.note) {
                    debug!("{} {}: release {} failed: {}", kind.name(), state.id, note.note, e);
                }
                continue;
            }

            if !note.playing && note.contains(clock_ms) {
                note.playing = true;
                if let Err(e) = kind.play_note(state, note.note) {
                    debug!("{} {}: play {} failed: {}", kind.name(), state.id, note.note, e);
                }
            }
        }
    }

    /// Release every sounding score note. Returns how many were released.
    pub(crate) fn release_score(&mut self) -> usize {
        let Self { kind, state, score } = self;
        let mut released = 0;

        for note in score.iter_mut().filter(|n| n.playing) {
            note.playing = false;
            released += 1;
            if let Err(e) = kind.release_note(state, note.note) {
                debug!("{} {}: release {} failed: {}", kind.name(), state.id, note.note, e);
            }
        }

        released
    }
}
