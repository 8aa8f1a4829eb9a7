//! Mock collaborators shared by the unit tests of this crate.

use crate::graphics::{GraphicsBackend, Quad, TextureId};
use crate::instrument::{InitContext, InstrumentKind, InstrumentState};
use crate::voice::{BindError, BindStep, Voice, VoiceBinder, VoiceConfig};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vorchestra_midi::Note;

#[derive(Default)]
pub struct MockGraphics {
    next: u64,
    live: HashMap<TextureId, PathBuf>,
    sizes: HashMap<PathBuf, (u32, u32)>,
    failing: HashSet<PathBuf>,
    draws: Vec<(TextureId, Quad)>,
}

impl MockGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&mut self, path: &str) {
        self.failing.insert(PathBuf::from(path));
    }

    pub fn set_size(&mut self, path: &str, width: u32, height: u32) {
        self.sizes.insert(PathBuf::from(path), (width, height));
    }

    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Most recently loaded live texture for `path`.
    pub fn texture_for(&self, path: &str) -> Option<TextureId> {
        self.live
            .iter()
            .filter(|(_, p)| p.as_path() == Path::new(path))
            .map(|(id, _)| *id)
            .max()
    }

    pub fn draws(&self) -> Vec<(TextureId, Quad)> {
        self.draws.clone()
    }
}

impl GraphicsBackend for MockGraphics {
    fn load_texture(&mut self, path: &Path) -> Result<TextureId> {
        if self.failing.contains(path) {
            return Err(Error::resource_load(path, "mock decode failure"));
        }
        self.next += 1;
        let id = TextureId(self.next);
        self.live.insert(id, path.to_path_buf());
        Ok(id)
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.live.remove(&texture);
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        let path = self.live.get(&texture)?;
        Some(self.sizes.get(path).copied().unwrap_or((32, 32)))
    }

    fn draw(&mut self, texture: TextureId, quad: Quad) {
        self.draws.push((texture, quad));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEvent {
    On(u8, u8),
    Off(u8),
    AllOff,
    Dropped,
}

#[derive(Default)]
struct BinderLog {
    events: Vec<VoiceEvent>,
    live: usize,
}

struct MockVoice {
    log: Arc<Mutex<BinderLog>>,
}

impl Voice for MockVoice {
    fn note_on(&mut self, key: u8, velocity: u8) {
        self.log.lock().events.push(VoiceEvent::On(key, velocity));
    }

    fn note_off(&mut self, key: u8) {
        self.log.lock().events.push(VoiceEvent::Off(key));
    }

    fn all_notes_off(&mut self) {
        self.log.lock().events.push(VoiceEvent::AllOff);
    }
}

impl Drop for MockVoice {
    fn drop(&mut self) {
        let mut log = self.log.lock();
        log.events.push(VoiceEvent::Dropped);
        log.live -= 1;
    }
}

#[derive(Default)]
pub struct MockBinder {
    fail_at: Option<BindStep>,
    log: Arc<Mutex<BinderLog>>,
}

impl MockBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(step: BindStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<VoiceEvent> {
        self.log.lock().events.clone()
    }

    pub fn live_voices(&self) -> usize {
        self.log.lock().live
    }
}

impl VoiceBinder for MockBinder {
    fn bind(&self, _config: &VoiceConfig) -> std::result::Result<Box<dyn Voice>, BindError> {
        if let Some(step) = self.fail_at {
            return Err(BindError::new(step, "mock failure"));
        }
        self.log.lock().live += 1;
        Ok(Box::new(MockVoice {
            log: Arc::clone(&self.log),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteCall {
    Play(Note),
    Release(Note),
}

pub type NoteLog = Arc<Mutex<Vec<NoteCall>>>;

/// Loads the given layers in order and forwards notes to its voice.
pub struct ScriptedKind {
    layers: Vec<PathBuf>,
    voice: bool,
    log: NoteLog,
}

impl ScriptedKind {
    pub fn new(layers: &[&str]) -> Self {
        Self {
            layers: layers.iter().map(PathBuf::from).collect(),
            voice: false,
            log: NoteLog::default(),
        }
    }

    pub fn boxed(layers: &[&str]) -> Box<dyn InstrumentKind> {
        Box::new(Self::new(layers))
    }

    pub fn with_voice(mut self) -> Self {
        self.voice = true;
        self
    }

    pub fn with_log(mut self, log: NoteLog) -> Self {
        self.log = log;
        self
    }
}

impl InstrumentKind for ScriptedKind {
    fn name(&self) -> &str {
        "scripted"
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        if self.voice {
            ctx.bind_voice(VoiceConfig::default())?;
        }
        for (z, path) in self.layers.iter().enumerate() {
            ctx.add_layer(path, 0, 0, z as i32)?;
        }
        Ok(())
    }

    fn play_note(&mut self, state: &mut InstrumentState, note: Note) -> Result<()> {
        self.log.lock().push(NoteCall::Play(note));
        state.sound_note_on(note);
        Ok(())
    }

    fn release_note(&mut self, state: &mut InstrumentState, note: Note) -> Result<()> {
        self.log.lock().push(NoteCall::Release(note));
        state.sound_note_off(note);
        Ok(())
    }
}
