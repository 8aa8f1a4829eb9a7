//! Test helpers and fixtures for vorchestra integration tests
//!
//! The engine owns its graphics backend and voice binder, so the mocks here
//! share their state with a handle the test keeps.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vorchestra::core::{BindError, BindStep, Voice};
use vorchestra::prelude::*;
use vorchestra::{GraphicsBackend, Quad, TextureId, VoiceBinder};

/// Size reported for textures without an explicit size.
pub const DEFAULT_TEXTURE_SIZE: (u32, u32) = (32, 32);

#[derive(Default)]
struct GraphicsState {
    next: u64,
    live: HashMap<TextureId, PathBuf>,
    failing: HashSet<PathBuf>,
    draws: Vec<(TextureId, Quad)>,
}

/// In-memory graphics backend; clones share one texture table.
#[derive(Clone, Default)]
pub struct MockGraphics {
    state: Arc<Mutex<GraphicsState>>,
}

impl MockGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.state.lock().failing.insert(path.as_ref().to_path_buf());
    }

    pub fn live_textures(&self) -> usize {
        self.state.lock().live.len()
    }

    pub fn draws(&self) -> Vec<(TextureId, Quad)> {
        self.state.lock().draws.clone()
    }

    pub fn clear_draws(&self) {
        self.state.lock().draws.clear();
    }

    pub fn boxed(&self) -> Box<dyn GraphicsBackend> {
        Box::new(self.clone())
    }
}

impl GraphicsBackend for MockGraphics {
    fn load_texture(&mut self, path: &Path) -> vorchestra::core::Result<TextureId> {
        let mut state = self.state.lock();
        if state.failing.contains(path) {
            return Err(vorchestra::core::Error::resource_load(path, "decode failed"));
        }
        state.next += 1;
        let id = TextureId(state.next);
        state.live.insert(id, path.to_path_buf());
        Ok(id)
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.state.lock().live.remove(&texture);
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.state
            .lock()
            .live
            .contains_key(&texture)
            .then_some(DEFAULT_TEXTURE_SIZE)
    }

    fn draw(&mut self, texture: TextureId, quad: Quad) {
        self.state.lock().draws.push((texture, quad));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEvent {
    On(u8, u8),
    Off(u8),
    AllOff,
}

#[derive(Default)]
struct VoiceLog {
    events: Vec<VoiceEvent>,
    live: usize,
}

struct RecordingVoice {
    log: Arc<Mutex<VoiceLog>>,
}

impl Voice for RecordingVoice {
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

impl Drop for RecordingVoice {
    fn drop(&mut self) {
        self.log.lock().live -= 1;
    }
}

/// Voice binder recording every event its voices receive.
#[derive(Clone, Default)]
pub struct RecordingBinder {
    fail_at: Option<BindStep>,
    log: Arc<Mutex<VoiceLog>>,
}

impl RecordingBinder {
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

    pub fn boxed(&self) -> Box<dyn VoiceBinder> {
        Box::new(self.clone())
    }
}

impl VoiceBinder for RecordingBinder {
    fn bind(&self, _config: &VoiceConfig) -> std::result::Result<Box<dyn Voice>, BindError> {
        if let Some(step) = self.fail_at {
            return Err(BindError::new(step, "rejected by test binder"));
        }
        self.log.lock().live += 1;
        Ok(Box::new(RecordingVoice {
            log: Arc::clone(&self.log),
        }))
    }
}

/// Route engine logs to the test harness; run with `--nocapture` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Headless engine wired to the given mocks.
pub fn test_engine(graphics: &MockGraphics, voices: &RecordingBinder) -> OrchestraEngine {
    init_tracing();
    OrchestraEngine::builder()
        .graphics(graphics.boxed())
        .voice_binder(voices.boxed())
        .build()
        .expect("Failed to create test engine")
}

/// Piano config with a voice from the test binder.
pub fn voiced_piano() -> PianoConfig {
    PianoConfig::default().with_voice(VoiceConfig::new("test.sf2"))
}

/// Format 1 Standard MIDI File, 500 ticks per beat (1 tick = 1 ms at the
/// default tempo), wrapping each raw track body.
pub fn smf(tracks: &[&[u8]]) -> Vec<u8> {
    let mut data = b"MThd".to_vec();
    data.extend_from_slice(&6u32.to_be_bytes());
    data.extend_from_slice(&1u16.to_be_bytes());
    data.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    data.extend_from_slice(&500u16.to_be_bytes());
    for track in tracks {
        data.extend_from_slice(b"MTrk");
        data.extend_from_slice(&(track.len() as u32).to_be_bytes());
        data.extend_from_slice(track);
    }
    data
}

/// End-of-track meta event with zero delta.
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Track body holding C4 from 0 to 100 ms and E4 from 100 to 300 ms.
pub fn two_note_track() -> Vec<u8> {
    let mut track = vec![
        0x00, 0x90, 0x3C, 0x64, // C4 on
        0x64, 0x80, 0x3C, 0x40, // 100 ticks, C4 off
        0x00, 0x90, 0x40, 0x50, // E4 on
        0x81, 0x48, 0x80, 0x40, 0x40, // 200 ticks, E4 off
    ];
    track.extend_from_slice(&END_OF_TRACK);
    track
}
