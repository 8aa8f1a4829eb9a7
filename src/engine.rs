//! OrchestraEngine that ties input, playback, instruments and rendering together

use crate::config::EngineConfig;
use crate::input::{InputAction, InputSnapshot, KeyBindings};
use crate::instruments::{Piano, PianoConfig, TestInstrument};
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vorchestra_core::{
    Camera, GraphicsBackend, InstrumentId, InstrumentKind, InstrumentRegistry, PlaybackEngine,
    VoiceBinder,
};
use vorchestra_midi::Note;
use vorchestra_synth::SoundFontSystem;

#[cfg(feature = "output")]
use vorchestra_synth::AudioOutput;

/// Application context: every subsystem the frame loop touches.
///
/// Each frame runs input handling, then playback, then rendering, all on the
/// caller's thread. The only other thread is the audio device callback,
/// which reads the synth bus.
///
/// # Example
///
/// ```ignore
/// use vorchestra::prelude::*;
///
/// let mut engine = OrchestraEngine::builder()
///     .graphics(Box::new(my_backend))
///     .build()?;
///
/// let piano = engine.add_piano(0.0, 0.0, PianoConfig::default())?;
/// engine.focus(Some(piano));
/// engine.load_midi(piano, "song.mid", 0)?;
///
/// loop {
///     engine.frame(&poll_input(), 16);
/// }
/// ```
pub struct OrchestraEngine {
    config: EngineConfig,
    camera: Camera,
    registry: InstrumentRegistry,
    playback: PlaybackEngine,
    bindings: KeyBindings,
    graphics: Box<dyn GraphicsBackend>,
    voices: Box<dyn VoiceBinder>,
    soundfonts: Option<Arc<SoundFontSystem>>,
    focused: Option<InstrumentId>,
    sample_rate: u32,

    #[cfg(feature = "output")]
    output: Option<AudioOutput>,
}

impl OrchestraEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::OrchestraEngineBuilder {
        crate::OrchestraEngineBuilder::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        config: EngineConfig,
        camera: Camera,
        graphics: Box<dyn GraphicsBackend>,
        voices: Box<dyn VoiceBinder>,
        soundfonts: Option<Arc<SoundFontSystem>>,
        sample_rate: u32,
        #[cfg(feature = "output")] output: Option<AudioOutput>,
    ) -> Self {
        let bindings = KeyBindings::new(config.base_octave);
        Self {
            config,
            camera,
            registry: InstrumentRegistry::new(),
            playback: PlaybackEngine::new(),
            bindings,
            graphics,
            voices,
            soundfonts,
            focused: None,
            sample_rate,
            #[cfg(feature = "output")]
            output,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Check if an audio device is being driven
    pub fn is_audio_running(&self) -> bool {
        #[cfg(feature = "output")]
        {
            self.output.as_ref().is_some_and(AudioOutput::is_running)
        }
        #[cfg(not(feature = "output"))]
        {
            false
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InstrumentRegistry {
        &mut self.registry
    }

    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// SoundFont cache, when the engine created its own voice binder.
    pub fn soundfonts(&self) -> Option<&Arc<SoundFontSystem>> {
        self.soundfonts.as_ref()
    }

    /// Instrument receiving keyboard notes.
    pub fn focused(&self) -> Option<InstrumentId> {
        self.focused
    }

    pub fn focus(&mut self, id: Option<InstrumentId>) {
        self.focused = id.filter(|id| self.registry.contains(*id));
    }

    pub fn create_instrument(
        &mut self,
        kind: Box<dyn InstrumentKind>,
        x: f32,
        y: f32,
    ) -> Result<InstrumentId> {
        let id = self
            .registry
            .create(kind, x, y, self.graphics.as_mut(), self.voices.as_ref())?;
        if self.focused.is_none() {
            self.focused = Some(id);
        }
        Ok(id)
    }

    pub fn add_piano(&mut self, x: f32, y: f32, config: PianoConfig) -> Result<InstrumentId> {
        self.create_instrument(Box::new(Piano::new(config)), x, y)
    }

    pub fn add_test_instrument(&mut self, x: f32, y: f32) -> Result<InstrumentId> {
        self.create_instrument(Box::new(TestInstrument::default()), x, y)
    }

    /// Destroy an instrument. Stop playback first if its score is sounding.
    pub fn destroy_instrument(&mut self, id: InstrumentId) -> Result<()> {
        self.registry.destroy(id, self.graphics.as_mut())?;
        if self.focused == Some(id) {
            self.focused = self.registry.ids().first().copied();
        }
        Ok(())
    }

    pub fn set_position(&mut self, id: InstrumentId, x: f32, y: f32) -> Result<()> {
        Ok(self.registry.set_position(id, x, y)?)
    }

    pub fn play_note(&mut self, id: InstrumentId, note: Note) -> Result<()> {
        let instrument = self
            .registry
            .get_mut(id)
            .ok_or(vorchestra_core::Error::UnknownInstrument(id))?;
        Ok(instrument.play_note(note)?)
    }

    pub fn release_note(&mut self, id: InstrumentId, note: Note) -> Result<()> {
        let instrument = self
            .registry
            .get_mut(id)
            .ok_or(vorchestra_core::Error::UnknownInstrument(id))?;
        Ok(instrument.release_note(note)?)
    }

    /// Load one track of a MIDI file as the score of `id`. Returns the note count.
    pub fn load_midi(
        &mut self,
        id: InstrumentId,
        path: impl AsRef<Path>,
        track: usize,
    ) -> Result<usize> {
        Ok(self.playback.load(&mut self.registry, id, path, track)?)
    }

    pub fn load_midi_bytes(&mut self, id: InstrumentId, data: &[u8], track: usize) -> Result<usize> {
        Ok(self.playback.load_bytes(&mut self.registry, id, data, track)?)
    }

    pub fn toggle_playback(&mut self) {
        self.playback.toggle();
    }

    pub fn stop_playback(&mut self) {
        self.playback.stop(&mut self.registry);
    }

    /// Run one frame: input, then playback, then rendering.
    pub fn frame(&mut self, input: &InputSnapshot, elapsed_ms: u64) {
        self.handle_input(input);
        self.playback.tick(&mut self.registry, elapsed_ms);
        self.render();
    }

    pub fn handle_input(&mut self, input: &InputSnapshot) {
        for action in self.bindings.update(input) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::Pan(direction) => self.camera.keyboard_pan(direction),
            InputAction::Drag { dx, dy } => self.camera.mouse_pan(dx, dy),
            InputAction::Zoom { precise_y, x, y } => {
                self.camera.wheel_zoom(precise_y, x as f32, y as f32)
            }
            InputAction::TogglePlayback => self.playback.toggle(),
            InputAction::StopPlayback => self.playback.stop(&mut self.registry),
            InputAction::OctaveChanged(octave) => debug!("Keyboard octave {}", octave),
            InputAction::NoteOn(note) => self.focused_note(note, true),
            InputAction::NoteOff(note) => self.focused_note(note, false),
        }
    }

    fn focused_note(&mut self, note: Note, on: bool) {
        let Some(id) = self.focused else {
            return;
        };
        let result = if on {
            self.play_note(id, note)
        } else {
            self.release_note(id, note)
        };
        if let Err(e) = result {
            debug!("Instrument {} ignored {}: {}", id, note, e);
        }
    }

    /// Draw every instrument through the camera.
    pub fn render(&mut self) {
        self.registry.render(&self.camera, self.graphics.as_mut());
    }

    /// Stop playback, destroy every instrument and close the audio device.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.playback.stop(&mut self.registry);
        if !self.registry.is_empty() {
            info!("Shutting down {} instruments", self.registry.len());
            self.registry.clear(self.graphics.as_mut());
        }
        self.focused = None;

        #[cfg(feature = "output")]
        if let Some(mut output) = self.output.take() {
            output.stop();
        }
    }
}

impl Drop for OrchestraEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for OrchestraEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestraEngine")
            .field("instruments", &self.registry.len())
            .field("playback", &self.playback.state())
            .field("focused", &self.focused)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

pub(crate) fn missing(what: &'static str) -> Error {
    warn!("OrchestraEngine is missing {}", what);
    Error::Missing(what)
}
