//! Score playback.
//!
//! A two-state machine driven by frame ticks. While playing, the clock
//! advances by the elapsed frame time and every loaded note is synced with
//! it: a sounding note whose window has ended is released, a silent note whose
//! window contains the clock is played. Reaching the end of a score does not
//! stop playback.

use crate::instrument::InstrumentId;
use crate::registry::InstrumentRegistry;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};
use vorchestra_midi::{file, ComplexNote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Default)]
pub struct PlaybackEngine {
    state: PlaybackState,
    clock_ms: u64,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn position_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Load `track` of a MIDI file as the score of instrument `id`.
    ///
    /// Playback is stopped first. Returns the number of notes loaded.
    pub fn load(
        &mut self,
        registry: &mut InstrumentRegistry,
        id: InstrumentId,
        path: impl AsRef<Path>,
        track: usize,
    ) -> Result<usize> {
        let path = path.as_ref();
        let notes = file::load_track(path, track)?;
        info!(
            "Loaded {} notes from '{}' track {}",
            notes.len(),
            path.display(),
            track
        );
        self.install(registry, id, notes)
    }

    /// Like [`load`](Self::load), from an in-memory file.
    pub fn load_bytes(
        &mut self,
        registry: &mut InstrumentRegistry,
        id: InstrumentId,
        data: &[u8],
        track: usize,
    ) -> Result<usize> {
        let notes = file::parse_track(data, track)?;
        self.install(registry, id, notes)
    }

    /// Replace the score of `id` with already-timed notes.
    pub fn install(
        &mut self,
        registry: &mut InstrumentRegistry,
        id: InstrumentId,
        mut notes: Vec<ComplexNote>,
    ) -> Result<usize> {
        if !registry.contains(id) {
            return Err(Error::UnknownInstrument(id));
        }

        self.stop(registry);

        for note in &mut notes {
            note.playing = false;
        }
        let count = notes.len();

        if let Some(instrument) = registry.get_mut(id) {
            instrument.set_score(notes);
        }

        Ok(count)
    }

    pub fn play(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!("Playback started at {} ms", self.clock_ms);
            self.state = PlaybackState::Playing;
        }
    }

    /// Freeze the clock. Sounding notes keep sounding.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Stopped {
            debug!("Playback paused at {} ms", self.clock_ms);
            self.state = PlaybackState::Stopped;
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Stopped => self.play(),
            PlaybackState::Playing => self.pause(),
        }
    }

    /// Stop, rewind to 0 and release every sounding note of every instrument.
    pub fn stop(&mut self, registry: &mut InstrumentRegistry) {
        self.state = PlaybackState::Stopped;
        self.clock_ms = 0;

        let mut released = 0;
        registry.for_each(|instrument| released += instrument.release_score());

        debug!("Playback stopped, released {} notes", released);
    }

    /// Advance by one frame.
    pub fn tick(&mut self, registry: &mut InstrumentRegistry, elapsed_ms: u64) {
        if self.state != PlaybackState::Playing {
            return;
        }

        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);
        let clock = self.clock_ms;
        registry.for_each(|instrument| instrument.advance_score(clock));
    }
}
