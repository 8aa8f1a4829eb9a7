//! Instrument Registry
//!
//! Owns every live instrument in creation order. Construction is
//! transactional: if a kind's `init` fails, whatever it loaded is released
//! and the instrument never becomes visible to iteration.
//!
//! Stop playback before destroying an instrument whose score is sounding,
//! otherwise the release calls for those notes never happen.

use crate::camera::Camera;
use crate::graphics::GraphicsBackend;
use crate::instrument::{InitContext, Instrument, InstrumentId, InstrumentKind, InstrumentState};
use crate::voice::VoiceBinder;
use crate::{Error, Result};
use tracing::{error, info, warn};

#[derive(Debug, Default)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
    next_id: u32,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an instrument of `kind` at stage position `(x, y)`.
    ///
    /// Returns [`Error::Construction`] wrapping the kind's failure; in that
    /// case every layer it loaded has been released and any voice it bound
    /// has been dropped.
    pub fn create(
        &mut self,
        mut kind: Box<dyn InstrumentKind>,
        x: f32,
        y: f32,
        graphics: &mut dyn GraphicsBackend,
        voices: &dyn VoiceBinder,
    ) -> Result<InstrumentId> {
        let id = InstrumentId(self.next_id);
        self.next_id += 1;

        let mut state = InstrumentState::new(id, x, y);

        let init = {
            let mut ctx = InitContext {
                state: &mut state,
                graphics: &mut *graphics,
                voices,
            };
            kind.init(&mut ctx)
        };

        if let Err(e) = init {
            state.layers.release_all(graphics);
            if let Some(voice) = state.voice.take() {
                voice.release();
            }
            error!("Failed to create {} instrument {}: {}", kind.name(), id, e);
            return Err(Error::Construction {
                kind: kind.name().to_string(),
                source: Box::new(e),
            });
        }

        info!(
            "Created {} instrument {} at ({}, {}) with {} layers",
            kind.name(),
            id,
            x,
            y,
            state.layers.len()
        );

        self.instruments.push(Instrument {
            kind,
            state,
            score: Vec::new(),
        });

        Ok(id)
    }

    /// Tear down an instrument: `fini`, then voice, then layers.
    pub fn destroy(&mut self, id: InstrumentId, graphics: &mut dyn GraphicsBackend) -> Result<()> {
        let index = self
            .position(id)
            .ok_or(Error::UnknownInstrument(id))?;
        let mut instrument = self.instruments.remove(index);

        if let Err(e) = instrument.kind.fini(&mut instrument.state) {
            warn!("{} instrument {} fini failed: {}", instrument.kind_name(), id, e);
        }
        if let Some(voice) = instrument.state.voice.take() {
            voice.release();
        }
        instrument.state.layers.release_all(graphics);

        info!("Destroyed {} instrument {}", instrument.kind_name(), id);
        Ok(())
    }

    /// Destroy every instrument, newest first.
    pub fn clear(&mut self, graphics: &mut dyn GraphicsBackend) {
        while let Some(id) = self.instruments.last().map(Instrument::id) {
            if let Err(e) = self.destroy(id, graphics) {
                warn!("Failed to destroy instrument {}: {}", id, e);
                break;
            }
        }
    }

    fn position(&self, id: InstrumentId) -> Option<usize> {
        self.instruments.iter().position(|i| i.id() == id)
    }

    pub fn set_position(&mut self, id: InstrumentId, x: f32, y: f32) -> Result<()> {
        let instrument = self.get_mut(id).ok_or(Error::UnknownInstrument(id))?;
        instrument.set_position(x, y);
        Ok(())
    }

    pub fn get(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: InstrumentId) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: InstrumentId) -> bool {
        self.position(id).is_some()
    }

    /// Instruments in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Instrument> {
        self.instruments.iter_mut()
    }

    /// Visit every instrument in creation order.
    pub fn for_each(&mut self, mut visit: impl FnMut(&mut Instrument)) {
        for instrument in &mut self.instruments {
            visit(instrument);
        }
    }

    pub fn ids(&self) -> Vec<InstrumentId> {
        self.instruments.iter().map(Instrument::id).collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Draw all instruments in creation order; later ones cover earlier ones.
    pub fn render(&self, camera: &Camera, graphics: &mut dyn GraphicsBackend) {
        for instrument in &self.instruments {
            let (x, y) = instrument.position();
            instrument.state.layers.render(graphics, camera, x, y);
        }
    }
}
