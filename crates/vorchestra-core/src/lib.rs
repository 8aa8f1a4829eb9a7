//! Instrument coordination core for vorchestra.
//!
//! Ties an instrument's note events to a synthesizer voice and to a stack of
//! texture layers drawn through a pannable, zoomable camera.
//!
//! - **[`InstrumentRegistry`]** - owns instruments, transactional construction
//! - **[`LayerSet`]** - per-instrument textures with stable z ordering
//! - **[`Camera`]** - screen/stage transform, pan and anchored zoom
//! - **[`VoiceBinding`]** - MIDI-key voice behind the [`VoiceBinder`] trait
//! - **[`PlaybackEngine`]** - MIDI-file score playback on frame ticks
//!
//! Rendering and audio devices are reached through [`GraphicsBackend`] and
//! [`VoiceBinder`]; this crate never touches a window or a sound card.

pub mod camera;
pub mod config;
pub mod error;
pub mod graphics;
pub mod instrument;
pub mod layer;
pub mod playback;
pub mod registry;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::{Camera, PanDirection};
pub use config::CameraConfig;
pub use error::{Error, Result};
pub use graphics::{GraphicsBackend, Quad, TextureId};
pub use instrument::{InitContext, Instrument, InstrumentId, InstrumentKind, InstrumentState};
pub use layer::{Layer, LayerIndex, LayerSet, MIN_LAYER_CAPACITY};
pub use playback::{PlaybackEngine, PlaybackState};
pub use registry::InstrumentRegistry;
pub use voice::{
    dynamic_velocity, BindError, BindStep, Voice, VoiceBinder, VoiceBinding, VoiceConfig,
    DYNAMIC_LOUDEST, DYNAMIC_QUIETEST,
};

pub use vorchestra_midi;
