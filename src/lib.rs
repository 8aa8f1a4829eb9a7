//! # Vorchestra - Virtual Orchestra
//!
//! Playable on-screen instruments: every instrument draws a stack of texture
//! layers and sounds through a SoundFont voice, driven by the computer
//! keyboard or by a MIDI file.
//!
//! ## Architecture
//!
//! Vorchestra is an umbrella crate that coordinates:
//! - **vorchestra-midi** - Notes, pitch classes, MIDI file tracks
//! - **vorchestra-core** - Instruments, layers, camera, voice binding, playback
//! - **vorchestra-synth** - SoundFont validation, synthesis, audio output
//!
//! ## Quick Start
//!
//! ```ignore
//! use vorchestra::prelude::*;
//!
//! let mut engine = OrchestraEngine::builder()
//!     .graphics(Box::new(backend))
//!     .build()?;
//!
//! let voice = VoiceConfig::new("res/soundfont/msbasic.sf3").preset(0);
//! let piano = engine.add_piano(40.0, 300.0, PianoConfig::default().with_voice(voice))?;
//!
//! engine.load_midi(piano, "res/midi/song.mid", 1)?;
//! engine.toggle_playback();
//!
//! loop {
//!     engine.frame(&poll_input(), 16);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Audio device output
//! - `output` - CPAL output driving the synth bus

/// Re-export of vorchestra-core for direct access
pub use vorchestra_core as core;
pub use vorchestra_midi as midi;
pub use vorchestra_synth as synth;

pub use vorchestra_core::{
    Camera, CameraConfig, GraphicsBackend, InitContext, Instrument, InstrumentId, InstrumentKind,
    InstrumentRegistry, InstrumentState, Layer, LayerIndex, LayerSet, PanDirection,
    PlaybackEngine, PlaybackState, Quad, TextureId, VoiceBinder, VoiceConfig,
};
pub use vorchestra_midi::{ComplexNote, Note, PitchClass};
pub use vorchestra_synth::{SoundFontInfo, SoundFontSystem};

#[cfg(feature = "output")]
pub use vorchestra_synth::{AudioOutput, AudioOutputConfig};

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod instruments;

pub use builder::OrchestraEngineBuilder;
pub use config::EngineConfig;
pub use engine::OrchestraEngine;
pub use error::{Error, Result};
pub use input::{InputAction, InputSnapshot, Key, KeyBindings};
pub use instruments::{Piano, PianoConfig, TestInstrument};

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Camera, EngineConfig, InputSnapshot, InstrumentId, InstrumentKind, Key, Note,
        OrchestraEngine, OrchestraEngineBuilder, PianoConfig, PitchClass, PlaybackState,
        Result, VoiceConfig,
    };
}
