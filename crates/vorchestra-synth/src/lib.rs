//! SoundFont support for vorchestra.
//!
//! - [`riff`] - borrowed RIFF chunk walking
//! - [`SoundFontInfo`] - validation and preset listing for `.sf2` files
//! - [`SoundFontSystem`] - cached SoundFonts, implements
//!   [`VoiceBinder`](vorchestra_core::VoiceBinder) with rustysynth
//! - [`SynthBus`] - sums every live voice for the audio device
//! - `AudioOutput` - cpal device output (feature `output`)

pub mod error;
pub use error::{Error, Result, SoundFontError};

mod bus;
mod info;
mod manager;
pub mod riff;
mod synth;
mod voice;

#[cfg(feature = "output")]
mod output;

pub use bus::{BusSlot, Render, SynthBus};
pub use info::{PresetHeader, SoundFontInfo, Version, PRESET_HEADER_LEN};
pub use manager::{check_polyphony, SoundFontHandle, SoundFontSystem, MAX_POLYPHONY, MIN_POLYPHONY};
pub use synth::SoundFontSynth;
pub use voice::SoundFontVoice;

#[cfg(feature = "output")]
pub use output::{AudioOutput, AudioOutputConfig};
