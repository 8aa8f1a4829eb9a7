//! Centralized error type for the vorchestra umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] vorchestra_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] vorchestra_midi::Error),

    #[error("Synth: {0}")]
    Synth(#[from] vorchestra_synth::Error),

    #[error("Missing {0}")]
    Missing(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
