//! Error types for vorchestra-core.

use crate::instrument::InstrumentId;
use crate::voice::BindError;
use std::path::PathBuf;
use thiserror::Error;
use vorchestra_midi::Note;

/// Error type for vorchestra-core operations.
///
/// Misuse of a layer index is never an error value; it is logged where it
/// happens and the call becomes a no-op.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load '{}': {reason}", path.display())]
    ResourceLoad { path: PathBuf, reason: String },

    #[error("Voice binding failed: {0}")]
    Bind(#[from] BindError),

    #[error("Failed to construct {kind} instrument: {source}")]
    Construction {
        kind: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Unknown instrument {0}")]
    UnknownInstrument(InstrumentId),

    #[error("Note {note} is outside the range of {kind}")]
    NoteOutOfRange { kind: String, note: Note },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("MIDI: {0}")]
    Midi(#[from] vorchestra_midi::Error),
}

impl Error {
    pub fn resource_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::ResourceLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
