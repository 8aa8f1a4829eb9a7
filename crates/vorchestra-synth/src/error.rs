//! Error types for vorchestra-synth.

use crate::riff::FourCC;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vorchestra-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vorchestra-synth.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a usable SoundFont.
    #[error("SoundFont error: {0}")]
    SoundFont(#[from] SoundFontError),

    /// Synthesizer construction or playback error.
    #[error("Synth error: {0}")]
    Synth(String),

    /// No usable output device.
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[cfg(feature = "output")]
    #[error("Device not available: {0}")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "output")]
    #[error("Failed to build stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "output")]
    #[error("Failed to play stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "output")]
    #[error("Failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),
}

/// Structural problems found while inspecting a SoundFont.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoundFontError {
    #[error("SoundFont file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("Not a RIFF file")]
    BadRiffHeader,

    #[error("RIFF form type is '{0}', expected 'sfbk'")]
    BadSignature(FourCC),

    #[error("Missing LIST/INFO chunk")]
    MissingInfo,

    #[error("Missing LIST/pdta chunk")]
    MissingPdta,

    #[error("Missing ifil version chunk")]
    MissingVersion,

    #[error("Missing phdr preset header chunk")]
    MissingPresetHeaders,

    #[error("Chunk '{0}' is truncated")]
    Truncated(FourCC),
}
