//! Pitch model and MIDI file input for vorchestra.
//!
//! - **[`PitchClass`] / [`Note`]** - chromatic pitch classes, octaves and MIDI key math
//! - **[`ComplexNote`]** - a note with a millisecond window, used by file playback
//! - **[`file`]** - Standard MIDI File track extraction (via `midly`)
//!
//! # Example
//!
//! ```ignore
//! use vorchestra_midi::{file, PitchClass};
//!
//! let notes = file::load_track("song.mid", 0)?;
//! for n in &notes {
//!     println!("{} from {} to {} ms", n.note, n.start_ms, n.end_ms);
//! }
//! assert!(!PitchClass::Fs.is_natural());
//! ```

pub mod error;
pub use error::{Error, Result};

mod event;
pub mod file;
mod note;

pub use event::{Articulation, ComplexNote};
pub use note::{from_midi_key, to_midi_key, Note, PitchClass, PITCH_CLASSES};
