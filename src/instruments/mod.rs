//! Built-in instrument kinds.

pub mod piano;

pub use piano::{Piano, PianoConfig};
pub use test::TestInstrument;
