//! Integration test modules for vorchestra

pub mod engine;
pub mod input;
pub mod playback;
