//! Interface to the rendering collaborator.
//!
//! Window setup and image decoding live outside this crate. The core only
//! needs to turn an image path into a texture, ask for its size and draw it
//! as a quad on screen.

use crate::Result;
use std::path::Path;

/// Opaque texture handle issued by a [`GraphicsBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Destination rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// 0 = transparent, 255 = opaque
    pub opacity: u8,
}

/// Texture storage and quad drawing.
///
/// Implementations report load failures as
/// [`Error::ResourceLoad`](crate::Error::ResourceLoad).
pub trait GraphicsBackend {
    /// Decode the image at `path` into a texture.
    fn load_texture(&mut self, path: &Path) -> Result<TextureId>;

    /// Free a texture. Unknown ids are ignored.
    fn release_texture(&mut self, texture: TextureId);

    /// Pixel size of a live texture.
    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)>;

    /// Draw `texture` stretched over `quad`.
    fn draw(&mut self, texture: TextureId, quad: Quad);
}
