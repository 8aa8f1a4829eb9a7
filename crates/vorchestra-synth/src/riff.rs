//! RIFF chunk walking.
//!
//! A chunk is an 8-byte header (four-character tag, little-endian u32 size)
//! followed by `size` payload bytes and one pad byte when `size` is odd.
//! `RIFF` and `LIST` chunks start their payload with a four-character form
//! type; their children follow it.
//!
//! Chunks borrow from the buffer they were parsed from, so a whole file can
//! be inspected without copying.

use crate::error::SoundFontError;
use std::fmt;

/// Size of a chunk header in bytes.
pub const HEADER_LEN: usize = 8;

/// Four-character chunk tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const LIST: FourCC = FourCC(*b"LIST");

    pub const fn new(tag: &[u8; 4]) -> Self {
        FourCC(*tag)
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        let tag: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(FourCC(tag))
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({self})")
    }
}

/// Offset from one sibling chunk header to the next.
pub const fn chunk_stride(size: u32) -> usize {
    HEADER_LEN + size as usize + (size % 2) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub id: FourCC,
    pub size: u32,
    /// Exactly `size` bytes, pad byte excluded.
    pub data: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Parse the chunk at the start of `bytes`.
    pub fn parse(bytes: &'a [u8]) -> Result<Chunk<'a>, SoundFontError> {
        let id = FourCC::read(bytes).ok_or(SoundFontError::Truncated(FourCC(*b"????")))?;
        let size = bytes
            .get(4..HEADER_LEN)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
            .ok_or(SoundFontError::Truncated(id))?;
        let data = bytes
            .get(HEADER_LEN..HEADER_LEN + size as usize)
            .ok_or(SoundFontError::Truncated(id))?;

        Ok(Chunk { id, size, data })
    }

    /// `RIFF` and `LIST` chunks carry a form type before their children.
    pub fn is_container(&self) -> bool {
        self.id == FourCC::RIFF || self.id == FourCC::LIST
    }

    /// First four payload bytes, if the payload has them.
    pub fn form_type(&self) -> Option<FourCC> {
        FourCC::read(self.data)
    }

    /// Direct children, in file order. Iteration ends at the first child
    /// whose declared size runs past this chunk.
    pub fn children(&self) -> Children<'a> {
        Children {
            data: self.data,
            offset: if self.is_container() { 4 } else { 0 },
        }
    }

    /// Payload as a NUL-terminated string, lossily decoded.
    pub fn as_zstr(&self) -> String {
        zstr(self.data)
    }
}

pub(crate) fn zstr(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Iterator over the children of a chunk.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let rest = self.data.get(self.offset..)?;
        if rest.len() < HEADER_LEN {
            return None;
        }
        let Ok(chunk) = Chunk::parse(rest) else {
            self.offset = self.data.len();
            return None;
        };
        self.offset += chunk_stride(chunk.size);
        Some(chunk)
    }
}

/// Find the first direct child of `root` tagged `id`.
///
/// With a `subtype`, the child must also carry that form type in its first
/// four payload bytes; children too short to hold one are skipped. The scan
/// is not recursive.
pub fn find_chunk<'a>(root: &Chunk<'a>, id: FourCC, subtype: Option<FourCC>) -> Option<Chunk<'a>> {
    root.children().find(|child| {
        child.id == id
            && match subtype {
                None => true,
                Some(form) => child.size >= 4 && child.form_type() == Some(form),
            }
    })
}
