//! SoundFont 2 inspection.
//!
//! Reads just enough of an `.sf2` file to validate it and describe it: the
//! format version, the bank name, the target sound engine and the preset
//! headers. Sample data and the generator tables are left to the synthesizer.

use crate::error::{Result, SoundFontError};
use crate::riff::{find_chunk, Chunk, FourCC};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

const SFBK: FourCC = FourCC::new(b"sfbk");
const INFO: FourCC = FourCC::new(b"INFO");
const PDTA: FourCC = FourCC::new(b"pdta");
const IFIL: FourCC = FourCC::new(b"ifil");
const INAM: FourCC = FourCC::new(b"INAM");
const ISNG: FourCC = FourCC::new(b"isng");
const PHDR: FourCC = FourCC::new(b"phdr");

/// Size of one `phdr` record.
pub const PRESET_HEADER_LEN: usize = 38;

/// SoundFont format version from `ifil`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// One preset header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetHeader {
    pub name: String,
    pub preset: u16,
    pub bank: u16,
    pub preset_bag_index: u16,
    pub library: u32,
    pub genre: u32,
    pub morphology: u32,
}

impl PresetHeader {
    fn parse(record: &[u8]) -> Option<Self> {
        let u16_at = |at: usize| -> Option<u16> {
            Some(u16::from_le_bytes(record.get(at..at + 2)?.try_into().ok()?))
        };
        let u32_at = |at: usize| -> Option<u32> {
            Some(u32::from_le_bytes(record.get(at..at + 4)?.try_into().ok()?))
        };

        Some(Self {
            name: crate::riff::zstr(record.get(..20)?),
            preset: u16_at(20)?,
            bank: u16_at(22)?,
            preset_bag_index: u16_at(24)?,
            library: u32_at(26)?,
            genre: u32_at(30)?,
            morphology: u32_at(34)?,
        })
    }
}

/// Descriptive view of a SoundFont file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundFontInfo {
    pub version: Version,
    /// Bank name (`INAM`).
    pub name: Option<String>,
    /// Target sound engine (`isng`).
    pub sound_engine: Option<String>,
    /// Presets in file order, terminal record excluded.
    pub presets: Vec<PresetHeader>,
}

impl SoundFontInfo {
    /// Read and inspect a SoundFont from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SoundFontError::MissingFile(path.to_path_buf()).into());
        }
        let data = std::fs::read(path)?;
        let info = Self::parse(&data)?;
        debug!("Inspected SoundFont '{}'", path.display());
        Ok(info)
    }

    /// Inspect an in-memory SoundFont.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.get(..4) != Some(FourCC::RIFF.0.as_slice()) {
            return Err(SoundFontError::BadRiffHeader.into());
        }
        let root = Chunk::parse(data)?;
        match root.form_type() {
            Some(SFBK) => {}
            Some(other) => return Err(SoundFontError::BadSignature(other).into()),
            None => return Err(SoundFontError::Truncated(FourCC::RIFF).into()),
        }

        let info_list = find_chunk(&root, FourCC::LIST, Some(INFO)).ok_or(SoundFontError::MissingInfo)?;
        let pdta = find_chunk(&root, FourCC::LIST, Some(PDTA)).ok_or(SoundFontError::MissingPdta)?;

        let ifil = find_chunk(&info_list, IFIL, None).ok_or(SoundFontError::MissingVersion)?;
        let version = match ifil.data {
            [a, b, c, d, ..] => Version {
                major: u16::from_le_bytes([*a, *b]),
                minor: u16::from_le_bytes([*c, *d]),
            },
            _ => return Err(SoundFontError::Truncated(IFIL).into()),
        };

        let name = find_chunk(&info_list, INAM, None).map(|c| c.as_zstr());
        if name.is_none() {
            warn!("SoundFont has no INAM (bank name) chunk");
        }
        let sound_engine = find_chunk(&info_list, ISNG, None).map(|c| c.as_zstr());
        if sound_engine.is_none() {
            warn!("SoundFont has no isng (sound engine) chunk");
        }

        let phdr = find_chunk(&pdta, PHDR, None).ok_or(SoundFontError::MissingPresetHeaders)?;
        let records = phdr.data.len() / PRESET_HEADER_LEN;
        let presets = phdr
            .data
            .chunks_exact(PRESET_HEADER_LEN)
            .take(records.saturating_sub(1))
            .map(PresetHeader::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or(SoundFontError::Truncated(PHDR))?;

        let sf = Self {
            version,
            name,
            sound_engine,
            presets,
        };
        sf.log_summary();
        Ok(sf)
    }

    fn log_summary(&self) {
        info!(
            "SoundFont '{}': version {}, engine {}, {} presets",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.version,
            self.sound_engine.as_deref().unwrap_or("<unknown>"),
            self.presets.len()
        );
        for p in &self.presets {
            debug!("  preset {:03}:{:03} '{}'", p.bank, p.preset, p.name);
        }
    }

    pub fn find_preset(&self, bank: u16, preset: u16) -> Option<&PresetHeader> {
        self.presets
            .iter()
            .find(|p| p.bank == bank && p.preset == preset)
    }
}

