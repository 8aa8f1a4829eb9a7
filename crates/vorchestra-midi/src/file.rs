//! Standard MIDI File track extraction
//!
//! Parses an SMF with `midly` and turns the note-on/note-off pairs of one
//! track into [`ComplexNote`]s with millisecond windows. Meta events, sysex and
//! every other track are ignored, except that tempo changes from any track
//! feed the tick-to-millisecond conversion.

use crate::error::{Error, Result};
use crate::event::ComplexNote;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::path::Path;
use tracing::debug;

/// Tempo used until the first tempo meta event (120 BPM).
pub const DEFAULT_US_PER_BEAT: u32 = 500_000;

/// Load one track of a MIDI file from disk.
pub fn load_track(path: impl AsRef<Path>, track: usize) -> Result<Vec<ComplexNote>> {
    let data = std::fs::read(path.as_ref())?;
    parse_track(&data, track)
}

/// Number of tracks in an in-memory MIDI file.
pub fn track_count(data: &[u8]) -> Result<usize> {
    Ok(Smf::parse(data)?.tracks.len())
}

/// Extract the notes of `track` from an in-memory MIDI file, in file order.
///
/// Each note-on is paired with the next note-off for the same key on the same
/// track (a note-on with velocity 0 counts as a note-off). The first match
/// wins, so overlapping notes of the same pitch share one release. A note-on
/// with no matching note-off gets a zero-length window.
pub fn parse_track(data: &[u8], track: usize) -> Result<Vec<ComplexNote>> {
    let smf = Smf::parse(data)?;

    let tracks = smf.tracks.len();
    if track >= tracks {
        return Err(Error::TrackOutOfRange { track, tracks });
    }

    let clock = TempoMap::from_smf(&smf);
    let events = key_events(&smf.tracks[track]);

    debug!(
        "Parsing MIDI track {}/{}: {} key events",
        track,
        tracks,
        events.len()
    );

    let mut notes = Vec::new();
    for (i, event) in events.iter().enumerate() {
        let KeyEvent::On { tick, key, velocity } = *event else {
            continue;
        };

        let end_tick = events[i + 1..]
            .iter()
            .find_map(|e| match *e {
                KeyEvent::Off { tick, key: k } if k == key => Some(tick),
                _ => None,
            })
            .unwrap_or(tick);

        notes.push(ComplexNote::new(
            key,
            velocity,
            clock.ticks_to_ms(tick),
            clock.ticks_to_ms(end_tick),
        ));
    }

    debug!("Extracted {} notes from track {}", notes.len(), track);

    Ok(notes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyEvent {
    On { tick: u64, key: u8, velocity: u8 },
    Off { tick: u64, key: u8 },
}

fn key_events(track: &[midly::TrackEvent]) -> Vec<KeyEvent> {
    let mut tick = 0u64;
    let mut events = Vec::new();

    for event in track {
        tick += event.delta.as_int() as u64;

        if let TrackEventKind::Midi { message, .. } = &event.kind {
            match *message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    events.push(KeyEvent::On {
                        tick,
                        key: key.as_int(),
                        velocity: vel.as_int(),
                    });
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    events.push(KeyEvent::Off {
                        tick,
                        key: key.as_int(),
                    });
                }
                _ => {}
            }
        }
    }

    events
}

/// Tick to wall-clock conversion for one file.
#[derive(Debug, Clone)]
struct TempoMap {
    timing: Timing,
    /// (absolute tick, microseconds per beat), sorted by tick
    changes: Vec<(u64, u32)>,
}

impl TempoMap {
    fn from_smf(smf: &Smf) -> Self {
        let mut changes = Vec::new();

        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track.iter() {
                tick += event.delta.as_int() as u64;
                if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = &event.kind {
                    changes.push((tick, tempo.as_int()));
                }
            }
        }

        changes.sort_by_key(|(tick, _)| *tick);

        Self {
            timing: smf.header.timing,
            changes,
        }
    }

    fn ticks_to_ms(&self, tick: u64) -> u64 {
        match self.timing {
            Timing::Metrical(tpb) => self.metrical_ms(tick, tpb.as_int().max(1) as f64),
            Timing::Timecode(fps, subframes) => {
                let ticks_per_second = fps.as_f32() as f64 * subframes.max(1) as f64;
                (tick as f64 / ticks_per_second * 1000.0).round() as u64
            }
        }
    }

    fn metrical_ms(&self, tick: u64, ticks_per_beat: f64) -> u64 {
        let mut elapsed_us = 0.0f64;
        let mut last_tick = 0u64;
        let mut us_per_beat = DEFAULT_US_PER_BEAT as f64;

        for &(change_tick, tempo) in &self.changes {
            if change_tick >= tick {
                break;
            }
            elapsed_us += (change_tick - last_tick) as f64 / ticks_per_beat * us_per_beat;
            last_tick = change_tick;
            us_per_beat = tempo as f64;
        }

        elapsed_us += (tick - last_tick) as f64 / ticks_per_beat * us_per_beat;
        (elapsed_us / 1000.0).round() as u64
    }
}
