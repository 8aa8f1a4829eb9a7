//! Score playback integration tests
//!
//! Scores come from in-memory MIDI files at 1 tick per millisecond.

use crate::helpers::*;
use vorchestra::core::Error as CoreError;
use vorchestra::prelude::*;
use vorchestra::Error;

fn piano_with_score() -> (OrchestraEngine, RecordingBinder, InstrumentId) {
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&MockGraphics::new(), &voices);
    let id = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();

    let track = two_note_track();
    let data = smf(&[&END_OF_TRACK, &track]);
    assert_eq!(engine.load_midi_bytes(id, &data, 1).unwrap(), 2);

    (engine, voices, id)
}

#[test]
fn test_score_follows_clock() {
    let (mut engine, voices, _) = piano_with_score();
    let idle = InputSnapshot::new();

    engine.toggle_playback();
    engine.frame(&idle, 0);
    assert_eq!(voices.events(), vec![VoiceEvent::On(60, 100)]);

    engine.frame(&idle, 50);
    assert_eq!(voices.events().len(), 1);

    // At 100 ms C4 ends and E4 starts in the same tick
    engine.frame(&idle, 50);
    assert_eq!(
        voices.events(),
        vec![
            VoiceEvent::On(60, 100),
            VoiceEvent::Off(60),
            VoiceEvent::On(64, 80),
        ]
    );

    engine.frame(&idle, 250);
    assert_eq!(voices.events().last(), Some(&VoiceEvent::Off(64)));
    assert_eq!(engine.playback().position_ms(), 350);

    // Running past the end keeps playing
    assert!(engine.playback().is_playing());
}

#[test]
fn test_pause_freezes_clock() {
    let (mut engine, voices, _) = piano_with_score();
    let idle = InputSnapshot::new();

    engine.toggle_playback();
    engine.frame(&idle, 20);
    engine.toggle_playback();
    assert_eq!(engine.playback().state(), PlaybackState::Stopped);

    engine.frame(&idle, 500);
    assert_eq!(engine.playback().position_ms(), 20);
    // C4 is still held while paused
    assert_eq!(voices.events(), vec![VoiceEvent::On(60, 100)]);
}

#[test]
fn test_stop_rewinds_and_releases() {
    let (mut engine, voices, id) = piano_with_score();
    let idle = InputSnapshot::new();

    engine.toggle_playback();
    engine.frame(&idle, 150);
    engine.stop_playback();

    assert_eq!(engine.playback().position_ms(), 0);
    assert_eq!(voices.events().last(), Some(&VoiceEvent::Off(64)));
    let score = engine.registry().get(id).unwrap().score();
    assert!(score.iter().all(|n| !n.playing));

    // Playing again starts from the top
    engine.toggle_playback();
    engine.frame(&idle, 0);
    assert_eq!(voices.events().last(), Some(&VoiceEvent::On(60, 100)));
}

#[test]
fn test_reload_stops_playback() {
    let (mut engine, voices, id) = piano_with_score();
    let idle = InputSnapshot::new();

    engine.toggle_playback();
    engine.frame(&idle, 10);

    let track = two_note_track();
    let data = smf(&[&track]);
    engine.load_midi_bytes(id, &data, 0).unwrap();

    assert!(!engine.playback().is_playing());
    assert_eq!(engine.playback().position_ms(), 0);
    assert_eq!(voices.events().last(), Some(&VoiceEvent::Off(60)));
}

#[test]
fn test_load_errors() {
    let (mut engine, _, id) = piano_with_score();
    let track = two_note_track();
    let data = smf(&[&track]);

    assert!(matches!(
        engine.load_midi_bytes(id, &data, 3),
        Err(Error::Core(CoreError::Midi(
            vorchestra::midi::Error::TrackOutOfRange { track: 3, tracks: 1 }
        )))
    ));
    assert!(matches!(
        engine.load_midi_bytes(id, b"not a midi file", 0),
        Err(Error::Core(CoreError::Midi(_)))
    ));

    engine.destroy_instrument(id).unwrap();
    assert!(matches!(
        engine.load_midi_bytes(id, &data, 0),
        Err(Error::Core(CoreError::UnknownInstrument(_)))
    ));
}

#[test]
fn test_load_midi_from_disk() {
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&MockGraphics::new(), &voices);
    let id = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.mid");
    let track = two_note_track();
    std::fs::write(&path, smf(&[&track])).unwrap();

    assert_eq!(engine.load_midi(id, &path, 0).unwrap(), 2);
    let score = engine.registry().get(id).unwrap().score();
    assert_eq!(
        score.iter().map(|n| (n.start_ms, n.end_ms)).collect::<Vec<_>>(),
        vec![(0, 100), (100, 300)]
    );

    assert!(engine.load_midi(id, dir.path().join("missing.mid"), 0).is_err());
}

#[test]
fn test_notes_outside_keyboard_are_skipped() {
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&MockGraphics::new(), &voices);
    let id = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();

    let mut track = vec![
        0x00, 0x90, 0x15, 0x40, // A0 on, below the keyboard
        0x0A, 0x80, 0x15, 0x40, // A0 off
        0x00, 0x90, 0x3C, 0x40, // C4 on
        0x0A, 0x80, 0x3C, 0x40, // C4 off
    ];
    track.extend_from_slice(&END_OF_TRACK);
    engine.load_midi_bytes(id, &smf(&[&track]), 0).unwrap();

    let idle = InputSnapshot::new();
    engine.toggle_playback();
    engine.frame(&idle, 10);
    engine.frame(&idle, 10);

    assert_eq!(
        voices.events(),
        vec![VoiceEvent::On(60, 64), VoiceEvent::Off(60)]
    );
}
