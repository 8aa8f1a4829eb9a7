//! Keyboard and mouse integration tests

use crate::helpers::*;
use approx::assert_relative_eq;
use vorchestra::prelude::*;

fn snapshot(keys: &[Key]) -> InputSnapshot {
    InputSnapshot::with_keys(keys)
}

#[test]
fn test_performance_keys_play_focused_piano() {
    let graphics = MockGraphics::new();
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&graphics, &voices);
    engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();

    engine.frame(&snapshot(&[Key::Q, Key::E]), 16);
    // Held keys do not retrigger
    engine.frame(&snapshot(&[Key::Q, Key::E]), 16);
    engine.frame(&snapshot(&[Key::E]), 16);
    engine.frame(&snapshot(&[]), 16);

    assert_eq!(
        voices.events(),
        vec![
            VoiceEvent::On(60, 127),
            VoiceEvent::On(64, 127),
            VoiceEvent::Off(60),
            VoiceEvent::Off(64),
        ]
    );
}

#[test]
fn test_octave_shift_keeps_held_note() {
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&MockGraphics::new(), &voices);
    engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();

    engine.frame(&snapshot(&[Key::Q]), 16);
    engine.frame(&snapshot(&[Key::Q, Key::X]), 16);
    assert_eq!(engine.bindings().base_octave(), 5);

    // Releasing Q stops the C4 it started, then Q plays C5
    engine.frame(&snapshot(&[]), 16);
    engine.frame(&snapshot(&[Key::Q]), 16);

    assert_eq!(
        voices.events(),
        vec![
            VoiceEvent::On(60, 127),
            VoiceEvent::Off(60),
            VoiceEvent::On(72, 127),
        ]
    );
}

#[test]
fn test_keys_without_focus_are_ignored() {
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&MockGraphics::new(), &voices);
    let id = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();
    engine.focus(None);

    engine.frame(&snapshot(&[Key::Q]), 16);
    assert!(voices.events().is_empty());

    engine.focus(Some(id));
    engine.frame(&snapshot(&[Key::Q, Key::W]), 16);
    assert_eq!(voices.events(), vec![VoiceEvent::On(62, 127)]);
}

#[test]
fn test_space_toggles_and_s_stops() {
    let mut engine = test_engine(&MockGraphics::new(), &RecordingBinder::new());
    let id = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();
    let track = two_note_track();
    engine.load_midi_bytes(id, &smf(&[&track]), 0).unwrap();

    engine.frame(&snapshot(&[Key::Space]), 16);
    assert!(engine.playback().is_playing());

    // Holding space does not toggle again
    engine.frame(&snapshot(&[Key::Space]), 16);
    assert!(engine.playback().is_playing());
    assert_eq!(engine.playback().position_ms(), 32);

    engine.frame(&snapshot(&[]), 16);
    engine.frame(&snapshot(&[Key::S]), 16);
    assert!(!engine.playback().is_playing());
    assert_eq!(engine.playback().position_ms(), 0);
}

#[test]
fn test_arrows_pan_camera() {
    let mut engine = test_engine(&MockGraphics::new(), &RecordingBinder::new());

    engine.frame(&snapshot(&[Key::Right]), 16);
    engine.frame(&snapshot(&[Key::Right, Key::Down]), 16);

    let (x, y) = engine.camera().offset();
    assert_relative_eq!(x, 20.0);
    assert_relative_eq!(y, 10.0);
}

#[test]
fn test_wheel_zoom_keeps_cursor_anchor() {
    let mut engine = test_engine(&MockGraphics::new(), &RecordingBinder::new());
    let before = engine.camera().screen_to_stage(200.0, 100.0);

    let input = InputSnapshot {
        wheel_y: 2.0,
        mouse_x: 200,
        mouse_y: 100,
        ..InputSnapshot::default()
    };
    engine.frame(&input, 16);

    assert_relative_eq!(engine.camera().zoom(), 1.1 * 1.1, epsilon = 1e-5);
    let after = engine.camera().screen_to_stage(200.0, 100.0);
    assert_relative_eq!(before.0, after.0, epsilon = 1e-3);
    assert_relative_eq!(before.1, after.1, epsilon = 1e-3);
}

#[test]
fn test_drag_moves_stage_with_mouse() {
    let graphics = MockGraphics::new();
    let mut engine = test_engine(&graphics, &RecordingBinder::new());
    engine.add_test_instrument(0.0, 0.0).unwrap();
    engine.camera_mut().set_zoom(2.0);

    let input = InputSnapshot {
        drag: Some((30, -10)),
        ..InputSnapshot::default()
    };
    graphics.clear_draws();
    engine.frame(&input, 16);

    let quad = graphics.draws()[0].1;
    assert_eq!((quad.x, quad.y), (30, -10));
}
