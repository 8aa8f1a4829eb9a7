//! Engine lifecycle integration tests
//!
//! Builder validation, instrument creation and teardown, focus and shutdown.

use crate::helpers::*;
use vorchestra::core::{BindStep, Error as CoreError};
use vorchestra::prelude::*;
use vorchestra::{Error, TestInstrument};

/// Step at which a failed construction gave up binding its voice.
fn bind_step(err: &Error) -> Option<BindStep> {
    match err {
        Error::Core(CoreError::Construction { source, .. }) => match source.as_ref() {
            CoreError::Bind(bind) => Some(bind.step),
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn test_build_requires_graphics() {
    let result = OrchestraEngine::builder()
        .voice_binder(RecordingBinder::new().boxed())
        .build();
    assert!(matches!(result, Err(Error::Missing("graphics backend"))));
}

#[test]
fn test_build_rejects_invalid_config() {
    let config = EngineConfig {
        fallback_sample_rate: 100,
        ..EngineConfig::default()
    };
    let result = OrchestraEngine::builder()
        .config(config)
        .graphics(MockGraphics::new().boxed())
        .build();
    assert!(matches!(
        result,
        Err(Error::Core(CoreError::InvalidConfig(_)))
    ));
}

#[test]
fn test_custom_binder_uses_fallback_sample_rate() {
    let engine = test_engine(&MockGraphics::new(), &RecordingBinder::new());
    assert_eq!(engine.sample_rate(), 44100);
    assert!(engine.soundfonts().is_none());
    assert!(!engine.is_audio_running());
    assert!(engine.registry().is_empty());
}

#[test]
fn test_headless_engine_owns_soundfonts() {
    let config = EngineConfig {
        audio_output: false,
        fallback_sample_rate: 48000,
        ..EngineConfig::default()
    };
    let engine = OrchestraEngine::builder()
        .config(config)
        .graphics(MockGraphics::new().boxed())
        .build()
        .unwrap();

    assert!(!engine.is_audio_running());
    assert_eq!(engine.sample_rate(), 48000);
    let soundfonts = engine.soundfonts().unwrap();
    assert_eq!(soundfonts.sample_rate(), 48000);
    assert!(soundfonts.is_empty());
}

#[test]
fn test_missing_soundfont_rolls_back_piano() {
    let graphics = MockGraphics::new();
    let config = EngineConfig {
        audio_output: false,
        ..EngineConfig::default()
    };
    let mut engine = OrchestraEngine::builder()
        .config(config)
        .graphics(graphics.boxed())
        .build()
        .unwrap();

    let piano = PianoConfig::default().with_voice(VoiceConfig::new("does/not/exist.sf2"));
    let err = engine.add_piano(0.0, 0.0, piano).unwrap_err();

    assert_eq!(bind_step(&err), Some(BindStep::LoadSoundFont));
    assert_eq!(graphics.live_textures(), 0);
    assert!(engine.registry().is_empty());
    assert_eq!(engine.focused(), None);
}

#[test]
fn test_failed_bind_releases_every_layer() {
    let graphics = MockGraphics::new();
    let voices = RecordingBinder::failing(BindStep::SelectPreset);
    let mut engine = test_engine(&graphics, &voices);

    let err = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap_err();

    assert_eq!(bind_step(&err), Some(BindStep::SelectPreset));
    assert_eq!(graphics.live_textures(), 0);
    assert_eq!(voices.live_voices(), 0);
}

#[test]
fn test_failed_texture_leaves_no_instrument() {
    let graphics = MockGraphics::new();
    graphics.fail_on("res/instrument/piano/blackkey-pressed.png");
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&graphics, &voices);

    let err = engine.add_piano(0.0, 0.0, voiced_piano()).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(CoreError::Construction { ref kind, .. }) if kind == "piano"
    ));
    assert_eq!(graphics.live_textures(), 0);
    assert_eq!(voices.live_voices(), 0);

    // The failed id is not handed out again
    let test = engine.add_test_instrument(0.0, 0.0).unwrap();
    assert_eq!(test.get(), 1);
}

#[test]
fn test_first_instrument_takes_focus() {
    let mut engine = test_engine(&MockGraphics::new(), &RecordingBinder::new());

    let first = engine.add_test_instrument(0.0, 0.0).unwrap();
    let second = engine.add_test_instrument(100.0, 0.0).unwrap();
    assert_eq!(engine.focused(), Some(first));

    engine.focus(Some(second));
    assert_eq!(engine.focused(), Some(second));

    engine.destroy_instrument(second).unwrap();
    assert_eq!(engine.focused(), Some(first));

    engine.destroy_instrument(first).unwrap();
    assert_eq!(engine.focused(), None);
}

#[test]
fn test_focus_ignores_unknown_instrument() {
    let graphics = MockGraphics::new();
    let mut engine = test_engine(&graphics, &RecordingBinder::new());
    let id = engine.add_test_instrument(0.0, 0.0).unwrap();
    engine.destroy_instrument(id).unwrap();

    engine.focus(Some(id));
    assert_eq!(engine.focused(), None);
    assert!(matches!(
        engine.destroy_instrument(id),
        Err(Error::Core(CoreError::UnknownInstrument(_)))
    ));
}

#[test]
fn test_custom_instrument_kind() {
    let graphics = MockGraphics::new();
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&graphics, &voices);

    let kind = TestInstrument::new("res/custom.png").with_voice(VoiceConfig::default());
    let id = engine.create_instrument(Box::new(kind), 5.0, 6.0).unwrap();

    let instrument = engine.registry().get(id).unwrap();
    assert_eq!(instrument.kind_name(), "test");
    assert_eq!(instrument.position(), (5.0, 6.0));
    assert!(instrument.has_voice());
    assert_eq!(graphics.live_textures(), 1);
    assert_eq!(voices.live_voices(), 1);
}

#[test]
fn test_render_applies_position_and_camera() {
    let graphics = MockGraphics::new();
    let mut engine = test_engine(&graphics, &RecordingBinder::new());
    let id = engine.add_test_instrument(10.0, 20.0).unwrap();

    engine.render();
    let draws = graphics.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!((draws[0].1.x, draws[0].1.y), (10, 20));
    assert_eq!((draws[0].1.width, draws[0].1.height), (32, 32));

    graphics.clear_draws();
    engine.set_position(id, 0.0, 0.0).unwrap();
    engine.camera_mut().set_zoom(2.0);
    engine.camera_mut().set_offset(-5.0, 0.0);
    engine.render();

    let quad = graphics.draws()[0].1;
    assert_eq!((quad.x, quad.y), (10, 0));
    assert_eq!((quad.width, quad.height), (64, 64));
}

#[test]
fn test_shutdown_releases_everything() {
    let graphics = MockGraphics::new();
    let voices = RecordingBinder::new();
    let mut engine = test_engine(&graphics, &voices);

    engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();
    engine.add_test_instrument(0.0, 300.0).unwrap();
    assert_eq!(graphics.live_textures(), 123);
    assert_eq!(voices.live_voices(), 1);

    engine.shutdown();
    assert!(engine.registry().is_empty());
    assert_eq!(graphics.live_textures(), 0);
    assert_eq!(voices.live_voices(), 0);
    assert_eq!(engine.focused(), None);

    // Second call is a no-op
    engine.shutdown();
    assert!(engine.registry().is_empty());
}

#[test]
fn test_drop_releases_textures() {
    let graphics = MockGraphics::new();
    let voices = RecordingBinder::new();
    {
        let mut engine = test_engine(&graphics, &voices);
        engine.add_piano(0.0, 0.0, voiced_piano()).unwrap();
        assert_eq!(graphics.live_textures(), 122);
    }
    assert_eq!(graphics.live_textures(), 0);
    assert_eq!(voices.live_voices(), 0);
}
