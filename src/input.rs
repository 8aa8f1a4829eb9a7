//! Keyboard and mouse bindings.
//!
//! The window layer hands the engine one [`InputSnapshot`] per frame. The
//! [`KeyBindings`] compare it with the previous frame and turn it into
//! [`InputAction`]s: held arrows pan every frame, while playback control and
//! notes react to press and release edges only.

use std::collections::{HashMap, HashSet};
use tracing::debug;
use vorchestra_core::PanDirection;
use vorchestra_midi::{Note, PitchClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
    Shift,
}

/// State of the input devices for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keys currently held.
    pub keys: HashSet<Key>,
    /// Wheel motion this frame, positive away from the user.
    pub wheel_y: f32,
    pub mouse_x: i32,
    pub mouse_y: i32,
    /// Relative motion this frame while the drag button is held.
    pub drag: Option<(i32, i32)>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Pan(PanDirection),
    Drag { dx: i32, dy: i32 },
    Zoom { precise_y: f32, x: i32, y: i32 },
    TogglePlayback,
    StopPlayback,
    NoteOn(Note),
    NoteOff(Note),
    OctaveChanged(i8),
}

/// Tracker-style row: two rows of keys span one octave plus the next C.
const PERFORMANCE_KEYS: [(Key, i8); 13] = [
    (Key::Q, 0),
    (Key::Num2, 1),
    (Key::W, 2),
    (Key::Num3, 3),
    (Key::E, 4),
    (Key::R, 5),
    (Key::Num5, 6),
    (Key::T, 7),
    (Key::Num6, 8),
    (Key::Y, 9),
    (Key::Num7, 10),
    (Key::U, 11),
    (Key::I, 12),
];

const PAN_KEYS: [(Key, PanDirection); 4] = [
    (Key::Up, PanDirection::Up),
    (Key::Down, PanDirection::Down),
    (Key::Left, PanDirection::Left),
    (Key::Right, PanDirection::Right),
];

pub const MIN_BASE_OCTAVE: i8 = 2;
pub const MAX_BASE_OCTAVE: i8 = 6;
pub const DEFAULT_BASE_OCTAVE: i8 = 4;

#[derive(Debug, Clone)]
pub struct KeyBindings {
    base_octave: i8,
    previous: HashSet<Key>,
    /// Notes started by a performance key, released with that key.
    sounding: HashMap<Key, Note>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_OCTAVE)
    }
}

impl KeyBindings {
    pub fn new(base_octave: i8) -> Self {
        Self {
            base_octave: base_octave.clamp(MIN_BASE_OCTAVE, MAX_BASE_OCTAVE),
            previous: HashSet::new(),
            sounding: HashMap::new(),
        }
    }

    pub fn base_octave(&self) -> i8 {
        self.base_octave
    }

    /// Note a performance key plays at the current base octave.
    pub fn note_for(&self, key: Key) -> Option<Note> {
        let (_, semitone) = PERFORMANCE_KEYS.iter().find(|(k, _)| *k == key)?;
        let (pitch_class, octave) = match *semitone {
            12 => (PitchClass::C, self.base_octave + 1),
            s => (PitchClass::ALL[s as usize], self.base_octave),
        };
        Some(Note::new(pitch_class, octave))
    }

    /// Notes currently held down through the keyboard.
    pub fn sounding(&self) -> impl Iterator<Item = &Note> {
        self.sounding.values()
    }

    /// Turn one frame of input into actions, in a stable order.
    pub fn update(&mut self, input: &InputSnapshot) -> Vec<InputAction> {
        let mut actions = Vec::new();
        let pressed = |key: Key| input.is_down(key) && !self.previous.contains(&key);

        for (key, direction) in PAN_KEYS {
            if input.is_down(key) {
                actions.push(InputAction::Pan(direction));
            }
        }

        if let Some((dx, dy)) = input.drag {
            if dx != 0 || dy != 0 {
                actions.push(InputAction::Drag { dx, dy });
            }
        }

        if input.wheel_y != 0.0 {
            actions.push(InputAction::Zoom {
                precise_y: input.wheel_y,
                x: input.mouse_x,
                y: input.mouse_y,
            });
        }

        if pressed(Key::Space) {
            actions.push(InputAction::TogglePlayback);
        }
        if pressed(Key::S) {
            actions.push(InputAction::StopPlayback);
        }

        let mut octave = self.base_octave;
        if pressed(Key::Z) {
            octave = (octave - 1).max(MIN_BASE_OCTAVE);
        }
        if pressed(Key::X) {
            octave = (octave + 1).min(MAX_BASE_OCTAVE);
        }

        for (key, _) in PERFORMANCE_KEYS {
            let was_down = self.previous.contains(&key);
            let is_down = input.is_down(key);
            if was_down && !is_down {
                if let Some(note) = self.sounding.remove(&key) {
                    actions.push(InputAction::NoteOff(note));
                }
            }
        }

        if octave != self.base_octave {
            self.base_octave = octave;
            debug!("Base octave is now {}", octave);
            actions.push(InputAction::OctaveChanged(octave));
        }

        for (key, _) in PERFORMANCE_KEYS {
            if input.is_down(key) && !self.previous.contains(&key) {
                if let Some(note) = self.note_for(key) {
                    self.sounding.insert(key, note);
                    actions.push(InputAction::NoteOn(note));
                }
            }
        }

        self.previous.clone_from(&input.keys);
        actions
    }
}
