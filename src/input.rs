/*
 * Input Module
 *
 * This module turns raw keyboard events into the per-tick control state the
 * flock reads. The window layer feeds key presses into a Keyboard tracker;
 * once per simulation tick the tracker produces an immutable KeySnapshot
 * (current + previous key state) that is passed by reference into the
 * flock. Edge-triggered actions compare the two halves of the snapshot.
 *
 * Key map:
 * - a / d: leader yaw left / right
 * - i / k: leader pitch up / down
 * - w / s: leader speed up / down, space: stop
 * - + / -: add / remove a boid
 * - c: cycle camera mode, f: toggle fog, p: toggle pause
 * - q / e: zoom out / in
 */

use nannou::prelude::*;

use crate::app::Model;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKey {
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    Accelerate,
    Decelerate,
    Stop,
    AddBoid,
    RemoveBoid,
    CycleCamera,
    ToggleFog,
    TogglePause,
    ZoomOut,
    ZoomIn,
}

impl ControlKey {
    pub const ALL: [ControlKey; 14] = [
        ControlKey::YawLeft,
        ControlKey::YawRight,
        ControlKey::PitchUp,
        ControlKey::PitchDown,
        ControlKey::Accelerate,
        ControlKey::Decelerate,
        ControlKey::Stop,
        ControlKey::AddBoid,
        ControlKey::RemoveBoid,
        ControlKey::CycleCamera,
        ControlKey::ToggleFog,
        ControlKey::TogglePause,
        ControlKey::ZoomOut,
        ControlKey::ZoomIn,
    ];

    /// The control bound to a typed character.
    pub fn from_char(c: char) -> Option<Self> {
        let key = match c.to_ascii_lowercase() {
            'a' => ControlKey::YawLeft,
            'd' => ControlKey::YawRight,
            'i' => ControlKey::PitchUp,
            'k' => ControlKey::PitchDown,
            'w' => ControlKey::Accelerate,
            's' => ControlKey::Decelerate,
            ' ' => ControlKey::Stop,
            '+' | '=' => ControlKey::AddBoid,
            '-' => ControlKey::RemoveBoid,
            'c' => ControlKey::CycleCamera,
            'f' => ControlKey::ToggleFog,
            'p' => ControlKey::TogglePause,
            'q' => ControlKey::ZoomOut,
            'e' => ControlKey::ZoomIn,
            _ => return None,
        };
        Some(key)
    }

    /// The control bound to a physical key. `=` doubles as `+` so adding a
    /// boid does not need shift.
    pub fn from_key(key: Key) -> Option<Self> {
        let control = match key {
            Key::A => ControlKey::YawLeft,
            Key::D => ControlKey::YawRight,
            Key::I => ControlKey::PitchUp,
            Key::K => ControlKey::PitchDown,
            Key::W => ControlKey::Accelerate,
            Key::S => ControlKey::Decelerate,
            Key::Space => ControlKey::Stop,
            Key::Plus | Key::Equals | Key::NumpadAdd => ControlKey::AddBoid,
            Key::Minus | Key::NumpadSubtract => ControlKey::RemoveBoid,
            Key::C => ControlKey::CycleCamera,
            Key::F => ControlKey::ToggleFog,
            Key::P => ControlKey::TogglePause,
            Key::Q => ControlKey::ZoomOut,
            Key::E => ControlKey::ZoomIn,
            _ => return None,
        };
        Some(control)
    }

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of held control keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeySet(u16);

impl KeySet {
    pub fn insert(&mut self, key: ControlKey) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: ControlKey) {
        self.0 &= !key.bit();
    }

    pub fn contains(self, key: ControlKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<ControlKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = ControlKey>>(iter: I) -> Self {
        let mut set = KeySet::default();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Key state for one simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub current: KeySet,
    pub previous: KeySet,
}

impl KeySnapshot {
    pub fn new(current: KeySet, previous: KeySet) -> Self {
        Self { current, previous }
    }

    /// Snapshot with `keys` freshly pressed this tick.
    pub fn pressed(keys: &[ControlKey]) -> Self {
        Self::new(keys.iter().copied().collect(), KeySet::default())
    }

    /// Held this tick, whether or not it was held last tick.
    pub fn is_down(&self, key: ControlKey) -> bool {
        self.current.contains(key)
    }

    /// Transitioned from released to pressed on this tick.
    pub fn just_pressed(&self, key: ControlKey) -> bool {
        self.current.contains(key) && !self.previous.contains(key)
    }
}

// Mutable key bookkeeping fed by window events
#[derive(Debug, Default)]
pub struct Keyboard {
    held: KeySet,
    previous: KeySet,
}

impl Keyboard {
    pub fn press(&mut self, key: ControlKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: ControlKey) {
        self.held.remove(key);
    }

    pub fn snapshot(&self) -> KeySnapshot {
        KeySnapshot::new(self.held, self.previous)
    }

    // Call after each tick has consumed its snapshot
    pub fn end_tick(&mut self) {
        self.previous = self.held;
    }
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if let Some(control) = ControlKey::from_key(key) {
        model.keyboard.press(control);
    }
}

// Key released event handler
pub fn key_released(_app: &App, model: &mut Model, key: Key) {
    if let Some(control) = ControlKey::from_key(key) {
        model.keyboard.release(control);
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
