//! Modifier key state tracking

use super::{KeyCode, KeyValue, RawEvent};
use evdev::Key;

/// Live state of the modifier keys.
///
/// Shift, ctrl and meta mirror the most recent press or release of either
/// the left or right key. Caps lock is a toggle flipped on fresh presses only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub caps_lock: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state from a key record.
    ///
    /// Touches at most one field. Returns `true` if the code was a modifier.
    pub fn process_event(&mut self, event: &RawEvent) -> bool {
        if !event.is_key() {
            return false;
        }
        self.apply(KeyCode(event.code), event.key_value())
    }

    /// Apply a key transition to the modifier state
    pub fn apply(&mut self, code: KeyCode, value: KeyValue) -> bool {
        // Press and repeat both count as down
        let down = value != KeyValue::Release;

        match Key::new(code.0) {
            Key::KEY_LEFTSHIFT | Key::KEY_RIGHTSHIFT => self.shift = down,
            Key::KEY_LEFTCTRL | Key::KEY_RIGHTCTRL => self.ctrl = down,
            Key::KEY_LEFTMETA | Key::KEY_RIGHTMETA => self.meta = down,
            Key::KEY_CAPSLOCK => {
                if value == KeyValue::Press {
                    self.caps_lock = !self.caps_lock;
                }
            }
            _ => return false,
        }
        true
    }

    /// Effective case for letter keys: shift XOR caps lock
    pub fn is_upper(&self) -> bool {
        self.shift ^ self.caps_lock
    }
}
