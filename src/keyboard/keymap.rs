//! Key code definitions and printable label mapping

use evdev::Key;

/// Represents a physical key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// Shift, ctrl, meta or caps lock
    pub fn is_modifier(&self) -> bool {
        matches!(
            Key::new(self.0),
            Key::KEY_LEFTSHIFT
                | Key::KEY_RIGHTSHIFT
                | Key::KEY_LEFTCTRL
                | Key::KEY_RIGHTCTRL
                | Key::KEY_LEFTMETA
                | Key::KEY_RIGHTMETA
                | Key::KEY_CAPSLOCK
        )
    }
}

/// Outcome of translating a key code.
///
/// Modifier keys and unknown keys are both "no text", but only unknown keys
/// end up in the transcript, as a numeric fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLabel {
    /// Printable text or a bracketed token such as `[ENTER]`
    Text(&'static str),
    /// A modifier key; state only, never logged
    Modifier,
    /// Not in the recognized set
    Unrecognized,
}

/// Label written for codes outside the recognized set
pub fn unhandled_label(code: KeyCode) -> String {
    format!("[UNHANDLED CODE] {}", code.0)
}

/// Translate a key code into its display label.
///
/// `upper` is the effective case (shift XOR caps lock). It selects the
/// upper-case letter or the shifted symbol; bracketed tokens ignore it.
pub fn translate(code: KeyCode, upper: bool) -> KeyLabel {
    if code.is_modifier() {
        return KeyLabel::Modifier;
    }

    if let Some((lower, shifted)) = character_pair(code) {
        return KeyLabel::Text(if upper { shifted } else { lower });
    }

    match special_token(code) {
        Some(token) => KeyLabel::Text(token),
        None => KeyLabel::Unrecognized,
    }
}

/// Unshifted and shifted text for letter, digit and punctuation keys (US layout)
fn character_pair(code: KeyCode) -> Option<(&'static str, &'static str)> {
    let pair = match Key::new(code.0) {
        // Letters
        Key::KEY_A => ("a", "A"),
        Key::KEY_B => ("b", "B"),
        Key::KEY_C => ("c", "C"),
        Key::KEY_D => ("d", "D"),
        Key::KEY_E => ("e", "E"),
        Key::KEY_F => ("f", "F"),
        Key::KEY_G => ("g", "G"),
        Key::KEY_H => ("h", "H"),
        Key::KEY_I => ("i", "I"),
        Key::KEY_J => ("j", "J"),
        Key::KEY_K => ("k", "K"),
        Key::KEY_L => ("l", "L"),
        Key::KEY_M => ("m", "M"),
        Key::KEY_N => ("n", "N"),
        Key::KEY_O => ("o", "O"),
        Key::KEY_P => ("p", "P"),
        Key::KEY_Q => ("q", "Q"),
        Key::KEY_R => ("r", "R"),
        Key::KEY_S => ("s", "S"),
        Key::KEY_T => ("t", "T"),
        Key::KEY_U => ("u", "U"),
        Key::KEY_V => ("v", "V"),
        Key::KEY_W => ("w", "W"),
        Key::KEY_X => ("x", "X"),
        Key::KEY_Y => ("y", "Y"),
        Key::KEY_Z => ("z", "Z"),

        // Number row
        Key::KEY_1 => ("1", "!"),
        Key::KEY_2 => ("2", "@"),
        Key::KEY_3 => ("3", "#"),
        Key::KEY_4 => ("4", "$"),
        Key::KEY_5 => ("5", "%"),
        Key::KEY_6 => ("6", "^"),
        Key::KEY_7 => ("7", "&"),
        Key::KEY_8 => ("8", "*"),
        Key::KEY_9 => ("9", "("),
        Key::KEY_0 => ("0", ")"),
        Key::KEY_MINUS => ("-", "_"),
        Key::KEY_EQUAL => ("=", "+"),

        // Punctuation
        Key::KEY_GRAVE => ("`", "~"),
        Key::KEY_LEFTBRACE => ("[", "{"),
        Key::KEY_RIGHTBRACE => ("]", "}"),
        Key::KEY_BACKSLASH => ("\\", "|"),
        Key::KEY_SEMICOLON => (";", ":"),
        Key::KEY_APOSTROPHE => ("'", "\""),
        Key::KEY_COMMA => (",", "<"),
        Key::KEY_DOT => (".", ">"),
        Key::KEY_SLASH => ("/", "?"),

        _ => return None,
    };
    Some(pair)
}

/// Bracketed tokens for whitespace, editing, navigation and function keys
fn special_token(code: KeyCode) -> Option<&'static str> {
    let token = match Key::new(code.0) {
        Key::KEY_SPACE => "[SPACE]",
        Key::KEY_ENTER => "[ENTER]",
        Key::KEY_KPENTER => "[ENTER]",
        Key::KEY_BACKSPACE => "[BACKSPACE]",
        Key::KEY_TAB => "[TAB]",
        Key::KEY_ESC => "[ESC]",
        Key::KEY_DELETE => "[DELETE]",
        Key::KEY_INSERT => "[INSERT]",
        Key::KEY_HOME => "[HOME]",
        Key::KEY_END => "[END]",
        Key::KEY_PAGEUP => "[PAGEUP]",
        Key::KEY_PAGEDOWN => "[PAGEDOWN]",
        Key::KEY_UP => "[UP]",
        Key::KEY_DOWN => "[DOWN]",
        Key::KEY_LEFT => "[LEFT]",
        Key::KEY_RIGHT => "[RIGHT]",
        Key::KEY_LEFTALT => "[ALT]",
        Key::KEY_RIGHTALT => "[ALTGR]",
        Key::KEY_F1 => "[F1]",
        Key::KEY_F2 => "[F2]",
        Key::KEY_F3 => "[F3]",
        Key::KEY_F4 => "[F4]",
        Key::KEY_F5 => "[F5]",
        Key::KEY_F6 => "[F6]",
        Key::KEY_F7 => "[F7]",
        Key::KEY_F8 => "[F8]",
        Key::KEY_F9 => "[F9]",
        Key::KEY_F10 => "[F10]",
        Key::KEY_F11 => "[F11]",
        Key::KEY_F12 => "[F12]",
        _ => return None,
    };
    Some(token)
}
