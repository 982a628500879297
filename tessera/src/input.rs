use std::fmt::Display;

/// A logical key, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key that produces text. Letters are lowercase.
    Char(char),
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    LCtrl,
    RCtrl,
    LShift,
    RShift,
    LAlt,
    RAlt,
    CapsLock,
    NumLock,
    ScrollLock,
    F(u8),
    Other,
}

impl Key {
    /// Ctrl, shift and alt on either side.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::LCtrl | Key::RCtrl | Key::LShift | Key::RShift | Key::LAlt | Key::RAlt
        )
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// The set of mouse buttons currently held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MouseButtons {
    pub fn set(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.left = down,
            MouseButton::Middle => self.middle = down,
            MouseButton::Right => self.right = down,
        }
    }

    /// The button a drag is attributed to. Left wins over middle, middle
    /// over right.
    pub fn primary(&self) -> Option<MouseButton> {
        if self.left {
            Some(MouseButton::Left)
        } else if self.middle {
            Some(MouseButton::Middle)
        } else if self.right {
            Some(MouseButton::Right)
        } else {
            None
        }
    }

    pub fn any(&self) -> bool {
        self.primary().is_some()
    }
}

/// Modifier and lock tracking fed from key events.
///
/// Modifiers follow press and release. Locks toggle on release.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardState {
    alt: bool,
    ctrl: bool,
    shift: bool,
    caps: bool,
    num: bool,
    scroll: bool,
}

impl KeyboardState {
    pub fn process(&mut self, key: Key, pressed: bool) -> &mut Self {
        match key {
            Key::LCtrl | Key::RCtrl => self.ctrl = pressed,
            Key::LShift | Key::RShift => self.shift = pressed,
            Key::LAlt | Key::RAlt => self.alt = pressed,
            Key::CapsLock if !pressed => self.caps = !self.caps,
            Key::NumLock if !pressed => self.num = !self.num,
            Key::ScrollLock if !pressed => self.scroll = !self.scroll,
            _ => {}
        }
        self
    }

    /// True when exactly the given modifiers are held.
    pub fn combine(&self, alt: bool, ctrl: bool, shift: bool) -> bool {
        self.alt == alt && self.ctrl == ctrl && self.shift == shift
    }

    /// Alt is the only modifier held.
    pub fn alt(&self) -> bool {
        self.combine(true, false, false)
    }

    /// Ctrl is the only modifier held.
    pub fn ctrl(&self) -> bool {
        self.combine(false, true, false)
    }

    /// Shift is the only modifier held.
    pub fn shift(&self) -> bool {
        self.combine(false, false, true)
    }

    pub fn caps_lock(&self) -> bool {
        self.caps
    }

    pub fn num_lock(&self) -> bool {
        self.num
    }

    pub fn scroll_lock(&self) -> bool {
        self.scroll
    }
}

impl Display for KeyboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "alt: {}, ctrl: {}, shift: {}, caps: {}, num: {}, scroll: {}",
            self.alt, self.ctrl, self.shift, self.caps, self.num, self.scroll
        )
    }
}
