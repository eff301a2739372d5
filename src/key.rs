//! Key representation for overlay input
//!
//! Events arrive in press/typed/release triples. A press carries the
//! virtual key and, when the keyboard produces one, the character; a typed
//! event carries only the character.

use crossterm::event::KeyModifiers;

/// Identity of a UI component that originated a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub u64);

/// Phase of a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Pressed,
    Typed,
    Released,
}

/// Physical (virtual) key, independent of the produced character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualKey {
    /// Letter key, stored uppercase (`R`, `P`, `N`, ...)
    Letter(char),
    Digit(u8),
    Equals,
    Colon,
    Semicolon,
    Slash,
    /// Keypad divide
    Divide,
    Minus,
    Plus,
    Space,
    Shift,
    Control,
    Alt,
    Meta,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Any other key with a character of its own
    Other(char),
    /// No virtual key (character-only events)
    Undefined,
}

impl VirtualKey {
    /// Pure modifier keys never change the meaning of a pending sequence
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            VirtualKey::Shift | VirtualKey::Control | VirtualKey::Alt | VirtualKey::Meta
        )
    }

    /// Key that produces `ch` on a US layout
    #[must_use]
    pub fn for_char(ch: char) -> VirtualKey {
        match ch {
            '\n' | '\r' => VirtualKey::Enter,
            '\t' => VirtualKey::Tab,
            ' ' => VirtualKey::Space,
            'a'..='z' | 'A'..='Z' => VirtualKey::Letter(ch.to_ascii_uppercase()),
            '0'..='9' => VirtualKey::Digit(ch as u8 - b'0'),
            '=' => VirtualKey::Equals,
            ':' => VirtualKey::Colon,
            ';' => VirtualKey::Semicolon,
            '/' | '?' => VirtualKey::Slash,
            '-' => VirtualKey::Minus,
            '+' => VirtualKey::Plus,
            c if c.is_control() => VirtualKey::Undefined,
            c => VirtualKey::Other(c),
        }
    }
}

/// A single key event as delivered by the host's event queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: VirtualKey,
    /// Produced character, if any
    pub ch: Option<char>,
    pub modifiers: KeyModifiers,
    /// Component the event was dispatched to; `None` for unattributed events
    pub source: Option<ComponentId>,
    consumed: bool,
}

impl KeyEvent {
    /// Key press without a produced character
    #[must_use]
    pub fn pressed(key: VirtualKey, modifiers: KeyModifiers) -> Self {
        Self {
            kind: KeyEventKind::Pressed,
            key,
            ch: None,
            modifiers,
            source: None,
            consumed: false,
        }
    }

    /// Character-typed event
    #[must_use]
    pub fn typed(ch: char) -> Self {
        Self {
            kind: KeyEventKind::Typed,
            key: VirtualKey::Undefined,
            ch: Some(ch),
            modifiers: shift_for_char(ch),
            source: None,
            consumed: false,
        }
    }

    /// Key release
    #[must_use]
    pub fn released(key: VirtualKey, modifiers: KeyModifiers) -> Self {
        Self {
            kind: KeyEventKind::Released,
            ..Self::pressed(key, modifiers)
        }
    }

    /// Attach the produced character
    #[must_use]
    pub fn with_char(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }

    /// Attribute the event to a component
    #[must_use]
    pub fn from_component(mut self, source: ComponentId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(KeyModifiers::SHIFT)
    }

    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CONTROL)
    }

    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }

    #[must_use]
    pub fn meta(&self) -> bool {
        self.modifiers
            .intersects(KeyModifiers::META | KeyModifiers::SUPER)
    }
}

/// A key combination, used for replay and for overlay key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub key: VirtualKey,
    /// Character for character strokes (`None` for named keys)
    pub ch: Option<char>,
    pub modifiers: KeyModifiers,
}

impl KeyStroke {
    /// Named-key stroke
    #[must_use]
    pub fn new(key: VirtualKey, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            ch: None,
            modifiers,
        }
    }

    /// Stroke that types `ch`; newline becomes Enter
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        match ch {
            '\n' | '\r' => Self::new(VirtualKey::Enter, KeyModifiers::NONE),
            _ => Self {
                key: VirtualKey::for_char(ch),
                ch: Some(ch),
                modifiers: shift_for_char(ch),
            },
        }
    }

    /// Whether a press event activates this stroke
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.kind != KeyEventKind::Pressed {
            return false;
        }
        self.key == event.key && self.modifiers == event.modifiers
    }
}

/// Shift state needed to produce `ch` on a US layout
#[must_use]
pub fn shift_for_char(ch: char) -> KeyModifiers {
    if ch.is_uppercase() {
        return KeyModifiers::SHIFT;
    }
    match ch {
        ':' | '?' | '+' | '*' | '"' | '<' | '>' | '{' | '}' | '|' | '_' | '~' | '^' | '&'
        | '%' | '$' | '#' | '@' | ')' | '(' | '!' | '§' | '°' => KeyModifiers::SHIFT,
        _ => KeyModifiers::NONE,
    }
}
