//! Key spec parsing
//!
//! Turns user-written key specs into [`KeyStroke`]s. Accepted forms:
//! `<C-p>`, `ctrl+n`, `shift tab`, `"<Down>"`, `j`. Tokens are separated by
//! `-`, `+` or whitespace; every token but the key itself is a modifier.

use crossterm::event::KeyModifiers;

use crate::key::{KeyStroke, VirtualKey};

/// Keys that move the completion selection (or browse history when no list
/// is showing)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationBindings {
    pub previous: Vec<KeyStroke>,
    pub next: Vec<KeyStroke>,
}

impl Default for NavigationBindings {
    fn default() -> Self {
        Self {
            previous: vec![
                KeyStroke::new(VirtualKey::Up, KeyModifiers::NONE),
                KeyStroke::new(VirtualKey::Letter('P'), KeyModifiers::CONTROL),
                KeyStroke::new(VirtualKey::Tab, KeyModifiers::SHIFT),
            ],
            next: vec![
                KeyStroke::new(VirtualKey::Down, KeyModifiers::NONE),
                KeyStroke::new(VirtualKey::Letter('N'), KeyModifiers::CONTROL),
                KeyStroke::new(VirtualKey::Tab, KeyModifiers::NONE),
            ],
        }
    }
}

/// Parse every spec, dropping unparseable ones and duplicates
#[must_use]
pub fn parse_key_specs<S: AsRef<str>>(specs: &[S]) -> Vec<KeyStroke> {
    let mut out: Vec<KeyStroke> = Vec::new();
    for spec in specs {
        if let Some(stroke) = parse_key_spec(spec.as_ref()) {
            if !out.contains(&stroke) {
                out.push(stroke);
            }
        }
    }
    out
}

/// Parse a single key spec
#[must_use]
pub fn parse_key_spec(spec: &str) -> Option<KeyStroke> {
    let unquoted = strip_quotes(spec.trim());
    if unquoted.is_empty() {
        return None;
    }
    let inner = unquoted
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .filter(|s| !s.is_empty())
        .unwrap_or(unquoted);

    let mut modifiers = KeyModifiers::NONE;
    let mut key_token = None;
    for token in inner
        .split(|c: char| c == '-' || c == '+' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.to_ascii_lowercase().as_str() {
            "c" | "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
            "a" | "alt" | "option" => modifiers |= KeyModifiers::ALT,
            "m" | "meta" | "cmd" | "command" => modifiers |= KeyModifiers::META,
            _ => key_token = Some(token),
        }
    }
    let key = lookup_key(key_token?)?;
    Some(KeyStroke::new(key, modifiers))
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    s
}

fn lookup_key(token: &str) -> Option<VirtualKey> {
    let lower = token.to_ascii_lowercase();
    let named = match lower.as_str() {
        "up" => VirtualKey::Up,
        "down" => VirtualKey::Down,
        "left" => VirtualKey::Left,
        "right" => VirtualKey::Right,
        "tab" => VirtualKey::Tab,
        "enter" | "return" | "cr" => VirtualKey::Enter,
        "space" => VirtualKey::Space,
        "esc" | "escape" => VirtualKey::Escape,
        "bs" | "backspace" => VirtualKey::Backspace,
        "del" | "delete" => VirtualKey::Delete,
        "home" => VirtualKey::Home,
        "end" => VirtualKey::End,
        "pageup" | "pgup" => VirtualKey::PageUp,
        "pagedown" | "pgdn" => VirtualKey::PageDown,
        "insert" => VirtualKey::Insert,
        "minus" => VirtualKey::Minus,
        "plus" => VirtualKey::Plus,
        _ => return function_key(&lower).or_else(|| single_char(token)),
    };
    Some(named)
}

fn function_key(lower: &str) -> Option<VirtualKey> {
    let n: u8 = lower.strip_prefix('f')?.parse().ok()?;
    (1..=24).contains(&n).then_some(VirtualKey::F(n))
}

fn single_char(token: &str) -> Option<VirtualKey> {
    let mut chars = token.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match VirtualKey::for_char(ch) {
        VirtualKey::Undefined => None,
        key => Some(key),
    }
}
