//! Crossterm-based terminal backend

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind as CtKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

use crate::key::{shift_for_char, KeyEvent, VirtualKey};
use crate::term::{Size, TerminalBackend};

/// Crossterm-based terminal backend implementation
pub struct CrosstermBackend {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl CrosstermBackend {
    pub fn new() -> Result<Self, String> {
        Ok(CrosstermBackend {
            raw_mode_enabled: false,
            alternate_screen_enabled: false,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn init(&mut self) -> Result<(), String> {
        execute!(stdout(), terminal::EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {e}"))?;
        self.alternate_screen_enabled = true;

        terminal::enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {e}"))?;
        self.raw_mode_enabled = true;
        Ok(())
    }

    fn deinit(&mut self) {
        let _ = execute!(stdout(), cursor::Show, SetAttribute(Attribute::Reset));

        if self.raw_mode_enabled {
            let _ = terminal::disable_raw_mode();
            self.raw_mode_enabled = false;
        }

        if self.alternate_screen_enabled {
            let _ = execute!(stdout(), terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }
    }

    fn read_key_events(&mut self) -> Result<Vec<KeyEvent>, String> {
        loop {
            if let Event::Key(key_event) =
                event::read().map_err(|e| format!("Failed to read event: {e}"))?
            {
                let events = translate_key_event(key_event);
                if !events.is_empty() {
                    return Ok(events);
                }
            }
        }
    }

    fn write(&mut self, text: &str) -> Result<(), String> {
        queue!(stdout(), Print(text)).map_err(|e| format!("Write failed: {e}"))
    }

    fn get_size(&self) -> Result<Size, String> {
        let (cols, rows) =
            terminal::size().map_err(|e| format!("Failed to get terminal size: {e}"))?;
        Ok(Size { rows, cols })
    }

    fn clear_screen(&mut self) -> Result<(), String> {
        queue!(stdout(), terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
            .map_err(|e| format!("Failed to clear screen: {e}"))
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), String> {
        queue!(stdout(), cursor::MoveTo(col, row))
            .map_err(|e| format!("Failed to move cursor: {e}"))
    }

    fn set_reverse(&mut self, on: bool) -> Result<(), String> {
        let attribute = if on {
            Attribute::Reverse
        } else {
            Attribute::NoReverse
        };
        queue!(stdout(), SetAttribute(attribute))
            .map_err(|e| format!("Failed to set attribute: {e}"))
    }

    fn flush(&mut self) -> Result<(), String> {
        stdout().flush().map_err(|e| format!("Flush failed: {e}"))
    }
}

/// Translate a crossterm key event into the press (and, for printable
/// characters, typed) events a host window delivers
pub(crate) fn translate_key_event(key_event: event::KeyEvent) -> Vec<KeyEvent> {
    if key_event.kind == CtKind::Release {
        return Vec::new();
    }
    let modifiers = key_event.modifiers;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    let named = |key: VirtualKey| vec![KeyEvent::pressed(key, modifiers)];
    match key_event.code {
        KeyCode::Char('\r' | '\n') => named(VirtualKey::Enter),
        KeyCode::Char(ch) if ctrl || alt => {
            vec![KeyEvent::pressed(VirtualKey::for_char(ch), modifiers)]
        }
        KeyCode::Char(ch) => {
            let modifiers = modifiers | shift_for_char(ch);
            vec![
                KeyEvent::pressed(VirtualKey::for_char(ch), modifiers).with_char(ch),
                KeyEvent::typed(ch),
            ]
        }
        KeyCode::Enter => named(VirtualKey::Enter),
        KeyCode::Esc => named(VirtualKey::Escape),
        KeyCode::Tab => named(VirtualKey::Tab),
        KeyCode::BackTab => vec![KeyEvent::pressed(
            VirtualKey::Tab,
            modifiers | KeyModifiers::SHIFT,
        )],
        KeyCode::Backspace => named(VirtualKey::Backspace),
        KeyCode::Delete => named(VirtualKey::Delete),
        KeyCode::Insert => named(VirtualKey::Insert),
        KeyCode::Up => named(VirtualKey::Up),
        KeyCode::Down => named(VirtualKey::Down),
        KeyCode::Left => named(VirtualKey::Left),
        KeyCode::Right => named(VirtualKey::Right),
        KeyCode::Home => named(VirtualKey::Home),
        KeyCode::End => named(VirtualKey::End),
        KeyCode::PageUp => named(VirtualKey::PageUp),
        KeyCode::PageDown => named(VirtualKey::PageDown),
        KeyCode::F(n) => named(VirtualKey::F(n)),
        _ => Vec::new(),
    }
}
