//! Terminal backend for the demo binary
//!
//! The library itself never touches a terminal; the demo drives an
//! [`InMemoryHost`](crate::host::InMemoryHost) from real key presses and
//! draws the overlay through this trait.

/// ## term/ Invariants
///
/// - Raw mode is enabled before input processing begins and restored on exit.
/// - Every terminal key press becomes the press/typed pair a host window
///   would deliver.
use crate::key::KeyEvent;

/// Terminal size information
#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub rows: u16,
    pub cols: u16,
}

/// Terminal operations the demo needs
pub trait TerminalBackend {
    /// Initialize terminal and enter raw mode
    fn init(&mut self) -> Result<(), String>;

    /// Restore terminal to original state
    fn deinit(&mut self);

    /// Block until the next key press and return its raw events.
    /// Releases and non-key events are skipped.
    fn read_key_events(&mut self) -> Result<Vec<KeyEvent>, String>;

    /// Write text at the cursor
    fn write(&mut self, text: &str) -> Result<(), String>;

    fn get_size(&self) -> Result<Size, String>;

    fn clear_screen(&mut self) -> Result<(), String>;

    /// Move cursor to specified position (0-indexed)
    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), String>;

    /// Toggle reverse video for subsequent writes
    fn set_reverse(&mut self, on: bool) -> Result<(), String>;

    /// Flush queued output
    fn flush(&mut self) -> Result<(), String>;
}

pub mod crossterm;
