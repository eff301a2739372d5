//! Command and search history
//!
//! Bounded, deduplicated, most-recent-first list of submitted lines.
//! Reads and writes are serialized through a single lock so a history can be
//! shared between sessions.

use parking_lot::Mutex;

/// Default number of entries kept per history
pub const DEFAULT_CAPACITY: usize = 20;

/// Submitted-line history, newest first
#[derive(Debug)]
pub struct CommandHistory {
    /// Stored entries (newest first)
    entries: Mutex<Vec<String>>,
    /// Maximum number of entries to keep
    capacity: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl CommandHistory {
    /// Create a new history with the specified capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Add a line to history
    ///
    /// - Skips blank lines
    /// - Moves an existing identical entry to the front
    /// - Evicts the oldest entry when over capacity
    pub fn add(&self, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        let mut entries = self.entries.lock();
        entries.retain(|e| e != value);
        entries.insert(0, value.to_string());
        entries.truncate(self.capacity);
    }

    /// Copy of the current entries, newest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
