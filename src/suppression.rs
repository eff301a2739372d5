//! Trigger suppression window
//!
//! While replayed keys are being delivered through the host's event queue the
//! interceptor must not treat them as new triggers. The window is a deadline
//! on the monotonic clock; arming it again only ever extends it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Default length of the window armed by a synthetic replay
pub const DEFAULT_SUPPRESSION: Duration = Duration::from_millis(300);

/// A deadline before which triggers are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuppressionWindow {
    deadline: Option<Instant>,
}

impl SuppressionWindow {
    /// Window that ends at the later of the current deadline and `deadline`
    #[must_use]
    pub fn extended_until(self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current >= deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
        }
    }

    #[must_use]
    pub fn is_active(self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    #[must_use]
    pub fn deadline(self) -> Option<Instant> {
        self.deadline
    }
}

/// Shared handle to one suppression window
///
/// The interceptor reads it; the replayer arms it.
#[derive(Debug, Clone, Default)]
pub struct SuppressionHandle {
    window: Rc<Cell<SuppressionWindow>>,
}

impl SuppressionHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress triggers until `now + duration`, keeping any later deadline
    pub fn arm(&self, now: Instant, duration: Duration) {
        let window = self.window.get().extended_until(now + duration);
        self.window.set(window);
    }

    #[must_use]
    pub fn is_active(&self, now: Instant) -> bool {
        self.window.get().is_active(now)
    }

    #[must_use]
    pub fn window(&self) -> SuppressionWindow {
        self.window.get()
    }
}
