//! Committed-text replay
//!
//! Delivers `<prefix><text><enter>` to the engine as if typed. Each key goes
//! through the engine's own key handler when the host supports it; once that
//! fails, the remaining keys are synthesized as press/typed/release triples on
//! the host event queue, with trigger interception suppressed meanwhile.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::manager::FailureLog;
use crate::host::{Host, SurfaceId};
use crossterm::event::KeyModifiers;

use crate::key::{KeyEvent, KeyStroke, VirtualKey};
use crate::mode::OverlayMode;
use crate::suppression::{SuppressionHandle, DEFAULT_SUPPRESSION};

/// How a replay reached the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    /// Keys accepted by the engine's key handler
    pub handled: usize,
    /// Keys posted as synthetic events
    pub synthesized: usize,
}

impl ReplayReport {
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.synthesized > 0
    }
}

/// Replays committed overlay text into the engine
pub struct Replayer {
    host: Rc<dyn Host>,
    suppression: SuppressionHandle,
    suppression_window: Duration,
    failures: FailureLog,
}

impl Replayer {
    #[must_use]
    pub fn new(host: Rc<dyn Host>, suppression: SuppressionHandle) -> Self {
        Self {
            host,
            suppression,
            suppression_window: DEFAULT_SUPPRESSION,
            failures: FailureLog::new(),
        }
    }

    #[must_use]
    pub fn with_suppression_window(mut self, window: Duration) -> Self {
        self.suppression_window = window;
        self
    }

    /// Keys typed for `text` committed in `mode`
    #[must_use]
    pub fn keys_for(mode: OverlayMode, text: &str) -> Vec<char> {
        std::iter::once(mode.prefix())
            .chain(text.chars())
            .chain(std::iter::once('\n'))
            .collect()
    }

    /// Replay `text` for `mode` into `surface`
    pub fn replay(&mut self, surface: SurfaceId, mode: OverlayMode, text: &str) -> ReplayReport {
        let mut report = ReplayReport::default();
        let mut engine_accepts = true;
        for ch in Self::keys_for(mode, text) {
            if engine_accepts {
                match self.host.handle_key(surface, KeyStroke::from_char(ch)) {
                    Ok(()) => {
                        report.handled += 1;
                        continue;
                    }
                    Err(err) => {
                        self.failures.report(format!("handle_key:{}", err.code), &err);
                        engine_accepts = false;
                        tracing::info!(?mode, "engine key handler refused replay, synthesizing keys");
                    }
                }
            }
            self.suppression.arm(Instant::now(), self.suppression_window);
            self.synthesize(surface, ch);
            report.synthesized += 1;
        }
        tracing::debug!(?mode, handled = report.handled, synthesized = report.synthesized, "replayed overlay input");
        report
    }

    /// Post the event triple a keyboard would produce for `ch`
    fn synthesize(&self, surface: SurfaceId, ch: char) {
        let key = VirtualKey::for_char(ch);
        if key == VirtualKey::Undefined {
            self.host.post_key_event(surface, KeyEvent::typed(ch));
            return;
        }
        let modifiers = KeyStroke::from_char(ch).modifiers;
        self.host
            .post_key_event(surface, KeyEvent::pressed(key, modifiers).with_char(ch));
        self.host.post_key_event(surface, KeyEvent::typed(ch));
        self.host
            .post_key_event(surface, KeyEvent::released(key, KeyModifiers::NONE));
    }
}
