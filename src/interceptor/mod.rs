//! Trigger key interception
//!
//! Sits in front of the host's key dispatch and watches editor keys for the
//! overlay triggers: `:`, `/`, `?`, and Ctrl-R `=` for the expression
//! register. A trigger that opens an overlay is consumed together with the
//! typed event that follows it; every other key passes through untouched.

use std::time::Instant;

use crate::key::{KeyEvent, KeyEventKind, VirtualKey};
use crate::manager::OverlaySessionManager;
use crate::mode::OverlayMode;
use crate::suppression::SuppressionHandle;

/// ## interceptor/ Invariants
///
/// - Only pressed and typed events are inspected; releases always pass.
/// - A consumed trigger press swallows exactly one following typed event.
/// - Keys from the overlay's own input, from other windows, or from
///   non-editor components never trigger.
/// - Ctrl-R never consumes; only the `=` that completes it can.

/// Progress through the two-key expression trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    /// Ctrl-R seen; `=` opens the expression overlay
    AwaitingExpressionTrigger,
}

#[derive(Debug, Default)]
pub struct KeyInterceptor {
    state: TriggerState,
    suppress_next_typed: bool,
    suppression: SuppressionHandle,
}

impl KeyInterceptor {
    #[must_use]
    pub fn new(suppression: SuppressionHandle) -> Self {
        Self {
            state: TriggerState::Idle,
            suppress_next_typed: false,
            suppression,
        }
    }

    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Inspect `event`. Returns `true` (and consumes it) when it belonged to
    /// an overlay trigger.
    pub fn dispatch(&mut self, event: &mut KeyEvent, manager: &mut OverlaySessionManager) -> bool {
        self.dispatch_at(event, manager, Instant::now())
    }

    /// [`dispatch`](Self::dispatch) against an explicit clock
    pub fn dispatch_at(
        &mut self,
        event: &mut KeyEvent,
        manager: &mut OverlaySessionManager,
        now: Instant,
    ) -> bool {
        match event.kind {
            KeyEventKind::Pressed => {
                self.track_register_prefix(event);
                let handled = self.intercept(event, manager, now);
                if handled {
                    self.suppress_next_typed = true;
                    event.consume();
                }
                handled
            }
            KeyEventKind::Typed => {
                if self.suppress_next_typed {
                    self.suppress_next_typed = false;
                    event.consume();
                    return true;
                }
                let handled = self.intercept(event, manager, now);
                if handled {
                    event.consume();
                }
                handled
            }
            KeyEventKind::Released => false,
        }
    }

    fn intercept(
        &mut self,
        event: &KeyEvent,
        manager: &mut OverlaySessionManager,
        now: Instant,
    ) -> bool {
        if event.is_consumed() {
            return false;
        }
        if self.suppression.is_active(now) {
            self.state = TriggerState::Idle;
            return false;
        }

        let surface = match event.source {
            Some(component) => {
                if manager.is_overlay_component(component)
                    || !manager.owns_component(component)
                    || !manager.is_editor_component(component)
                {
                    return false;
                }
                manager.surface_for(Some(component))
            }
            None => manager.surface_for(None),
        };

        if self.state == TriggerState::AwaitingExpressionTrigger {
            if is_expression_trigger(event) {
                self.state = TriggerState::Idle;
                return surface.is_some() && manager.handle_trigger(OverlayMode::Expression);
            }
            if cancels_register_prefix(event) {
                self.state = TriggerState::Idle;
            }
        }

        // The engine is mid-sequence: `:` might be an `f:` argument, etc.
        if let Some(surface) = surface {
            if manager.is_engine_busy(surface) {
                return false;
            }
        }

        match detect_overlay_mode(event) {
            Some(mode) => manager.handle_trigger(mode),
            None => false,
        }
    }

    fn track_register_prefix(&mut self, event: &KeyEvent) {
        if event.key == VirtualKey::Letter('R') && event.ctrl() && !event.alt() && !event.meta() {
            self.state = TriggerState::AwaitingExpressionTrigger;
            return;
        }
        if matches!(event.key, VirtualKey::Equals | VirtualKey::Undefined) || event.key.is_modifier() {
            return;
        }
        self.state = TriggerState::Idle;
    }
}

fn is_expression_trigger(event: &KeyEvent) -> bool {
    match event.kind {
        KeyEventKind::Typed => event.ch == Some('='),
        KeyEventKind::Pressed => event.key == VirtualKey::Equals,
        KeyEventKind::Released => false,
    }
}

fn cancels_register_prefix(event: &KeyEvent) -> bool {
    match event.kind {
        KeyEventKind::Typed => event.ch.is_some_and(|c| !c.is_control()),
        KeyEventKind::Pressed => !matches!(
            event.key,
            VirtualKey::Letter('R') | VirtualKey::Undefined
        ) && !event.key.is_modifier(),
        KeyEventKind::Released => false,
    }
}

/// Overlay a key would open, by produced character or, failing that, by
/// virtual key and shift state
#[must_use]
pub fn detect_overlay_mode(event: &KeyEvent) -> Option<OverlayMode> {
    match event.ch {
        Some(':') => return Some(OverlayMode::Command),
        Some('/') => return Some(OverlayMode::SearchForward),
        Some('?') => return Some(OverlayMode::SearchBackward),
        _ => {}
    }
    match event.key {
        VirtualKey::Colon => Some(OverlayMode::Command),
        VirtualKey::Semicolon if event.shift() => Some(OverlayMode::Command),
        VirtualKey::Slash | VirtualKey::Divide if event.shift() => Some(OverlayMode::SearchBackward),
        VirtualKey::Slash | VirtualKey::Divide => Some(OverlayMode::SearchForward),
        _ => None,
    }
}
