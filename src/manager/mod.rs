//! Overlay session manager
//!
//! Owns the single open [`OverlaySession`] and everything that outlives it:
//! histories, the completion catalog, the preview bridge and the replayer.
//! Opening seeds a session from the focused surface; closing either replays
//! the committed text into the engine or rolls the previews back.

use std::cell::RefCell;
use std::rc::Rc;

use crate::completion::{CompletionCatalog, CompletionEngine, SearchWordProvider};
use crate::config::OverlaySettings;
use crate::error::manager::FailureLog;
use crate::event_loop::EventLoop;
use crate::history::HistoryStore;
use crate::host::{read_scoped, Host, SurfaceId, WindowId};
use crate::key::{ComponentId, KeyEvent};
use crate::mode::{OverlayMode, SearchDirection};
use crate::preview::{PreviewBridge, PreviewChannel};
use crate::replay::Replayer;
use crate::session::{KeyOutcome, OverlaySession, SessionPreviews, SessionSeed};
use crate::suppression::SuppressionHandle;

/// ## manager/ Invariants
///
/// - At most one session is open; a trigger while one is open is a no-op.
/// - Submitted text reaches history before focus returns to the editing
///   surface, and is replayed only after that.
/// - Cancel never replays.

pub struct OverlaySessionManager {
    host: Rc<dyn Host>,
    window: WindowId,
    events: EventLoop,
    settings: OverlaySettings,
    histories: HistoryStore,
    catalog: Rc<CompletionCatalog>,
    bridge: Rc<RefCell<PreviewBridge>>,
    replayer: Rc<RefCell<Replayer>>,
    session: Option<OverlaySession>,
    overlay_component: Option<ComponentId>,
    failures: FailureLog,
}

impl OverlaySessionManager {
    #[must_use]
    pub fn new(
        host: Rc<dyn Host>,
        window: WindowId,
        events: EventLoop,
        settings: OverlaySettings,
        suppression: SuppressionHandle,
    ) -> Self {
        let replayer = Replayer::new(Rc::clone(&host), suppression)
            .with_suppression_window(settings.suppression);
        Self {
            histories: HistoryStore::new(settings.history_capacity),
            catalog: Rc::new(CompletionCatalog::new(Rc::clone(&host))),
            bridge: Rc::new(RefCell::new(PreviewBridge::new(
                Rc::clone(&host),
                events.clone(),
            ))),
            replayer: Rc::new(RefCell::new(replayer)),
            host,
            window,
            events,
            settings,
            session: None,
            overlay_component: None,
            failures: FailureLog::new(),
        }
    }

    /// Open an overlay for `mode`. Returns `true` when a session is open
    /// afterwards, including one that was already open.
    pub fn handle_trigger(&mut self, mode: OverlayMode) -> bool {
        if self.session.is_some() {
            tracing::debug!(?mode, "overlay already open, trigger ignored");
            return true;
        }
        let Some(surface) = self.current_surface() else {
            return false;
        };
        let Some(engine_mode) = self.host.engine_mode(surface) else {
            tracing::debug!(?mode, "engine mode unknown, overlay refused");
            return false;
        };
        if !engine_mode.allows(mode) {
            tracing::debug!(?mode, ?engine_mode, "engine mode does not allow overlay");
            return false;
        }
        let visual_range = engine_mode.has_visual_selection();
        self.open_session(surface, mode, visual_range);
        true
    }

    fn open_session(&mut self, surface: SurfaceId, mode: OverlayMode, visual_range: bool) {
        let host = &*self.host;
        let initial_offset = host.caret_offset(surface);
        let max_words = self.settings.max_search_words;
        let words = read_scoped(host, || {
            SearchWordProvider::extract(&host.document_text(surface), max_words)
        });
        let completion = CompletionEngine::new(Rc::clone(&self.catalog), words, mode, &self.settings);

        let channel = |direction: SearchDirection| {
            PreviewChannel::new(Rc::clone(&self.bridge), surface, direction, initial_offset)
        };
        let mut previews = SessionPreviews::default();
        if mode.is_search() {
            self.bridge.borrow().reset();
            previews.search = Some(channel(mode.direction()));
        } else if mode == OverlayMode::Command {
            previews.pattern = Some(channel(SearchDirection::Forward));
        }

        let seed = SessionSeed {
            mode,
            surface,
            window: self.window,
            initial_offset,
            history: self.histories.bucket(mode.history_bucket()).snapshot(),
            navigation: self.settings.navigation.clone(),
            visual_range,
        };
        self.session = Some(OverlaySession::new(
            Rc::clone(&self.host),
            seed,
            completion,
            previews,
        ));
        tracing::debug!(?mode, ?surface, initial_offset, "overlay opened");
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&OverlaySession> {
        self.session.as_ref()
    }

    /// Whether a preview snapshot is held for `surface`
    #[must_use]
    pub fn is_previewing(&self, surface: SurfaceId) -> bool {
        self.bridge.borrow().is_previewing(surface)
    }

    #[must_use]
    pub fn histories(&self) -> &HistoryStore {
        &self.histories
    }

    #[must_use]
    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    #[must_use]
    pub fn events(&self) -> &EventLoop {
        &self.events
    }

    /// Replace the open session's input with user-typed text
    pub fn update_input(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.set_input(text);
        }
    }

    /// Route a key from the overlay input to the open session. Consumes the
    /// event and returns `true` when the overlay used it.
    pub fn handle_overlay_key(&mut self, event: &mut KeyEvent) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let handled = match session.handle_key(event) {
            KeyOutcome::Ignored => false,
            KeyOutcome::Handled => true,
            KeyOutcome::Submit => {
                self.submit();
                true
            }
            KeyOutcome::Cancel => {
                self.cancel();
                true
            }
        };
        if handled {
            event.consume();
        }
        handled
    }

    /// Commit the open session: record history, close, refocus the editor,
    /// then replay `<prefix><text><enter>` from the event loop. An empty
    /// line closes without replay.
    pub fn submit(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        self.overlay_component = None;
        let text = session.submit();
        let mode = session.mode();
        let surface = session.surface();
        drop(session);

        self.histories.bucket(mode.history_bucket()).add(&text);
        self.host.request_focus(surface);
        if text.is_empty() {
            return;
        }
        let replayer = Rc::clone(&self.replayer);
        self.events.post(move || {
            replayer.borrow_mut().replay(surface, mode, &text);
        });
    }

    /// Close the open session without replay, rolling back its previews
    pub fn cancel(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        self.overlay_component = None;
        session.cancel();
        self.host.request_focus(session.surface());
    }

    /// The overlay lost focus to something other than its own input
    pub fn focus_lost(&mut self) {
        if self.session.is_some() {
            tracing::debug!("overlay lost focus, cancelling");
            self.cancel();
        }
    }

    /// Record the component hosting the open overlay's input
    pub fn bind_overlay_component(&mut self, component: ComponentId) {
        if self.session.is_some() {
            self.overlay_component = Some(component);
        }
    }

    #[must_use]
    pub fn is_overlay_component(&self, component: ComponentId) -> bool {
        self.session.is_some() && self.overlay_component == Some(component)
    }

    /// Whether `component` lives in the window this manager serves
    #[must_use]
    pub fn owns_component(&self, component: ComponentId) -> bool {
        self.host.component_window(component) == Some(self.window)
    }

    /// Whether `component` is the focused editing surface
    #[must_use]
    pub fn is_editor_component(&self, component: ComponentId) -> bool {
        match (self.current_surface(), self.host.surface_of(component)) {
            (Some(focused), Some(surface)) => focused == surface,
            _ => false,
        }
    }

    /// Surface an event from `source` targets; unattributed events go to the
    /// focused surface
    #[must_use]
    pub fn surface_for(&self, source: Option<ComponentId>) -> Option<SurfaceId> {
        match source {
            Some(component) => self
                .host
                .surface_of(component)
                .filter(|s| !self.host.is_disposed(*s)),
            None => self.current_surface(),
        }
    }

    /// Whether the engine is part-way through a multi-key sequence on
    /// `surface`. A failed probe counts as idle.
    pub fn is_engine_busy(&mut self, surface: SurfaceId) -> bool {
        match self.host.pending_state(surface) {
            Ok(state) => state.is_busy(),
            Err(err) => {
                self.failures
                    .report(format!("pending_state:{}", err.code), &err);
                false
            }
        }
    }

    fn current_surface(&self) -> Option<SurfaceId> {
        self.host
            .focused_surface()
            .filter(|s| !self.host.is_disposed(*s))
    }
}

impl Drop for OverlaySessionManager {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
