//! Live search preview
//!
//! Drives the engine's incremental search while the user types in a search
//! (or substitution) overlay, and restores the engine to exactly its prior
//! state when the overlay is cancelled.
//!
//! Per surface the bridge is either idle or previewing. The first non-empty
//! query snapshots the engine's search state and the viewport; rollback
//! restores the snapshot and commit discards it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::event_loop::EventLoop;
use crate::host::{Host, SearchState, SurfaceId, Viewport};
use crate::mode::SearchDirection;

/// ## preview/ Invariants
///
/// - At most one snapshot per surface; it is taken on the first non-empty query.
/// - Rollback and commit each remove the snapshot, so the second call is a no-op.
/// - Commit keeps the engine's search state but returns the caret and
///   viewport to where the session started, ahead of any replay.
/// - Caret and viewport moves are deferred to the event loop and skipped
///   for disposed surfaces.

/// State captured when previewing starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPreviewState {
    pub search: SearchState,
    pub viewport: Option<Viewport>,
}

/// Bridge between overlay input and the engine's incremental search
pub struct PreviewBridge {
    host: Rc<dyn Host>,
    events: EventLoop,
    snapshots: HashMap<SurfaceId, SearchPreviewState>,
}

impl PreviewBridge {
    #[must_use]
    pub fn new(host: Rc<dyn Host>, events: EventLoop) -> Self {
        Self {
            host,
            events,
            snapshots: HashMap::new(),
        }
    }

    /// Clear the engine's incremental-search bookkeeping before a new session
    pub fn reset(&self) {
        self.host.reset_incsearch();
    }

    #[must_use]
    pub fn is_previewing(&self, surface: SurfaceId) -> bool {
        self.snapshots.contains_key(&surface)
    }

    #[must_use]
    pub fn snapshot(&self, surface: SurfaceId) -> Option<&SearchPreviewState> {
        self.snapshots.get(&surface)
    }

    /// Show `query` as a live preview. An empty query rolls back.
    pub fn preview(
        &mut self,
        surface: SurfaceId,
        direction: SearchDirection,
        query: &str,
        initial_offset: usize,
    ) {
        if !self.host.is_available() {
            return;
        }
        if query.is_empty() {
            self.rollback(surface, initial_offset);
            return;
        }
        if !self.snapshots.contains_key(&surface) {
            let state = SearchPreviewState {
                search: self.host.search_state().unwrap_or_default(),
                viewport: self.host.viewport(surface),
            };
            self.snapshots.insert(surface, state);
        }

        self.host.close_search_session(surface);
        match self
            .host
            .update_incsearch(surface, query, direction, initial_offset)
        {
            Ok(Some(offset)) => self.move_caret_later(surface, offset),
            Ok(None) => {
                self.host.clear_search_highlights(surface);
                self.move_caret_later(surface, initial_offset);
            }
            Err(err) => {
                tracing::debug!(error = %err, "incremental search unavailable");
            }
        }
    }

    /// Restore the snapshot taken for `surface`. Returns `false` when the
    /// surface was not previewing.
    pub fn rollback(&mut self, surface: SurfaceId, initial_offset: usize) -> bool {
        let Some(state) = self.snapshots.remove(&surface) else {
            return false;
        };
        self.host.restore_search_state(surface, &state.search);
        self.host.clear_search_highlights(surface);
        self.host.reset_incsearch();
        self.host.close_search_session(surface);
        self.move_caret_later(surface, initial_offset);
        if let Some(viewport) = state.viewport {
            self.scroll_later(surface, viewport);
        }
        tracing::trace!(?surface, "search preview rolled back");
        true
    }

    /// Keep the previewed search state and forget the snapshot. The caret
    /// and viewport go back to the session's start so the replayed command
    /// runs from there.
    pub fn commit(&mut self, surface: SurfaceId, initial_offset: usize) -> bool {
        let Some(state) = self.snapshots.remove(&surface) else {
            return false;
        };
        self.move_caret_later(surface, initial_offset);
        if let Some(viewport) = state.viewport {
            self.scroll_later(surface, viewport);
        }
        tracing::trace!(?surface, "search preview committed");
        true
    }

    fn move_caret_later(&self, surface: SurfaceId, offset: usize) {
        let host = Rc::clone(&self.host);
        self.events.post(move || {
            if host.is_disposed(surface) {
                return;
            }
            let offset = offset.min(host.document_len(surface));
            host.move_caret(surface, offset);
        });
    }

    fn scroll_later(&self, surface: SurfaceId, viewport: Viewport) {
        let host = Rc::clone(&self.host);
        self.events.post(move || {
            if !host.is_disposed(surface) {
                host.scroll_to(surface, viewport);
            }
        });
    }
}

/// One session's view of the shared bridge: a fixed surface, direction and
/// starting caret
#[derive(Clone)]
pub struct PreviewChannel {
    bridge: Rc<RefCell<PreviewBridge>>,
    surface: SurfaceId,
    direction: SearchDirection,
    initial_offset: usize,
}

impl PreviewChannel {
    #[must_use]
    pub fn new(
        bridge: Rc<RefCell<PreviewBridge>>,
        surface: SurfaceId,
        direction: SearchDirection,
        initial_offset: usize,
    ) -> Self {
        Self {
            bridge,
            surface,
            direction,
            initial_offset,
        }
    }

    pub fn show(&self, query: &str) {
        self.bridge
            .borrow_mut()
            .preview(self.surface, self.direction, query, self.initial_offset);
    }

    pub fn cancel(&self) -> bool {
        self.bridge
            .borrow_mut()
            .rollback(self.surface, self.initial_offset)
    }

    pub fn commit(&self) -> bool {
        self.bridge
            .borrow_mut()
            .commit(self.surface, self.initial_offset)
    }

    #[must_use]
    pub fn is_previewing(&self) -> bool {
        self.bridge.borrow().is_previewing(self.surface)
    }
}
