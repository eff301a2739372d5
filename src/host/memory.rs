//! In-memory host
//!
//! A scriptable, recording implementation of every host capability. Used by
//! the test suites and by the terminal demo, which drives it from crossterm.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::{CmdfloatError, ErrorType, Result};
use crate::host::{
    ActionInfo, CommandCatalog, EditorSurfaces, GlobalValue, ModalEngine, OptionInfo,
    PendingState, ScriptGlobals, SearchState, SurfaceId, Viewport, WindowId,
};
use crate::key::{ComponentId, KeyEvent, KeyStroke, VirtualKey};
use crate::mode::{EngineMode, SearchDirection};
use crate::search;

#[derive(Debug, Clone, Default)]
struct Surface {
    text: String,
    caret: usize,
    viewport: Viewport,
    disposed: bool,
}

#[derive(Debug, Clone, Copy)]
struct Component {
    window: WindowId,
    surface: Option<SurfaceId>,
}

/// Host that keeps all state in memory and records what the overlay did
#[derive(Debug)]
pub struct InMemoryHost {
    available: Cell<bool>,
    engine_mode: Cell<Option<EngineMode>>,
    /// `None` makes `pending_state` fail
    pending: Cell<Option<PendingState>>,
    search: RefCell<SearchState>,
    flags: RefCell<HashMap<String, bool>>,
    globals: RefCell<HashMap<String, GlobalValue>>,
    ex_commands: RefCell<Vec<String>>,
    actions: RefCell<Vec<ActionInfo>>,
    options: RefCell<Vec<OptionInfo>>,
    catalog_fails: Cell<bool>,
    catalog_loads: Cell<usize>,
    surfaces: RefCell<HashMap<SurfaceId, Surface>>,
    components: RefCell<HashMap<ComponentId, Component>>,
    focused: Cell<Option<SurfaceId>>,
    /// Keys the engine accepts before `handle_key` starts failing
    key_budget: Cell<Option<usize>>,
    handled_keys: RefCell<Vec<KeyStroke>>,
    command_line: RefCell<String>,
    executed: RefCell<Vec<String>>,
    posted: RefCell<Vec<(SurfaceId, KeyEvent)>>,
    highlights: RefCell<HashMap<SurfaceId, String>>,
    incsearch_resets: Cell<usize>,
    closed_search_sessions: Cell<usize>,
    focus_requests: RefCell<Vec<SurfaceId>>,
    read_depth: Cell<usize>,
    read_acquisitions: Cell<usize>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHost {
    /// Available host in normal mode with no surfaces
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: Cell::new(true),
            engine_mode: Cell::new(Some(EngineMode::Normal)),
            pending: Cell::new(Some(PendingState::default())),
            search: RefCell::new(SearchState::default()),
            flags: RefCell::new(HashMap::new()),
            globals: RefCell::new(HashMap::new()),
            ex_commands: RefCell::new(Vec::new()),
            actions: RefCell::new(Vec::new()),
            options: RefCell::new(Vec::new()),
            catalog_fails: Cell::new(false),
            catalog_loads: Cell::new(0),
            surfaces: RefCell::new(HashMap::new()),
            components: RefCell::new(HashMap::new()),
            focused: Cell::new(None),
            key_budget: Cell::new(None),
            handled_keys: RefCell::new(Vec::new()),
            command_line: RefCell::new(String::new()),
            executed: RefCell::new(Vec::new()),
            posted: RefCell::new(Vec::new()),
            highlights: RefCell::new(HashMap::new()),
            incsearch_resets: Cell::new(0),
            closed_search_sessions: Cell::new(0),
            focus_requests: RefCell::new(Vec::new()),
            read_depth: Cell::new(0),
            read_acquisitions: Cell::new(0),
        }
    }

    /// Add an editor surface holding `text`, focus it, and register
    /// `component` in `window` as its editor component
    pub fn add_editor(
        &self,
        surface: SurfaceId,
        text: &str,
        component: ComponentId,
        window: WindowId,
    ) {
        self.surfaces.borrow_mut().insert(
            surface,
            Surface {
                text: text.to_string(),
                ..Surface::default()
            },
        );
        self.components.borrow_mut().insert(
            component,
            Component {
                window,
                surface: Some(surface),
            },
        );
        self.focused.set(Some(surface));
    }

    /// Register a non-editor component
    pub fn add_component(&self, component: ComponentId, window: WindowId) {
        self.components.borrow_mut().insert(
            component,
            Component {
                window,
                surface: None,
            },
        );
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn set_engine_mode(&self, mode: Option<EngineMode>) {
        self.engine_mode.set(mode);
    }

    /// `None` makes the pending-state probe fail
    pub fn set_pending(&self, pending: Option<PendingState>) {
        self.pending.set(pending);
    }

    pub fn set_flag(&self, name: &str, value: bool) {
        self.flags.borrow_mut().insert(name.to_string(), value);
    }

    pub fn set_global(&self, name: &str, value: GlobalValue) {
        self.globals.borrow_mut().insert(name.to_string(), value);
    }

    pub fn set_search_state(&self, state: SearchState) {
        *self.search.borrow_mut() = state;
    }

    pub fn set_ex_commands<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.ex_commands.borrow_mut() = names.into_iter().map(Into::into).collect();
    }

    pub fn set_actions(&self, actions: Vec<ActionInfo>) {
        *self.actions.borrow_mut() = actions;
    }

    pub fn set_options(&self, options: Vec<OptionInfo>) {
        *self.options.borrow_mut() = options;
    }

    /// Make every catalog query fail
    pub fn set_catalog_fails(&self, fails: bool) {
        self.catalog_fails.set(fails);
    }

    /// Accept `budget` keys through `handle_key`, then fail. `None` accepts all.
    pub fn set_key_budget(&self, budget: Option<usize>) {
        self.key_budget.set(budget);
    }

    pub fn set_caret(&self, surface: SurfaceId, offset: usize) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&surface) {
            s.caret = offset;
        }
    }

    pub fn set_viewport(&self, surface: SurfaceId, viewport: Viewport) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&surface) {
            s.viewport = viewport;
        }
    }

    pub fn dispose_surface(&self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.borrow_mut().get_mut(&surface) {
            s.disposed = true;
        }
    }

    pub fn focus(&self, surface: Option<SurfaceId>) {
        self.focused.set(surface);
    }

    #[must_use]
    pub fn current_search_state(&self) -> SearchState {
        self.search.borrow().clone()
    }

    /// Pattern currently highlighted on `surface`
    #[must_use]
    pub fn highlight(&self, surface: SurfaceId) -> Option<String> {
        self.highlights.borrow().get(&surface).cloned()
    }

    #[must_use]
    pub fn handled_keys(&self) -> Vec<KeyStroke> {
        self.handled_keys.borrow().clone()
    }

    /// Lines executed by the engine, prompt character included
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    #[must_use]
    pub fn posted_events(&self) -> Vec<(SurfaceId, KeyEvent)> {
        self.posted.borrow().clone()
    }

    #[must_use]
    pub fn focus_requests(&self) -> Vec<SurfaceId> {
        self.focus_requests.borrow().clone()
    }

    #[must_use]
    pub fn incsearch_resets(&self) -> usize {
        self.incsearch_resets.get()
    }

    #[must_use]
    pub fn closed_search_sessions(&self) -> usize {
        self.closed_search_sessions.get()
    }

    #[must_use]
    pub fn read_acquisitions(&self) -> usize {
        self.read_acquisitions.get()
    }

    /// Number of catalog queries answered
    #[must_use]
    pub fn catalog_loads(&self) -> usize {
        self.catalog_loads.get()
    }

    fn catalog_query(&self) -> Result<()> {
        self.catalog_loads.set(self.catalog_loads.get() + 1);
        if self.catalog_fails.get() {
            return Err(CmdfloatError::new(
                ErrorType::Unavailable,
                "CATALOG_UNAVAILABLE",
                "command catalog is not loaded",
            ));
        }
        Ok(())
    }

    fn ignore_case_for(&self, pattern: &search::NormalizedPattern) -> bool {
        let flags = self.flags.borrow();
        let ignorecase = flags.get("ignorecase").copied().unwrap_or(false);
        let smartcase = flags.get("smartcase").copied().unwrap_or(false);
        pattern.ignore_case(ignorecase, smartcase)
    }

    /// Run a line the engine received key by key
    fn execute(&self, surface: SurfaceId, line: String) {
        let mut chars = line.chars();
        let direction = match chars.next() {
            Some('/') => Some(SearchDirection::Forward),
            Some('?') => Some(SearchDirection::Backward),
            _ => None,
        };
        if let Some(direction) = direction {
            let raw = chars.as_str().to_string();
            let normalized = search::normalize_pattern(&raw, direction);
            let ignore_case = self.ignore_case_for(&normalized);
            let text = self.document_text(surface);
            let offsets = search::match_offsets(&text, &normalized.pattern, ignore_case);
            let caret = self.caret_offset(surface);
            let from = match direction {
                SearchDirection::Forward => caret + 1,
                SearchDirection::Backward => caret.saturating_sub(1),
            };
            if let Some(target) = search::nearest_match(&offsets, from, direction) {
                self.set_caret(surface, target);
            }
            let mut state = self.search.borrow_mut();
            state.last_pattern = Some(raw);
            state.direction = direction;
        }
        self.executed.borrow_mut().push(line);
    }
}

impl ModalEngine for InMemoryHost {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    fn engine_mode(&self, _surface: SurfaceId) -> Option<EngineMode> {
        self.engine_mode.get()
    }

    fn pending_state(&self, _surface: SurfaceId) -> Result<PendingState> {
        self.pending
            .get()
            .ok_or_else(|| CmdfloatError::unsupported("pending_state"))
    }

    fn search_state(&self) -> Option<SearchState> {
        Some(self.search.borrow().clone())
    }

    fn restore_search_state(&self, _surface: SurfaceId, state: &SearchState) {
        *self.search.borrow_mut() = state.clone();
    }

    fn update_incsearch(
        &self,
        surface: SurfaceId,
        pattern: &str,
        direction: SearchDirection,
        caret: usize,
    ) -> Result<Option<usize>> {
        let normalized = search::normalize_pattern(pattern, direction);
        let ignore_case = self.ignore_case_for(&normalized);
        let text = self.document_text(surface);
        let offsets = search::match_offsets(&text, &normalized.pattern, ignore_case);
        let target = search::nearest_match(&offsets, caret, direction);
        let mut highlights = self.highlights.borrow_mut();
        if target.is_some() {
            highlights.insert(surface, normalized.pattern);
        } else {
            highlights.remove(&surface);
        }
        Ok(target)
    }

    fn clear_search_highlights(&self, surface: SurfaceId) {
        self.highlights.borrow_mut().remove(&surface);
    }

    fn reset_incsearch(&self) {
        self.incsearch_resets.set(self.incsearch_resets.get() + 1);
    }

    fn close_search_session(&self, _surface: SurfaceId) {
        self.closed_search_sessions
            .set(self.closed_search_sessions.get() + 1);
    }

    fn handle_key(&self, surface: SurfaceId, stroke: KeyStroke) -> Result<()> {
        if let Some(budget) = self.key_budget.get() {
            if budget == 0 {
                return Err(CmdfloatError::unsupported("handle_key"));
            }
            self.key_budget.set(Some(budget - 1));
        }
        self.handled_keys.borrow_mut().push(stroke);
        if stroke.key == VirtualKey::Enter {
            let line = std::mem::take(&mut *self.command_line.borrow_mut());
            self.execute(surface, line);
        } else if let Some(ch) = stroke.ch {
            self.command_line.borrow_mut().push(ch);
        }
        Ok(())
    }

    fn option_flag(&self, name: &str) -> Option<bool> {
        self.flags.borrow().get(name).copied()
    }
}

impl CommandCatalog for InMemoryHost {
    fn ex_commands(&self) -> Result<Vec<String>> {
        self.catalog_query()?;
        Ok(self.ex_commands.borrow().clone())
    }

    fn actions(&self) -> Result<Vec<ActionInfo>> {
        self.catalog_query()?;
        Ok(self.actions.borrow().clone())
    }

    fn options(&self) -> Result<Vec<OptionInfo>> {
        self.catalog_query()?;
        Ok(self.options.borrow().clone())
    }
}

impl ScriptGlobals for InMemoryHost {
    fn global_variable(&self, name: &str) -> Option<GlobalValue> {
        self.globals.borrow().get(name).cloned()
    }
}

impl EditorSurfaces for InMemoryHost {
    fn focused_surface(&self) -> Option<SurfaceId> {
        self.focused.get()
    }

    fn surface_of(&self, component: ComponentId) -> Option<SurfaceId> {
        self.components
            .borrow()
            .get(&component)
            .and_then(|c| c.surface)
    }

    fn component_window(&self, component: ComponentId) -> Option<WindowId> {
        self.components.borrow().get(&component).map(|c| c.window)
    }

    fn is_disposed(&self, surface: SurfaceId) -> bool {
        self.surfaces
            .borrow()
            .get(&surface)
            .map_or(true, |s| s.disposed)
    }

    fn caret_offset(&self, surface: SurfaceId) -> usize {
        self.surfaces.borrow().get(&surface).map_or(0, |s| s.caret)
    }

    fn move_caret(&self, surface: SurfaceId, offset: usize) {
        self.set_caret(surface, offset);
    }

    fn viewport(&self, surface: SurfaceId) -> Option<Viewport> {
        self.surfaces.borrow().get(&surface).map(|s| s.viewport)
    }

    fn scroll_to(&self, surface: SurfaceId, viewport: Viewport) {
        self.set_viewport(surface, viewport);
    }

    fn document_text(&self, surface: SurfaceId) -> String {
        self.surfaces
            .borrow()
            .get(&surface)
            .map(|s| s.text.clone())
            .unwrap_or_default()
    }

    fn request_focus(&self, surface: SurfaceId) {
        self.focus_requests.borrow_mut().push(surface);
        self.focused.set(Some(surface));
    }

    fn with_read_access(&self, f: &mut dyn FnMut()) {
        let depth = self.read_depth.get();
        if depth == 0 {
            self.read_acquisitions.set(self.read_acquisitions.get() + 1);
        }
        self.read_depth.set(depth + 1);
        f();
        self.read_depth.set(depth);
    }

    fn post_key_event(&self, surface: SurfaceId, event: KeyEvent) {
        self.posted.borrow_mut().push((surface, event));
    }
}
