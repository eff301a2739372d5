//! Host editor capabilities
//!
//! The overlay never talks to a concrete editor. Everything it needs from the
//! host is split into capability traits; an adapter implements all of them
//! and is selected once at startup from the host's version string.
//!
//! Every capability reports its own availability. A host that cannot perform
//! an operation returns `None`, an empty list, or a `Capability` warning, and
//! callers fall back instead of failing.

pub mod memory;

pub use memory::InMemoryHost;

use crate::error::{CmdfloatError, Result};
use crate::key::{ComponentId, KeyEvent, KeyStroke};
use crate::mode::{EngineMode, SearchDirection};

/// ## host/ Invariants
///
/// - Capability calls never panic on an unsupported host; they degrade.
/// - `with_read_access` is reentrant: nested calls run the closure directly.
/// - Offsets are byte offsets into the surface's document text.

/// Identity of an editing surface (a text editor view)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Identity of a top-level host window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Scroll position of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub horizontal: usize,
    pub vertical: usize,
}

/// Multi-key state of the engine; any flag set means it is mid-sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingState {
    /// Waiting for a character argument (`f`, `t`, `r`, register names, ...)
    pub awaiting_char_argument: bool,
    /// Part-way through a multi-key command
    pub building_multi_key: bool,
    /// Inserting the next key literally (Ctrl-V)
    pub inserting_literal: bool,
    /// Operator typed, motion pending
    pub operator_pending: bool,
    /// Command builder holds keys
    pub builder_non_empty: bool,
    /// A mapping is being expanded
    pub executing_mapping: bool,
}

impl PendingState {
    /// Whether a trigger key would be an argument rather than a trigger
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.awaiting_char_argument
            || self.building_multi_key
            || self.inserting_literal
            || self.operator_pending
            || self.builder_non_empty
            || self.executing_mapping
    }
}

/// Engine-global "last search" state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub last_pattern: Option<String>,
    pub last_substitute_pattern: Option<String>,
    pub direction: SearchDirection,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            last_pattern: None,
            last_substitute_pattern: None,
            direction: SearchDirection::Forward,
        }
    }
}

/// Registered editor action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInfo {
    pub id: String,
    /// Presentation label, if the action has one
    pub label: Option<String>,
}

/// Engine option with its optional abbreviation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInfo {
    pub name: String,
    pub abbreviation: Option<String>,
}

/// Value of an engine global variable
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<GlobalValue>),
}

impl GlobalValue {
    /// Truthiness the way the engine's script language sees it
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GlobalValue::Bool(b) => Some(*b),
            GlobalValue::Int(n) => Some(*n != 0),
            GlobalValue::Str(s) => s.trim().parse::<i64>().ok().map(|n| n != 0),
            GlobalValue::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            GlobalValue::Int(n) => Some(*n),
            GlobalValue::Bool(b) => Some(i64::from(*b)),
            GlobalValue::Str(s) => s.trim().parse().ok(),
            GlobalValue::List(_) => None,
        }
    }

    /// Flatten to strings; scalars become a one-element list
    #[must_use]
    pub fn as_string_list(&self) -> Vec<String> {
        match self {
            GlobalValue::List(items) => items.iter().flat_map(GlobalValue::as_string_list).collect(),
            GlobalValue::Str(s) => vec![s.clone()],
            GlobalValue::Int(n) => vec![n.to_string()],
            GlobalValue::Bool(b) => vec![i64::from(*b).to_string()],
        }
    }
}

/// The modal editing engine
pub trait ModalEngine {
    /// Whether the engine is loaded and enabled
    fn is_available(&self) -> bool;

    /// Current modal state for `surface`, if the engine can tell
    fn engine_mode(&self, surface: SurfaceId) -> Option<EngineMode>;

    /// Multi-key state; errors when the host cannot report it
    fn pending_state(&self, surface: SurfaceId) -> Result<PendingState>;

    fn search_state(&self) -> Option<SearchState>;

    fn restore_search_state(&self, surface: SurfaceId, state: &SearchState);

    /// Highlight matches of `pattern` and return the offset of the match the
    /// engine would jump to from `caret`, or `None` when nothing matches
    fn update_incsearch(
        &self,
        surface: SurfaceId,
        pattern: &str,
        direction: SearchDirection,
        caret: usize,
    ) -> Result<Option<usize>>;

    fn clear_search_highlights(&self, surface: SurfaceId);

    /// Drop the engine's incremental-search bookkeeping
    fn reset_incsearch(&self);

    /// End any search session the engine holds for `surface`
    fn close_search_session(&self, surface: SurfaceId);

    /// Feed one keystroke through the engine's key handler
    fn handle_key(&self, surface: SurfaceId, stroke: KeyStroke) -> Result<()> {
        let _ = (surface, stroke);
        Err(CmdfloatError::unsupported("handle_key"))
    }

    /// Boolean engine option such as `ignorecase`
    fn option_flag(&self, name: &str) -> Option<bool>;
}

/// Names the engine knows about, for completion
pub trait CommandCatalog {
    fn ex_commands(&self) -> Result<Vec<String>>;
    fn actions(&self) -> Result<Vec<ActionInfo>>;
    fn options(&self) -> Result<Vec<OptionInfo>>;
}

/// Engine global variables (`g:` scope)
pub trait ScriptGlobals {
    fn global_variable(&self, name: &str) -> Option<GlobalValue>;
}

/// Editor surfaces, focus and the host event queue
pub trait EditorSurfaces {
    fn focused_surface(&self) -> Option<SurfaceId>;

    /// Surface that `component` belongs to, if it is part of an editor
    fn surface_of(&self, component: ComponentId) -> Option<SurfaceId>;

    fn component_window(&self, component: ComponentId) -> Option<WindowId>;

    fn is_disposed(&self, surface: SurfaceId) -> bool;

    fn caret_offset(&self, surface: SurfaceId) -> usize;

    /// Move the caret and scroll it into view
    fn move_caret(&self, surface: SurfaceId, offset: usize);

    fn viewport(&self, surface: SurfaceId) -> Option<Viewport>;

    fn scroll_to(&self, surface: SurfaceId, viewport: Viewport);

    fn document_text(&self, surface: SurfaceId) -> String;

    fn document_len(&self, surface: SurfaceId) -> usize {
        self.document_text(surface).len()
    }

    fn request_focus(&self, surface: SurfaceId);

    /// Run `f` holding the host's document read lock
    fn with_read_access(&self, f: &mut dyn FnMut());

    /// Append a synthetic event to the host's key event queue
    fn post_key_event(&self, surface: SurfaceId, event: KeyEvent);
}

/// Everything an adapter provides
pub trait Host: ModalEngine + CommandCatalog + ScriptGlobals + EditorSurfaces {}

impl<T: ModalEngine + CommandCatalog + ScriptGlobals + EditorSurfaces> Host for T {}

/// Run `f` under the host's read lock and hand back its result
pub fn read_scoped<T>(host: &(impl EditorSurfaces + ?Sized), f: impl FnOnce() -> T) -> T {
    let mut pending = Some(f);
    let mut out = None;
    host.with_read_access(&mut || {
        if let Some(f) = pending.take() {
            out = Some(f());
        }
    });
    match (out, pending) {
        (Some(value), _) => value,
        // Host never ran the closure; read without the lock
        (None, Some(f)) => f(),
        (None, None) => unreachable!("closure ran without producing a value"),
    }
}

/// Adapter used when no factory supports the running host
///
/// Reports itself unavailable; every capability degrades to a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl ModalEngine for NullHost {
    fn is_available(&self) -> bool {
        false
    }

    fn engine_mode(&self, _surface: SurfaceId) -> Option<EngineMode> {
        None
    }

    fn pending_state(&self, _surface: SurfaceId) -> Result<PendingState> {
        Err(CmdfloatError::unsupported("pending_state"))
    }

    fn search_state(&self) -> Option<SearchState> {
        None
    }

    fn restore_search_state(&self, _surface: SurfaceId, _state: &SearchState) {}

    fn update_incsearch(
        &self,
        _surface: SurfaceId,
        _pattern: &str,
        _direction: SearchDirection,
        _caret: usize,
    ) -> Result<Option<usize>> {
        Err(CmdfloatError::unsupported("update_incsearch"))
    }

    fn clear_search_highlights(&self, _surface: SurfaceId) {}

    fn reset_incsearch(&self) {}

    fn close_search_session(&self, _surface: SurfaceId) {}

    fn option_flag(&self, _name: &str) -> Option<bool> {
        None
    }
}

impl CommandCatalog for NullHost {
    fn ex_commands(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn actions(&self) -> Result<Vec<ActionInfo>> {
        Ok(Vec::new())
    }

    fn options(&self) -> Result<Vec<OptionInfo>> {
        Ok(Vec::new())
    }
}

impl ScriptGlobals for NullHost {
    fn global_variable(&self, _name: &str) -> Option<GlobalValue> {
        None
    }
}

impl EditorSurfaces for NullHost {
    fn focused_surface(&self) -> Option<SurfaceId> {
        None
    }

    fn surface_of(&self, _component: ComponentId) -> Option<SurfaceId> {
        None
    }

    fn component_window(&self, _component: ComponentId) -> Option<WindowId> {
        None
    }

    fn is_disposed(&self, _surface: SurfaceId) -> bool {
        true
    }

    fn caret_offset(&self, _surface: SurfaceId) -> usize {
        0
    }

    fn move_caret(&self, _surface: SurfaceId, _offset: usize) {}

    fn viewport(&self, _surface: SurfaceId) -> Option<Viewport> {
        None
    }

    fn scroll_to(&self, _surface: SurfaceId, _viewport: Viewport) {}

    fn document_text(&self, _surface: SurfaceId) -> String {
        String::new()
    }

    fn request_focus(&self, _surface: SurfaceId) {}

    fn with_read_access(&self, f: &mut dyn FnMut()) {
        f();
    }

    fn post_key_event(&self, _surface: SurfaceId, _event: KeyEvent) {}
}

/// Builds a host adapter for the host versions it supports
pub trait HostAdapterFactory {
    fn name(&self) -> &str;

    fn supports(&self, host_version: &str) -> bool;

    fn create(&self) -> std::rc::Rc<dyn Host>;
}

/// First adapter whose factory supports `host_version`, else [`NullHost`]
pub fn select_adapter(
    host_version: &str,
    factories: &[Box<dyn HostAdapterFactory>],
) -> std::rc::Rc<dyn Host> {
    match factories.iter().find(|f| f.supports(host_version)) {
        Some(factory) => {
            tracing::debug!(factory = factory.name(), host_version, "selected host adapter");
            factory.create()
        }
        None => {
            tracing::info!(host_version, "no host adapter supports this version");
            std::rc::Rc::new(NullHost)
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
