//! Overlay session
//!
//! One open overlay: the input line, its completion list, history browsing,
//! the search indicator and the preview channels it drives. The session owns
//! no engine state of its own; it reports what the user did and the manager
//! decides what to do with it.

use std::rc::Rc;

use crate::completion::{parser, CompletionEngine};
use crate::config::NavigationBindings;
use crate::host::{read_scoped, Host, SurfaceId, WindowId};
use crate::key::{KeyEvent, KeyEventKind, VirtualKey};
use crate::mode::OverlayMode;
use crate::preview::PreviewChannel;
use crate::search::{search_indicator, SearchIndicator};

/// ## session/ Invariants
///
/// - Each preview channel is rolled back or committed at most once per
///   previewing stretch; closing a session that already did either is a no-op.
/// - `history_index` is `None` unless the user is browsing history; any user
///   edit clears it.
/// - Programmatic input changes (history values, accepted completions) never
///   recompute the completion list.

/// Input shown when a command overlay opens over a visual selection
pub const VISUAL_RANGE: &str = "'<,'>";

/// What a key did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not an overlay key; let it through
    Ignored,
    /// Consumed by the overlay
    Handled,
    /// Enter: the manager should submit
    Submit,
    /// Escape: the manager should cancel
    Cancel,
}

/// Everything a session is created with
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub mode: OverlayMode,
    pub surface: SurfaceId,
    pub window: WindowId,
    /// Caret offset when the trigger fired
    pub initial_offset: usize,
    /// History snapshot, newest first
    pub history: Vec<String>,
    pub navigation: NavigationBindings,
    /// Start a command overlay with [`VISUAL_RANGE`]
    pub visual_range: bool,
}

/// Live preview channels wired for the session's mode
#[derive(Default)]
pub struct SessionPreviews {
    /// Incremental search preview (search modes)
    pub search: Option<PreviewChannel>,
    /// Substitution pattern preview (command mode)
    pub pattern: Option<PreviewChannel>,
}

pub struct OverlaySession {
    host: Rc<dyn Host>,
    mode: OverlayMode,
    surface: SurfaceId,
    window: WindowId,
    initial_offset: usize,
    input: String,
    history: Vec<String>,
    history_index: Option<usize>,
    draft: String,
    completion: CompletionEngine,
    navigation: NavigationBindings,
    previews: SessionPreviews,
    search_cancelled: bool,
    search_committed: bool,
    pattern_active: bool,
    indicator: SearchIndicator,
    closed: bool,
}

impl OverlaySession {
    #[must_use]
    pub fn new(
        host: Rc<dyn Host>,
        seed: SessionSeed,
        completion: CompletionEngine,
        previews: SessionPreviews,
    ) -> Self {
        let mut session = Self {
            host,
            mode: seed.mode,
            surface: seed.surface,
            window: seed.window,
            initial_offset: seed.initial_offset,
            input: String::new(),
            history: seed.history,
            history_index: None,
            draft: String::new(),
            completion,
            navigation: seed.navigation,
            previews,
            search_cancelled: false,
            search_committed: false,
            pattern_active: false,
            indicator: SearchIndicator::Idle,
            closed: false,
        };
        if seed.visual_range && seed.mode == OverlayMode::Command {
            session.set_text_programmatically(VISUAL_RANGE);
        }
        session
    }

    #[must_use]
    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[must_use]
    pub fn window(&self) -> WindowId {
        self.window
    }

    #[must_use]
    pub fn initial_offset(&self) -> usize {
        self.initial_offset
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn header(&self) -> &'static str {
        self.mode.header()
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionEngine {
        &self.completion
    }

    #[must_use]
    pub fn indicator(&self) -> &SearchIndicator {
        &self.indicator
    }

    #[must_use]
    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Replace the input with text the user typed
    pub fn set_input(&mut self, text: &str) {
        if self.closed {
            return;
        }
        self.history_index = None;
        self.input.clear();
        self.input.push_str(text);
        self.completion.update(text);
        self.refresh_indicator();
        self.trigger_search_preview();
        self.update_pattern_preview();
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut text = self.input.clone();
        text.push(ch);
        self.set_input(&text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.input.clone();
        if text.pop().is_some() {
            self.set_input(&text);
        }
    }

    /// Older history entry. Returns `false` at the oldest entry.
    pub fn history_previous(&mut self) -> bool {
        let next = match self.history_index {
            None if self.history.is_empty() => return false,
            None => {
                self.draft = self.input.clone();
                0
            }
            Some(i) if i + 1 >= self.history.len() => return false,
            Some(i) => i + 1,
        };
        self.history_index = Some(next);
        let value = self.history[next].clone();
        self.apply_history_value(&value);
        true
    }

    /// Newer history entry; past the newest the draft comes back
    pub fn history_next(&mut self) -> bool {
        match self.history_index {
            None => false,
            Some(0) => {
                self.history_index = None;
                let draft = std::mem::take(&mut self.draft);
                self.apply_history_value(&draft);
                true
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                let value = self.history[i - 1].clone();
                self.apply_history_value(&value);
                true
            }
        }
    }

    /// Classify and apply one key event from the overlay input
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if self.closed {
            return KeyOutcome::Ignored;
        }
        match event.kind {
            KeyEventKind::Released => KeyOutcome::Ignored,
            KeyEventKind::Typed => match event.ch {
                Some(ch) if !ch.is_control() && !event.ctrl() && !event.alt() => {
                    self.insert_char(ch);
                    KeyOutcome::Handled
                }
                _ => KeyOutcome::Ignored,
            },
            KeyEventKind::Pressed => self.handle_press(event),
        }
    }

    fn handle_press(&mut self, event: &KeyEvent) -> KeyOutcome {
        match event.key {
            VirtualKey::Escape => return KeyOutcome::Cancel,
            VirtualKey::Enter => return KeyOutcome::Submit,
            VirtualKey::Backspace => {
                self.backspace();
                return KeyOutcome::Handled;
            }
            _ => {}
        }
        if self.navigation.previous.iter().any(|s| s.matches(event)) {
            self.navigate(true);
            return KeyOutcome::Handled;
        }
        if self.navigation.next.iter().any(|s| s.matches(event)) {
            self.navigate(false);
            return KeyOutcome::Handled;
        }
        if event.key == VirtualKey::Tab {
            self.completion.move_selection(event.shift());
            return KeyOutcome::Handled;
        }
        KeyOutcome::Ignored
    }

    /// Completion list first, history when no list is showing
    fn navigate(&mut self, previous: bool) {
        if self.completion.move_selection(previous) {
            return;
        }
        if previous {
            self.history_previous();
        } else {
            self.history_next();
        }
    }

    /// Close as committed; returns the text to replay
    pub fn submit(&mut self) -> String {
        if let Some(text) = self.completion.accept_selection() {
            self.set_text_programmatically(&text);
        }
        if let Some(channel) = &self.previews.search {
            if !self.search_cancelled {
                channel.commit();
            }
            self.search_committed = true;
        }
        // The substitution runs on the line the user started from
        self.cancel_pattern_preview();
        self.completion.dispose();
        self.closed = true;
        tracing::debug!(mode = ?self.mode, "overlay submitted");
        self.input.clone()
    }

    /// Close without committing: every preview is rolled back
    pub fn cancel(&mut self) {
        if self.closed {
            return;
        }
        self.completion.dispose();
        if !self.search_committed {
            self.cancel_search_preview();
        }
        self.cancel_pattern_preview();
        self.closed = true;
        tracing::debug!(mode = ?self.mode, "overlay cancelled");
    }

    fn set_text_programmatically(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
        self.trigger_search_preview();
        self.update_pattern_preview();
        self.refresh_indicator();
    }

    fn apply_history_value(&mut self, value: &str) {
        self.set_text_programmatically(value);
        self.completion.dispose();
        self.cancel_pattern_preview();
    }

    fn trigger_search_preview(&mut self) {
        let Some(channel) = &self.previews.search else {
            return;
        };
        self.search_committed = false;
        if self.input.is_empty() {
            self.search_cancelled = true;
            channel.cancel();
        } else {
            self.search_cancelled = false;
            channel.show(&self.input);
        }
    }

    fn cancel_search_preview(&mut self) {
        let Some(channel) = &self.previews.search else {
            return;
        };
        if self.search_cancelled {
            return;
        }
        self.search_cancelled = true;
        channel.cancel();
    }

    fn update_pattern_preview(&mut self) {
        let Some(channel) = &self.previews.pattern else {
            return;
        };
        match parser::substitution_pattern(&self.input) {
            Some(pattern) if !pattern.is_empty() => {
                self.pattern_active = true;
                channel.show(pattern);
            }
            _ => self.cancel_pattern_preview(),
        }
    }

    fn cancel_pattern_preview(&mut self) {
        if !self.pattern_active {
            return;
        }
        self.pattern_active = false;
        if let Some(channel) = &self.previews.pattern {
            channel.cancel();
        }
    }

    fn refresh_indicator(&mut self) {
        if !self.mode.is_search() {
            return;
        }
        let host = &*self.host;
        let text = read_scoped(host, || host.document_text(self.surface));
        let ignorecase = host.option_flag("ignorecase").unwrap_or(false);
        let smartcase = host.option_flag("smartcase").unwrap_or(false);
        self.indicator = search_indicator(
            &text,
            &self.input,
            self.mode.direction(),
            self.initial_offset,
            ignorecase,
            smartcase,
        );
    }
}

impl Drop for OverlaySession {
    fn drop(&mut self) {
        self.cancel();
    }
}
