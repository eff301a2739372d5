//! Completion for the overlay input
//!
//! Four sources feed the list under the input: ex commands, editor actions,
//! engine options and words from the document. Only one is active at a time,
//! chosen from the input line by [`parser::parse_input`]. The engine keeps the
//! visible list and its selection and rewrites the input on accept.

pub mod parser;
pub mod providers;

pub use parser::{ActionQuery, InputContext, OptionQuery, SubstitutionQuery};
pub use providers::{
    ActionProvider, CompletionProvider, ExCommandProvider, OptionProvider, SearchWordProvider,
};

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use crate::config::OverlaySettings;
use crate::error::manager::FailureLog;
use crate::host::Host;
use crate::mode::OverlayMode;

/// ## completion/ Invariants
///
/// - At most one provider contributes to the list at a time.
/// - A selection, when present, indexes into the current list.
/// - Catalog providers are loaded on first use and reused for the service lifetime.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionCategory {
    ExCommand,
    Action,
    Option,
    SearchWord,
}

/// One ranked suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub display: String,
    /// Secondary text: action label or option abbreviation
    pub detail: Option<String>,
    pub insertion: String,
    pub score: i32,
    /// Character indices of `display` to highlight
    pub highlights: Vec<usize>,
    pub category: CompletionCategory,
}

/// A candidate together with what accepting it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEntry {
    ExCommand(CompletionCandidate),
    Action {
        candidate: CompletionCandidate,
        prefix: String,
    },
    Option {
        candidate: CompletionCandidate,
        prefix: String,
    },
    SearchWord {
        candidate: CompletionCandidate,
        context: SubstitutionQuery,
    },
}

impl CompletionEntry {
    #[must_use]
    pub fn candidate(&self) -> &CompletionCandidate {
        match self {
            CompletionEntry::ExCommand(candidate)
            | CompletionEntry::Action { candidate, .. }
            | CompletionEntry::Option { candidate, .. }
            | CompletionEntry::SearchWord { candidate, .. } => candidate,
        }
    }

    /// Input text after accepting this entry
    #[must_use]
    pub fn accepted_text(&self) -> String {
        match self {
            CompletionEntry::ExCommand(candidate) => candidate.insertion.clone(),
            CompletionEntry::Action { candidate, prefix }
            | CompletionEntry::Option { candidate, prefix } => {
                format!("{prefix}{}", candidate.insertion)
            }
            CompletionEntry::SearchWord { candidate, context } => {
                format!("{}{}{}", context.prefix, candidate.insertion, context.suffix)
            }
        }
    }

    /// Row text for the completion list
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            CompletionEntry::ExCommand(candidate) | CompletionEntry::SearchWord { candidate, .. } => {
                candidate.display.clone()
            }
            CompletionEntry::Action { candidate, .. } => match &candidate.detail {
                Some(label) => format!("{}  {label}", candidate.display),
                None => candidate.display.clone(),
            },
            CompletionEntry::Option { candidate, .. } => match &candidate.detail {
                Some(abbrev) => format!("{} ({abbrev})", candidate.display),
                None => candidate.display.clone(),
            },
        }
    }
}

/// Host-backed providers, loaded lazily and shared by every session
pub struct CompletionCatalog {
    host: Rc<dyn Host>,
    failures: RefCell<FailureLog>,
    ex_commands: OnceCell<ExCommandProvider>,
    actions: OnceCell<ActionProvider>,
    options: OnceCell<OptionProvider>,
}

impl CompletionCatalog {
    #[must_use]
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            failures: RefCell::new(FailureLog::new()),
            ex_commands: OnceCell::new(),
            actions: OnceCell::new(),
            options: OnceCell::new(),
        }
    }

    pub fn ex_commands(&self) -> &ExCommandProvider {
        self.ex_commands.get_or_init(|| match self.host.ex_commands() {
            Ok(names) => ExCommandProvider::new(names),
            Err(err) => {
                self.failures.borrow_mut().report("catalog:ex_commands", &err);
                ExCommandProvider::default()
            }
        })
    }

    pub fn actions(&self) -> &ActionProvider {
        self.actions.get_or_init(|| match self.host.actions() {
            Ok(actions) => ActionProvider::new(actions),
            Err(err) => {
                self.failures.borrow_mut().report("catalog:actions", &err);
                ActionProvider::default()
            }
        })
    }

    pub fn options(&self) -> &OptionProvider {
        self.options.get_or_init(|| match self.host.options() {
            Ok(options) => OptionProvider::new(options),
            Err(err) => {
                self.failures.borrow_mut().report("catalog:options", &err);
                OptionProvider::default()
            }
        })
    }
}

/// Completion list and selection for one session
pub struct CompletionEngine {
    catalog: Rc<CompletionCatalog>,
    words: SearchWordProvider,
    mode: OverlayMode,
    max_visible_rows: usize,
    max_search_completions: usize,
    highlight: bool,
    entries: Vec<CompletionEntry>,
    selected: Option<usize>,
}

impl CompletionEngine {
    #[must_use]
    pub fn new(
        catalog: Rc<CompletionCatalog>,
        words: SearchWordProvider,
        mode: OverlayMode,
        settings: &OverlaySettings,
    ) -> Self {
        Self {
            catalog,
            words,
            mode,
            max_visible_rows: settings.max_visible_rows,
            max_search_completions: settings.max_search_completions,
            highlight: settings.highlight_completions,
            entries: Vec::new(),
            selected: None,
        }
    }

    /// Recompute the list for user-typed `content`; clears the selection
    pub fn update(&mut self, content: &str) {
        self.selected = None;
        let entries = match self.mode {
            OverlayMode::SearchForward | OverlayMode::SearchBackward => {
                let context = SubstitutionQuery::default();
                self.words
                    .suggest(content, self.max_search_completions)
                    .into_iter()
                    .map(|candidate| CompletionEntry::SearchWord {
                        candidate,
                        context: context.clone(),
                    })
                    .collect()
            }
            OverlayMode::Command => self.command_entries(content),
            OverlayMode::Expression => Vec::new(),
        };
        self.entries = entries;
        if !self.highlight {
            for entry in &mut self.entries {
                entry_candidate_mut(entry).highlights.clear();
            }
        }
    }

    fn command_entries(&self, content: &str) -> Vec<CompletionEntry> {
        match parser::parse_input(content) {
            InputContext::Action(q) => self
                .catalog
                .actions()
                .suggest(&q.query, self.max_visible_rows)
                .into_iter()
                .map(|candidate| CompletionEntry::Action {
                    candidate,
                    prefix: q.prefix.clone(),
                })
                .collect(),
            InputContext::Option(q) => self
                .catalog
                .options()
                .suggest(&q.query, self.max_visible_rows)
                .into_iter()
                .map(|candidate| CompletionEntry::Option {
                    candidate,
                    prefix: q.prefix.clone(),
                })
                .collect(),
            InputContext::Substitution(q) => self
                .words
                .suggest(&q.query, self.max_search_completions)
                .into_iter()
                .map(|candidate| CompletionEntry::SearchWord {
                    candidate,
                    context: q.clone(),
                })
                .collect(),
            InputContext::ExCommand(query) => self
                .catalog
                .ex_commands()
                .suggest(&query, self.max_visible_rows)
                .into_iter()
                .map(CompletionEntry::ExCommand)
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CompletionEntry] {
        &self.entries
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&CompletionEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Whether a list is showing
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of rows the list occupies
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        self.entries.len().min(self.max_visible_rows)
    }

    /// Move the selection. Stepping past either end clears it.
    /// Returns `false` when no list is showing.
    pub fn move_selection(&mut self, previous: bool) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let last = self.entries.len() - 1;
        self.selected = match (self.selected, previous) {
            (None, true) => Some(last),
            (None, false) => Some(0),
            (Some(0), true) => None,
            (Some(i), true) => Some(i - 1),
            (Some(i), false) if i >= last => None,
            (Some(i), false) => Some(i + 1),
        };
        true
    }

    /// Text the input becomes when accepting the selection; disposes the list
    pub fn accept_selection(&mut self) -> Option<String> {
        let text = self.selected_entry()?.accepted_text();
        self.dispose();
        Some(text)
    }

    pub fn dispose(&mut self) {
        self.entries.clear();
        self.selected = None;
    }
}

fn entry_candidate_mut(entry: &mut CompletionEntry) -> &mut CompletionCandidate {
    match entry {
        CompletionEntry::ExCommand(candidate)
        | CompletionEntry::Action { candidate, .. }
        | CompletionEntry::Option { candidate, .. }
        | CompletionEntry::SearchWord { candidate, .. } => candidate,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
