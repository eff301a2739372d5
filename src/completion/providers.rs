//! Completion sources
//!
//! Each provider owns a prepared candidate list and ranks it against a query
//! with the fuzzy matcher. Ordering is score descending, then shorter, then
//! lexical; the exact tie-break fields are per provider.

use std::cmp::Ordering;
use std::collections::HashSet;

use unicode_width::UnicodeWidthStr;

use crate::completion::{CompletionCandidate, CompletionCategory};
use crate::fuzzy;
use crate::host::{ActionInfo, OptionInfo};

/// A ranked source of completion candidates
pub trait CompletionProvider {
    fn category(&self) -> CompletionCategory;

    /// Up to `limit` candidates matching `query`, best first
    fn suggest(&self, query: &str, limit: usize) -> Vec<CompletionCandidate>;
}

/// Highlight positions of `query` within `display`
fn highlights(query: &str, display: &str) -> Vec<usize> {
    fuzzy::match_positions(query, display)
        .map(|m| m.positions)
        .unwrap_or_default()
}

/// Sort scored items best-first with `tie` breaking equal scores, then keep `limit`
fn rank<T>(mut scored: Vec<(i32, T)>, limit: usize, tie: impl Fn(&T, &T) -> Ordering) -> Vec<(i32, T)> {
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| tie(&a.1, &b.1)));
    scored.truncate(limit);
    scored
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExCommand {
    /// Declared form, e.g. `bd[elete]`
    display: String,
    /// Full name matched against, e.g. `bdelete`
    match_text: String,
    /// Shortest form inserted on accept, e.g. `bd`
    insertion: String,
}

/// Ex-command names
#[derive(Debug, Clone, Default)]
pub struct ExCommandProvider {
    commands: Vec<ExCommand>,
}

impl ExCommandProvider {
    /// Build from declared command names (`name[optional-suffix]`)
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut commands = Vec::new();
        for raw in names {
            let raw = raw.as_ref();
            let match_text: String = raw.chars().filter(|&c| c != '[' && c != ']').collect();
            if match_text.is_empty() || !seen.insert(match_text.to_lowercase()) {
                continue;
            }
            commands.push(ExCommand {
                display: raw.to_string(),
                insertion: required_part(raw),
                match_text,
            });
        }
        commands.sort_by(|a, b| {
            a.match_text
                .to_lowercase()
                .cmp(&b.match_text.to_lowercase())
                .then_with(|| a.insertion.to_lowercase().cmp(&b.insertion.to_lowercase()))
        });
        Self { commands }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// `bd[elete]` -> `bd`
fn required_part(raw: &str) -> String {
    let mut optional = false;
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '[' => optional = true,
            ']' => optional = false,
            c if !optional => out.push(c),
            _ => {}
        }
    }
    out
}

impl CompletionProvider for ExCommandProvider {
    fn category(&self) -> CompletionCategory {
        CompletionCategory::ExCommand
    }

    fn suggest(&self, query: &str, limit: usize) -> Vec<CompletionCandidate> {
        let query = query.trim_start();
        if query.is_empty() {
            return Vec::new();
        }
        let scored = self
            .commands
            .iter()
            .filter_map(|c| fuzzy::score(query, &c.match_text).map(|s| (s, c)))
            .collect();
        rank(scored, limit, |a, b| {
            a.match_text
                .len()
                .cmp(&b.match_text.len())
                .then_with(|| a.insertion.len().cmp(&b.insertion.len()))
                .then_with(|| a.insertion.cmp(&b.insertion))
        })
        .into_iter()
        .map(|(score, c)| CompletionCandidate {
            highlights: highlights(query, &c.display),
            display: c.display.clone(),
            detail: None,
            insertion: c.insertion.clone(),
            score,
            category: CompletionCategory::ExCommand,
        })
        .collect()
    }
}

#[derive(Debug, Clone)]
struct Action {
    id: String,
    label: Option<String>,
    /// `id label`
    match_text: String,
}

/// Registered editor actions, for `:action <id>`
#[derive(Debug, Clone, Default)]
pub struct ActionProvider {
    actions: Vec<Action>,
}

impl ActionProvider {
    #[must_use]
    pub fn new(actions: Vec<ActionInfo>) -> Self {
        let actions = actions
            .into_iter()
            .filter_map(|info| {
                let label = info.label.filter(|l| !l.trim().is_empty());
                let match_text = match &label {
                    Some(label) => format!("{} {label}", info.id),
                    None => info.id.clone(),
                };
                if match_text.trim().is_empty() {
                    return None;
                }
                Some(Action {
                    id: info.id,
                    label,
                    match_text,
                })
            })
            .collect();
        Self { actions }
    }
}

impl CompletionProvider for ActionProvider {
    fn category(&self) -> CompletionCategory {
        CompletionCategory::Action
    }

    fn suggest(&self, query: &str, limit: usize) -> Vec<CompletionCandidate> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let scored = self
            .actions
            .iter()
            .filter_map(|a| fuzzy::score(query, &a.match_text).map(|s| (s, a)))
            .collect();
        rank(scored, limit, |a, b| {
            let label_width = |x: &Action| x.label.as_deref().map_or(usize::MAX, UnicodeWidthStr::width);
            label_width(*a)
                .cmp(&label_width(*b))
                .then_with(|| a.id.len().cmp(&b.id.len()))
                .then_with(|| a.id.cmp(&b.id))
        })
        .into_iter()
        .map(|(score, a)| CompletionCandidate {
            highlights: highlights(query, &a.id),
            display: a.id.clone(),
            detail: a.label.clone(),
            insertion: a.id.clone(),
            score,
            category: CompletionCategory::Action,
        })
        .collect()
    }
}

#[derive(Debug, Clone)]
struct EngineOption {
    name: String,
    abbreviation: Option<String>,
    /// `name abbreviation`
    match_text: String,
}

/// Engine options, for `set <name>`
#[derive(Debug, Clone, Default)]
pub struct OptionProvider {
    options: Vec<EngineOption>,
}

impl OptionProvider {
    #[must_use]
    pub fn new(options: Vec<OptionInfo>) -> Self {
        let mut options: Vec<EngineOption> = options
            .into_iter()
            .map(|info| {
                let abbreviation = info.abbreviation.filter(|a| !a.trim().is_empty());
                let match_text = match &abbreviation {
                    Some(abbrev) => format!("{} {abbrev}", info.name),
                    None => info.name.clone(),
                };
                EngineOption {
                    name: info.name,
                    abbreviation,
                    match_text,
                }
            })
            .collect();
        options.sort_by_key(|o| o.name.to_lowercase());
        Self { options }
    }
}

impl CompletionProvider for OptionProvider {
    fn category(&self) -> CompletionCategory {
        CompletionCategory::Option
    }

    fn suggest(&self, query: &str, limit: usize) -> Vec<CompletionCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let scored = self
            .options
            .iter()
            .filter_map(|o| fuzzy::score(query, &o.match_text).map(|s| (s, o)))
            .collect();
        rank(scored, limit, |a, b| {
            a.name
                .len()
                .cmp(&b.name.len())
                .then_with(|| a.match_text.len().cmp(&b.match_text.len()))
                .then_with(|| a.name.cmp(&b.name))
        })
        .into_iter()
        .map(|(score, o)| CompletionCandidate {
            highlights: highlights(query, &o.name),
            display: o.name.clone(),
            detail: o.abbreviation.clone(),
            insertion: o.name.clone(),
            score,
            category: CompletionCategory::Option,
        })
        .collect()
    }
}

/// Word-like tokens from the active document
#[derive(Debug, Clone, Default)]
pub struct SearchWordProvider {
    words: Vec<String>,
}

impl SearchWordProvider {
    #[must_use]
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Collect up to `max_words` distinct words from `text`, first occurrence
    /// kept; case-insensitive duplicates are dropped
    #[must_use]
    pub fn extract(text: &str, max_words: usize) -> Self {
        let mut seen = HashSet::new();
        let mut words = Vec::new();
        for token in text.split(|c: char| !is_word_char(c)) {
            if words.len() >= max_words {
                break;
            }
            if token.is_empty() || !token.chars().any(char::is_alphanumeric) {
                continue;
            }
            if seen.insert(token.to_lowercase()) {
                words.push(token.to_string());
            }
        }
        Self { words }
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl CompletionProvider for SearchWordProvider {
    fn category(&self) -> CompletionCategory {
        CompletionCategory::SearchWord
    }

    fn suggest(&self, query: &str, limit: usize) -> Vec<CompletionCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let scored = self
            .words
            .iter()
            .filter_map(|w| fuzzy::match_positions(query, w).map(|m| (m.score, (w, m.positions))))
            .collect();
        rank(scored, limit, |(a, _), (b, _)| {
            a.width()
                .cmp(&b.width())
                .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
                .then_with(|| a.cmp(b))
        })
        .into_iter()
        .map(|(score, (word, positions))| CompletionCandidate {
            display: word.clone(),
            detail: None,
            insertion: word.clone(),
            score,
            highlights: positions,
            category: CompletionCategory::SearchWord,
        })
        .collect()
    }
}
