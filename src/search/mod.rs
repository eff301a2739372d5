//! Search pattern handling for the overlay
//!
//! Normalizes typed search text, finds match offsets in a document and turns
//! them into the `current/total` indicator shown while searching.
//! Supports:
//! - `\c` / `\C` case overrides and ignorecase/smartcase resolution
//! - Regex patterns, with a literal fallback when the pattern does not compile
//! - Forward and backward current-match selection with wraparound

pub mod literal_search;

pub use literal_search::find_literal_offsets;

use regex::RegexBuilder;

use crate::error::Result;
use crate::mode::SearchDirection;

/// ## search/ Invariants
///
/// - Offsets are byte offsets, ascending and non-overlapping.
/// - A pattern that fails to compile is searched literally, never rejected.
/// - `current` is 1-based and always within `1..=total`.

/// Search text with its case directives resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPattern {
    /// Pattern with `\c` and `\C` removed
    pub pattern: String,
    /// `Some(true)` for `\c`, `Some(false)` for `\C`
    pub ignore_case_override: Option<bool>,
}

impl NormalizedPattern {
    #[must_use]
    pub fn has_uppercase(&self) -> bool {
        self.pattern.chars().any(char::is_uppercase)
    }

    /// Case sensitivity for this pattern under the engine's options
    #[must_use]
    pub fn ignore_case(&self, ignorecase: bool, smartcase: bool) -> bool {
        if let Some(forced) = self.ignore_case_override {
            return forced;
        }
        if !ignorecase {
            return false;
        }
        !(smartcase && self.has_uppercase())
    }
}

/// Strip the last search offset (`/foo/e`) and case directives from `raw`
#[must_use]
pub fn normalize_pattern(raw: &str, direction: SearchDirection) -> NormalizedPattern {
    let body = strip_search_offset(raw, direction);
    let mut pattern = String::with_capacity(body.len());
    let mut ignore_case_override = None;
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('c') => {
                    chars.next();
                    ignore_case_override = Some(true);
                    continue;
                }
                Some('C') => {
                    chars.next();
                    ignore_case_override = Some(false);
                    continue;
                }
                Some(&next) => {
                    chars.next();
                    pattern.push('\\');
                    pattern.push(next);
                    continue;
                }
                None => {}
            }
        }
        pattern.push(ch);
    }
    NormalizedPattern {
        pattern,
        ignore_case_override,
    }
}

/// Cut the text at the first unescaped search delimiter
fn strip_search_offset(raw: &str, direction: SearchDirection) -> &str {
    let delimiter = match direction {
        SearchDirection::Forward => '/',
        SearchDirection::Backward => '?',
    };
    let mut escaped = false;
    for (idx, ch) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
        } else if ch == delimiter {
            return &raw[..idx];
        }
    }
    raw
}

/// Start offsets of every match of `pattern` in `text`
///
/// `pattern` is compiled as a multi-line regex; when that fails the raw text is
/// searched literally instead.
#[must_use]
pub fn match_offsets(text: &str, pattern: &str, ignore_case: bool) -> Vec<usize> {
    if pattern.is_empty() {
        return Vec::new();
    }
    match compile(pattern, ignore_case) {
        Ok(re) => re.find_iter(text).map(|m| m.start()).collect(),
        Err(err) => {
            tracing::debug!(%pattern, error = %err, "pattern does not compile, searching literally");
            find_literal_offsets(text, pattern, ignore_case)
        }
    }
}

fn compile(pattern: &str, ignore_case: bool) -> Result<regex::Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .multi_line(true)
        .build()?)
}

/// Match the engine would land on from `base`, wrapping at either end
#[must_use]
pub fn nearest_match(offsets: &[usize], base: usize, direction: SearchDirection) -> Option<usize> {
    current_index(offsets, base, direction).map(|i| offsets[i])
}

fn current_index(offsets: &[usize], base: usize, direction: SearchDirection) -> Option<usize> {
    if offsets.is_empty() {
        return None;
    }
    let idx = match direction {
        SearchDirection::Forward => offsets
            .iter()
            .position(|&o| o >= base)
            .unwrap_or(0),
        SearchDirection::Backward => offsets
            .iter()
            .rposition(|&o| o <= base)
            .unwrap_or(offsets.len() - 1),
    };
    Some(idx)
}

/// Position of the current match among all matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStats {
    /// 1-based
    pub current: usize,
    pub total: usize,
}

const NO_RESULTS: &str = "0 results";

/// Indicator shown beside the search input; idle renders neutral, no
/// matches renders as an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIndicator {
    /// Input is empty
    Idle,
    NoMatches,
    Matches(MatchStats),
}

impl SearchIndicator {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            SearchIndicator::Idle | SearchIndicator::NoMatches => NO_RESULTS.to_string(),
            SearchIndicator::Matches(stats) => format!("{}/{}", stats.current, stats.total),
        }
    }
}

/// Compute the indicator for `raw` typed into a search prompt
pub fn search_indicator(
    text: &str,
    raw: &str,
    direction: SearchDirection,
    base_offset: usize,
    ignorecase: bool,
    smartcase: bool,
) -> SearchIndicator {
    if raw.is_empty() {
        return SearchIndicator::Idle;
    }
    let normalized = normalize_pattern(raw, direction);
    let ignore_case = normalized.ignore_case(ignorecase, smartcase);
    let offsets = match_offsets(text, &normalized.pattern, ignore_case);
    match current_index(&offsets, base_offset, direction) {
        Some(idx) => SearchIndicator::Matches(MatchStats {
            current: idx + 1,
            total: offsets.len(),
        }),
        None => SearchIndicator::NoMatches,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
