//! Fuzzy subsequence matching
//!
//! Scores a query against a candidate by greedily locating each query
//! character, in order, case-insensitively. Contiguous runs, matches at the
//! start of the candidate and short candidates score higher.

/// ## fuzzy/ Invariants
///
/// - A score exists iff the query is a case-insensitive subsequence of the candidate.
/// - Matching is greedy: each character takes the first occurrence after the previous match.
/// - Scoring is deterministic; ordering ties are broken by the caller.

/// Score `query` against `candidate`, or `None` if it does not match
#[must_use]
pub fn score(query: &str, candidate: &str) -> Option<i32> {
    match_positions(query, candidate).map(|m| m.score)
}

/// Result of a successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub score: i32,
    /// Character indices of the matched characters in the candidate
    pub positions: Vec<usize>,
}

/// Score `query` against `candidate` and report the matched character indices
#[must_use]
pub fn match_positions(query: &str, candidate: &str) -> Option<FuzzyMatch> {
    if query.is_empty() || candidate.is_empty() {
        return None;
    }
    let haystack: Vec<char> = candidate.chars().map(fold_case).collect();
    let needle: Vec<char> = query.chars().map(fold_case).collect();

    let mut search_index = 0usize;
    let mut last_match: Option<usize> = None;
    let mut score = 0i32;
    let mut positions = Vec::with_capacity(needle.len());

    for &ch in &needle {
        let found = search_index
            + haystack
                .get(search_index..)?
                .iter()
                .position(|&c| c == ch)?;

        score += if found == search_index {
            4
        } else if found == search_index + 1 {
            3
        } else {
            1
        };
        if found == 0 {
            score += 5;
        }
        if let Some(last) = last_match {
            if found == last + 1 {
                score += 2;
            } else {
                let gap = (found - last) as i32;
                score -= (gap - 1).min(3);
            }
        }
        positions.push(found);
        last_match = Some(found);
        search_index = found + 1;
    }

    let excess = candidate.chars().count() as i32 - query.chars().count() as i32;
    score -= excess.max(0);
    Some(FuzzyMatch { score, positions })
}

/// Lowercase to a single char so indices stay aligned with the candidate
fn fold_case(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}
