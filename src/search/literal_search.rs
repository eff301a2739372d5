/// Literal search
///
/// Used when a typed pattern is not a valid regex. Scans character
/// boundaries and compares case-folded characters, so byte offsets stay
/// correct for text whose case mapping changes length.
#[must_use]
pub fn find_literal_offsets(text: &str, pattern: &str, ignore_case: bool) -> Vec<usize> {
    if pattern.is_empty() {
        return Vec::new();
    }
    if !ignore_case {
        return text.match_indices(pattern).map(|(i, _)| i).collect();
    }

    let mut offsets = Vec::new();
    let mut resume = 0usize;
    for (start, _) in text.char_indices() {
        if start < resume {
            continue;
        }
        if let Some(len) = folded_prefix_len(&text[start..], pattern) {
            offsets.push(start);
            resume = start + len.max(1);
        }
    }
    offsets
}

/// Byte length of the prefix of `haystack` equal to `needle` ignoring case
fn folded_prefix_len(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    let mut consumed = 0usize;
    for n in needle.chars() {
        let (idx, h) = hay.next()?;
        if !h.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
        consumed = idx + h.len_utf8();
    }
    Some(consumed)
}
