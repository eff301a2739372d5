//! Input-line parsing for completion
//!
//! Decides which completion source applies to the current command-line text.
//! The checks run in a fixed order and the first one that recognizes the
//! input wins: action query, `set` option query, substitution pattern, and
//! finally ex-command matching over the whole line.

/// `:action <query>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionQuery {
    /// Text kept in front of the accepted action id
    pub prefix: String,
    pub query: String,
}

/// `set <query>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionQuery {
    pub prefix: String,
    pub query: String,
}

/// Pattern segment of an in-progress `:s/<pattern>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubstitutionQuery {
    /// Everything up to and including the opening delimiter
    pub prefix: String,
    pub query: String,
    pub suffix: String,
}

/// Completion source selected for an input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputContext {
    Action(ActionQuery),
    Option(OptionQuery),
    Substitution(SubstitutionQuery),
    /// Query for ex-command matching
    ExCommand(String),
}

/// Classify `content`, first match wins
#[must_use]
pub fn parse_input(content: &str) -> InputContext {
    if let Some(q) = parse_action_query(content) {
        return InputContext::Action(q);
    }
    if let Some(q) = parse_option_query(content) {
        return InputContext::Option(q);
    }
    if let Some(q) = parse_substitution_query(content) {
        return InputContext::Substitution(q);
    }
    InputContext::ExCommand(ex_command_query(content).to_string())
}

/// Line without leading whitespace and one leading `:`
#[must_use]
pub fn ex_command_query(content: &str) -> &str {
    let trimmed = content.trim_start();
    trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start()
}

#[must_use]
pub fn parse_action_query(content: &str) -> Option<ActionQuery> {
    let start = content.find(|c: char| !c.is_whitespace())?;
    let remainder = &content[start..];
    for keyword in [":action ", "action "] {
        let Some(head) = remainder.get(..keyword.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(keyword) {
            continue;
        }
        let query = remainder[keyword.len()..].trim_start();
        if query.is_empty() {
            return None;
        }
        return Some(ActionQuery {
            prefix: content[..start + keyword.len()].to_string(),
            query: query.to_string(),
        });
    }
    None
}

#[must_use]
pub fn parse_option_query(content: &str) -> Option<OptionQuery> {
    let mut index = content.find(|c: char| !c.is_whitespace())?;
    if content[index..].starts_with(':') {
        index += 1;
        index = skip_whitespace(content, index);
        if index >= content.len() {
            return None;
        }
    }
    let keyword = content.get(index..index + 3)?;
    if !keyword.eq_ignore_ascii_case("set") {
        return None;
    }
    let after_set = index + 3;
    let cursor = skip_whitespace(content, after_set);
    if cursor == after_set || cursor >= content.len() {
        return None;
    }
    Some(OptionQuery {
        prefix: content[..cursor].to_string(),
        query: content[cursor..].to_string(),
    })
}

/// Substitution whose pattern is still being typed (no closing delimiter)
#[must_use]
pub fn parse_substitution_query(content: &str) -> Option<SubstitutionQuery> {
    let mut index = skip_whitespace(content, 0);
    if content[index..].starts_with(':') {
        index += 1;
    }
    let pattern_start = substitution_pattern_start(content, index)?;
    let tail = &content[pattern_start..];
    if closing_delimiter(tail).is_some() {
        return None;
    }
    Some(SubstitutionQuery {
        prefix: content[..pattern_start].to_string(),
        query: tail.to_string(),
        suffix: String::new(),
    })
}

/// Pattern of a substitution command, whether or not it is closed yet
#[must_use]
pub fn substitution_pattern(command: &str) -> Option<&str> {
    let trimmed = command.trim_start();
    let trimmed = trimmed.strip_prefix(':').unwrap_or(trimmed);
    let pattern_start = substitution_pattern_start(trimmed, 0)?;
    let tail = &trimmed[pattern_start..];
    Some(match closing_delimiter(tail) {
        Some(end) => &tail[..end],
        None => tail,
    })
}

/// Byte offset just past the `/` of `[range]s[ubstitute] /`
fn substitution_pattern_start(content: &str, from: usize) -> Option<usize> {
    let index = skip_whitespace(content, skip_range(content, from));
    let remaining = content.get(index..)?;
    let command_len = if starts_with_ignore_case(remaining, "substitute") {
        "substitute".len()
    } else if starts_with_ignore_case(remaining, "s") {
        1
    } else {
        return None;
    };
    let delimiter = skip_whitespace(content, index + command_len);
    if content[delimiter..].starts_with('/') {
        Some(delimiter + 1)
    } else {
        None
    }
}

/// Skip a line range: numbers, `%`, `$`, `.`, separators, offsets and `'x` marks
fn skip_range(content: &str, from: usize) -> usize {
    let mut chars = content[from..].char_indices().peekable();
    let mut end = from;
    while let Some((offset, ch)) = chars.next() {
        let at = from + offset;
        match ch {
            '\'' => match chars.next() {
                Some((mark_offset, mark)) => end = from + mark_offset + mark.len_utf8(),
                None => return at,
            },
            c if c.is_whitespace() || c.is_ascii_digit() => end = at + c.len_utf8(),
            '%' | '$' | '.' | ',' | ';' | '-' | '+' => end = at + 1,
            _ => return at,
        }
    }
    end
}

/// Offset of the first unescaped `/` in `tail`
fn closing_delimiter(tail: &str) -> Option<usize> {
    let mut escaping = false;
    for (idx, ch) in tail.char_indices() {
        if escaping {
            escaping = false;
        } else if ch == '\\' {
            escaping = true;
        } else if ch == '/' {
            return Some(idx);
        }
    }
    None
}

fn skip_whitespace(content: &str, from: usize) -> usize {
    content[from..]
        .find(|c: char| !c.is_whitespace())
        .map_or(content.len(), |offset| from + offset)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
