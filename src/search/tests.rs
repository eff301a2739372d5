use super::*;

#[test]
fn test_normalize_strips_case_directives() {
    let p = normalize_pattern("foo\\c", SearchDirection::Forward);
    assert_eq!(p.pattern, "foo");
    assert_eq!(p.ignore_case_override, Some(true));

    let p = normalize_pattern("\\CFoo", SearchDirection::Forward);
    assert_eq!(p.pattern, "Foo");
    assert_eq!(p.ignore_case_override, Some(false));
}

#[test]
fn test_normalize_keeps_other_escapes() {
    let p = normalize_pattern("a\\.b", SearchDirection::Forward);
    assert_eq!(p.pattern, "a\\.b");
    assert_eq!(p.ignore_case_override, None);
}

#[test]
fn test_normalize_cuts_search_offset() {
    assert_eq!(normalize_pattern("foo/e", SearchDirection::Forward).pattern, "foo");
    assert_eq!(normalize_pattern("a\\/b", SearchDirection::Forward).pattern, "a\\/b");
    assert_eq!(normalize_pattern("foo?b", SearchDirection::Backward).pattern, "foo");
    assert_eq!(normalize_pattern("foo?b", SearchDirection::Forward).pattern, "foo?b");
}

#[test]
fn test_ignore_case_resolution() {
    let lower = normalize_pattern("foo", SearchDirection::Forward);
    let upper = normalize_pattern("Foo", SearchDirection::Forward);
    assert!(!lower.ignore_case(false, false));
    assert!(lower.ignore_case(true, false));
    assert!(lower.ignore_case(true, true));
    assert!(upper.ignore_case(true, false));
    assert!(!upper.ignore_case(true, true));

    let forced = normalize_pattern("Foo\\c", SearchDirection::Forward);
    assert!(forced.ignore_case(false, true));
}

#[test]
fn test_match_offsets_regex() {
    assert_eq!(match_offsets("foo bar foo", "foo", false), vec![0, 8]);
    assert_eq!(match_offsets("a1 b22 c333", "[0-9]+", false), vec![1, 4, 8]);
    assert_eq!(match_offsets("Foo foo", "foo", true), vec![0, 4]);
    assert!(match_offsets("abc", "", false).is_empty());
}

#[test]
fn test_match_offsets_multiline_anchors() {
    assert_eq!(match_offsets("foo\nfoo\n", "^foo", false), vec![0, 4]);
}

#[test]
fn test_invalid_regex_falls_back_to_literal() {
    assert_eq!(match_offsets("call f(x) and f(", "f(", false), vec![5, 14]);
}

#[test]
fn test_literal_ignore_case_offsets_are_bytes() {
    assert_eq!(find_literal_offsets("é FOO foo", "foo", true), vec![3, 7]);
    assert_eq!(find_literal_offsets("aaaa", "aa", false), vec![0, 2]);
    assert_eq!(find_literal_offsets("AAAA", "aa", true), vec![0, 2]);
}

#[test]
fn test_nearest_match_wraps() {
    let offsets = [0, 8];
    assert_eq!(nearest_match(&offsets, 0, SearchDirection::Forward), Some(0));
    assert_eq!(nearest_match(&offsets, 1, SearchDirection::Forward), Some(8));
    assert_eq!(nearest_match(&offsets, 9, SearchDirection::Forward), Some(0));
    assert_eq!(nearest_match(&offsets, 9, SearchDirection::Backward), Some(8));
    assert_eq!(nearest_match(&[4], 2, SearchDirection::Backward), Some(4));
    assert_eq!(nearest_match(&[], 2, SearchDirection::Backward), None);
}

#[test]
fn test_indicator_labels() {
    let text = "foo bar foo";
    let ind = search_indicator(text, "foo", SearchDirection::Forward, 0, false, false);
    assert_eq!(ind.label(), "1/2");

    let ind = search_indicator(text, "foo", SearchDirection::Forward, 1, false, false);
    assert_eq!(ind.label(), "2/2");

    let ind = search_indicator(text, "foo", SearchDirection::Backward, 5, false, false);
    assert_eq!(ind.label(), "1/2");

    let ind = search_indicator(text, "zzz", SearchDirection::Forward, 0, false, false);
    assert_eq!(ind, SearchIndicator::NoMatches);
    assert_eq!(ind.label(), "0 results");

    let ind = search_indicator(text, "", SearchDirection::Forward, 0, false, false);
    assert_eq!(ind, SearchIndicator::Idle);
    assert_eq!(ind.label(), "0 results");
}

#[test]
fn test_indicator_respects_smartcase() {
    let text = "Foo foo";
    let ind = search_indicator(text, "foo", SearchDirection::Forward, 0, true, true);
    assert_eq!(ind, SearchIndicator::Matches(MatchStats { current: 1, total: 2 }));
    let ind = search_indicator(text, "Foo", SearchDirection::Forward, 0, true, true);
    assert_eq!(ind, SearchIndicator::Matches(MatchStats { current: 1, total: 1 }));
}
