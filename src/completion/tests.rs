use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::parser::*;
use super::*;
use crate::host::{ActionInfo, InMemoryHost, OptionInfo};

fn catalog_host() -> Rc<InMemoryHost> {
    let host = Rc::new(InMemoryHost::new());
    host.set_ex_commands(["bd[elete]", "b[uffer]", "s[ubstitute]", "se[t]", "setl[ocal]", "w[rite]", "wq"]);
    host.set_actions(vec![
        ActionInfo {
            id: "GotoFile".into(),
            label: Some("Go to File".into()),
        },
        ActionInfo {
            id: "GotoClass".into(),
            label: Some("Go to Class".into()),
        },
        ActionInfo {
            id: "ReformatCode".into(),
            label: None,
        },
    ]);
    host.set_options(vec![
        OptionInfo {
            name: "number".into(),
            abbreviation: Some("nu".into()),
        },
        OptionInfo {
            name: "relativenumber".into(),
            abbreviation: Some("rnu".into()),
        },
        OptionInfo {
            name: "ignorecase".into(),
            abbreviation: Some("ic".into()),
        },
    ]);
    host
}

fn engine(host: &Rc<InMemoryHost>, mode: OverlayMode, words: &[&str]) -> CompletionEngine {
    let catalog = Rc::new(CompletionCatalog::new(host.clone()));
    let words = SearchWordProvider::new(words.iter().map(|w| w.to_string()).collect());
    CompletionEngine::new(catalog, words, mode, &OverlaySettings::default())
}

fn displays(engine: &CompletionEngine) -> Vec<String> {
    engine
        .entries()
        .iter()
        .map(|e| e.candidate().display.clone())
        .collect()
}

// --- parser ---

#[test]
fn test_parse_order_is_first_match_wins() {
    assert!(matches!(parse_input("action Goto"), InputContext::Action(_)));
    assert!(matches!(parse_input("set nu"), InputContext::Option(_)));
    assert!(matches!(parse_input("%s/foo"), InputContext::Substitution(_)));
    assert_eq!(parse_input("se"), InputContext::ExCommand("se".into()));
    assert_eq!(parse_input("  :wq"), InputContext::ExCommand("wq".into()));
}

#[test]
fn test_action_query() {
    assert_eq!(
        parse_action_query("  :ACTION  Goto"),
        Some(ActionQuery {
            prefix: "  :ACTION ".into(),
            query: "Goto".into(),
        })
    );
    assert_eq!(parse_action_query("action "), None);
    assert_eq!(parse_action_query("actions x"), None);
}

#[test]
fn test_option_query() {
    assert_eq!(
        parse_option_query("set nu"),
        Some(OptionQuery {
            prefix: "set ".into(),
            query: "nu".into(),
        })
    );
    assert_eq!(
        parse_option_query(": SET  ic"),
        Some(OptionQuery {
            prefix: ": SET  ".into(),
            query: "ic".into(),
        })
    );
    assert_eq!(parse_option_query("set"), None);
    assert_eq!(parse_option_query("set "), None);
    assert_eq!(parse_option_query("setlocal nu"), None);
    assert_eq!(parse_option_query(":"), None);
}

#[test]
fn test_substitution_query() {
    assert_eq!(
        parse_substitution_query(":%s/hel"),
        Some(SubstitutionQuery {
            prefix: ":%s/".into(),
            query: "hel".into(),
            suffix: String::new(),
        })
    );
    let q = parse_substitution_query("'<,'>substitute /a\\/b").unwrap();
    assert_eq!(q.prefix, "'<,'>substitute /");
    assert_eq!(q.query, "a\\/b");
    assert_eq!(parse_substitution_query("1,$s/done/"), None);
    assert_eq!(parse_substitution_query("sort"), None);
    assert_eq!(parse_substitution_query("s#a"), None);
}

#[test]
fn test_substitution_pattern_extraction() {
    assert_eq!(substitution_pattern(":%s/hello/"), Some("hello"));
    assert_eq!(substitution_pattern("%s/hello/world/g"), Some("hello"));
    assert_eq!(substitution_pattern("s/hel"), Some("hel"));
    assert_eq!(substitution_pattern("s/"), Some(""));
    assert_eq!(substitution_pattern("set nu"), None);
    assert_eq!(substitution_pattern(""), None);
}

// --- providers ---

#[test]
fn test_ex_command_normalization() {
    let provider = ExCommandProvider::new(["bd[elete]", "bdelete", "w[rite]"]);
    assert_eq!(provider.len(), 2);
    let hits = provider.suggest("bdel", 8);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display, "bd[elete]");
    assert_eq!(hits[0].insertion, "bd");
}

#[test]
fn test_ex_command_ranking_ties_by_length() {
    let provider = ExCommandProvider::new(["se[t]", "setl[ocal]", "setg[lobal]"]);
    let hits = provider.suggest("set", 8);
    let names: Vec<_> = hits.iter().map(|c| c.insertion.as_str()).collect();
    assert_eq!(names, vec!["se", "setl", "setg"]);
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn test_suggest_respects_limit_and_empty_query() {
    let provider = ExCommandProvider::new(["aa", "ab", "ac", "ad"]);
    assert_eq!(provider.suggest("a", 2).len(), 2);
    assert!(provider.suggest("   ", 8).is_empty());
}

#[test]
fn test_action_ranking_prefers_short_labels() {
    // equal match text length, so equal scores
    let provider = ActionProvider::new(vec![
        ActionInfo {
            id: "AlphaXBeta".into(),
            label: None,
        },
        ActionInfo {
            id: "Alpha".into(),
            label: Some("Beta".into()),
        },
    ]);
    let hits = provider.suggest("alpha", 8);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].score, hits[1].score);
    assert_eq!(hits[0].display, "Alpha");
    assert_eq!(hits[0].detail.as_deref(), Some("Beta"));
}

#[test]
fn test_option_matches_abbreviation() {
    let provider = OptionProvider::new(vec![OptionInfo {
        name: "ignorecase".into(),
        abbreviation: Some("ic".into()),
    }]);
    assert_eq!(provider.suggest("ic", 8).len(), 1);
    assert_eq!(provider.suggest(" ic ", 8)[0].insertion, "ignorecase");
}

#[test]
fn test_word_extraction() {
    let provider = SearchWordProvider::extract("foo-bar, Foo baz_1 -- __ foo\nqux", 100);
    assert_eq!(provider.words(), ["foo-bar", "Foo", "baz_1", "qux"]);

    let capped = SearchWordProvider::extract("a b c d e", 3);
    assert_eq!(capped.words(), ["a", "b", "c"]);
}

// --- engine ---

#[test]
fn test_ex_command_then_option_switch() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Command, &[]);

    engine.update("se");
    assert!(engine.is_active());
    assert!(engine
        .entries()
        .iter()
        .all(|e| matches!(e, CompletionEntry::ExCommand(_))));

    engine.update("set nu");
    assert!(matches!(engine.entries()[0], CompletionEntry::Option { .. }));
    assert_eq!(displays(&engine)[0], "number");
}

#[test]
fn test_substitution_completes_document_words() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Command, &["hello", "help", "world"]);
    engine.update("%s/hel");
    assert_eq!(displays(&engine), vec!["help", "hello"]);
    assert!(engine.move_selection(false));
    assert_eq!(engine.accept_selection().as_deref(), Some("%s/help"));
    assert!(!engine.is_active());
}

#[test]
fn test_accept_action_and_option() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Command, &[]);
    engine.update("action gotocl");
    engine.move_selection(false);
    assert_eq!(engine.accept_selection().as_deref(), Some("action GotoClass"));

    engine.update("set relat");
    engine.move_selection(false);
    assert_eq!(engine.accept_selection().as_deref(), Some("set relativenumber"));
}

#[test]
fn test_accept_ex_command_inserts_short_form() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Command, &[]);
    engine.update(":bdel");
    engine.move_selection(false);
    assert_eq!(engine.accept_selection().as_deref(), Some("bd"));
}

#[test]
fn test_accept_without_selection() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Command, &[]);
    engine.update("wr");
    assert!(engine.is_active());
    assert_eq!(engine.accept_selection(), None);
    assert!(engine.is_active());
}

#[test]
fn test_selection_cycles_through_none() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::SearchForward, &["alpha", "alps", "alto"]);
    engine.update("al");
    assert_eq!(engine.entries().len(), 3);

    assert!(engine.move_selection(true));
    assert_eq!(engine.selected(), Some(2));
    engine.move_selection(false);
    assert_eq!(engine.selected(), None);
    engine.move_selection(false);
    assert_eq!(engine.selected(), Some(0));
    engine.move_selection(true);
    assert_eq!(engine.selected(), None);

    engine.dispose();
    assert!(!engine.move_selection(false));
}

#[test]
fn test_search_mode_accept_replaces_input() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::SearchBackward, &["needle", "noodle"]);
    engine.update("ndl");
    engine.move_selection(false);
    let text = engine.accept_selection().unwrap();
    assert!(text == "needle" || text == "noodle");
}

#[test]
fn test_update_clears_selection() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::SearchForward, &["alpha", "alps"]);
    engine.update("al");
    engine.move_selection(false);
    engine.update("alp");
    assert_eq!(engine.selected(), None);
}

#[test]
fn test_expression_mode_has_no_completion() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Expression, &["abc"]);
    engine.update("abc");
    assert!(!engine.is_active());
}

#[test]
fn test_highlights_follow_setting() {
    let host = catalog_host();
    let catalog = Rc::new(CompletionCatalog::new(host.clone()));
    let settings = OverlaySettings {
        highlight_completions: false,
        ..OverlaySettings::default()
    };
    let mut plain = CompletionEngine::new(
        Rc::clone(&catalog),
        SearchWordProvider::default(),
        OverlayMode::Command,
        &settings,
    );
    plain.update("wq");
    assert!(plain.entries()[0].candidate().highlights.is_empty());

    let mut lit = engine(&host, OverlayMode::Command, &[]);
    lit.update("wq");
    assert_eq!(lit.entries()[0].candidate().highlights, vec![0, 1]);
}

#[test]
fn test_catalog_loads_once_and_survives_failure() {
    let host = catalog_host();
    let catalog = CompletionCatalog::new(host.clone());
    let _ = catalog.ex_commands();
    let _ = catalog.ex_commands();
    assert_eq!(host.catalog_loads(), 1);

    let failing = catalog_host();
    failing.set_catalog_fails(true);
    let catalog = CompletionCatalog::new(failing.clone());
    assert!(catalog.ex_commands().is_empty());
    assert!(catalog.options().suggest("nu", 8).is_empty());
}

#[test]
fn test_entry_labels() {
    let host = catalog_host();
    let mut engine = engine(&host, OverlayMode::Command, &[]);
    engine.update("set ic");
    assert_eq!(engine.entries()[0].label(), "ignorecase (ic)");
    engine.update("action Reformat");
    assert_eq!(engine.entries()[0].label(), "ReformatCode");
}
