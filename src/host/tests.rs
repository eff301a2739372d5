use std::rc::Rc;

use super::*;
use crate::key::VirtualKey;

struct FixedFactory {
    prefix: &'static str,
}

impl HostAdapterFactory for FixedFactory {
    fn name(&self) -> &str {
        self.prefix
    }

    fn supports(&self, host_version: &str) -> bool {
        host_version.starts_with(self.prefix)
    }

    fn create(&self) -> Rc<dyn Host> {
        Rc::new(InMemoryHost::new())
    }
}

#[test]
fn test_pending_state_busy_if_any_flag() {
    assert!(!PendingState::default().is_busy());
    let pending = PendingState {
        operator_pending: true,
        ..PendingState::default()
    };
    assert!(pending.is_busy());
    let pending = PendingState {
        executing_mapping: true,
        ..PendingState::default()
    };
    assert!(pending.is_busy());
}

#[test]
fn test_global_value_conversions() {
    assert_eq!(GlobalValue::Int(0).as_bool(), Some(false));
    assert_eq!(GlobalValue::Str("1".into()).as_bool(), Some(true));
    assert_eq!(GlobalValue::Str("yes".into()).as_bool(), None);
    assert_eq!(GlobalValue::Str(" 42 ".into()).as_int(), Some(42));
    assert_eq!(GlobalValue::Bool(true).as_int(), Some(1));

    let list = GlobalValue::List(vec![
        GlobalValue::Str("<Up>".into()),
        GlobalValue::List(vec![GlobalValue::Str("<C-p>".into())]),
    ]);
    assert_eq!(list.as_string_list(), vec!["<Up>", "<C-p>"]);
    assert_eq!(GlobalValue::Str("<Tab>".into()).as_string_list(), vec!["<Tab>"]);
}

#[test]
fn test_read_scoped_returns_value_and_is_reentrant() {
    let host = InMemoryHost::new();
    let value = read_scoped(&host, || read_scoped(&host, || 7));
    assert_eq!(value, 7);
    assert_eq!(host.read_acquisitions(), 1);

    let _ = read_scoped(&host, || ());
    assert_eq!(host.read_acquisitions(), 2);
}

#[test]
fn test_read_scoped_through_trait_object() {
    let host: Rc<dyn Host> = Rc::new(InMemoryHost::new());
    let len = read_scoped(&*host, || "abc".len());
    assert_eq!(len, 3);
}

#[test]
fn test_null_host_degrades() {
    let host = NullHost;
    let surface = SurfaceId(1);
    assert!(!host.is_available());
    assert_eq!(host.engine_mode(surface), None);
    assert!(host.pending_state(surface).is_err());
    assert!(host.ex_commands().unwrap().is_empty());
    assert!(host.is_disposed(surface));
    let err = host
        .handle_key(surface, KeyStroke::from_char('a'))
        .unwrap_err();
    assert_eq!(err.code, "CAPABILITY_UNSUPPORTED");
}

#[test]
fn test_select_adapter_first_supporting_factory() {
    let factories: Vec<Box<dyn HostAdapterFactory>> = vec![
        Box::new(FixedFactory { prefix: "2023" }),
        Box::new(FixedFactory { prefix: "2024" }),
    ];
    assert!(select_adapter("2024.1", &factories).is_available());
    assert!(!select_adapter("2019.3", &factories).is_available());
}

#[test]
fn test_memory_host_executes_replayed_search() {
    let host = InMemoryHost::new();
    let surface = SurfaceId(1);
    host.add_editor(surface, "foo bar foo", ComponentId(10), WindowId(1));
    for ch in "/foo\n".chars() {
        host.handle_key(surface, KeyStroke::from_char(ch)).unwrap();
    }
    assert_eq!(host.executed(), vec!["/foo"]);
    assert_eq!(host.current_search_state().last_pattern.as_deref(), Some("foo"));
    assert_eq!(host.caret_offset(surface), 8);
}

#[test]
fn test_memory_host_key_budget() {
    let host = InMemoryHost::new();
    let surface = SurfaceId(1);
    host.set_key_budget(Some(1));
    assert!(host.handle_key(surface, KeyStroke::from_char(':')).is_ok());
    assert!(host.handle_key(surface, KeyStroke::from_char('w')).is_err());
    assert_eq!(host.handled_keys().len(), 1);
    assert_eq!(host.handled_keys()[0].key, VirtualKey::Colon);
}

#[test]
fn test_memory_host_incsearch_highlights() {
    let host = InMemoryHost::new();
    let surface = SurfaceId(1);
    host.add_editor(surface, "alpha beta", ComponentId(10), WindowId(1));
    let hit = host
        .update_incsearch(surface, "beta", SearchDirection::Forward, 0)
        .unwrap();
    assert_eq!(hit, Some(6));
    assert_eq!(host.highlight(surface).as_deref(), Some("beta"));

    let miss = host
        .update_incsearch(surface, "gamma", SearchDirection::Forward, 0)
        .unwrap();
    assert_eq!(miss, None);
    assert_eq!(host.highlight(surface), None);
}
