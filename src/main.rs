//! cmdfloat demo
//!
//! A one-buffer terminal "editor" backed by the in-memory host. Press `:`,
//! `/` or `?` to open the overlay, `i` then Ctrl-R `=` for the expression
//! prompt, `q` or Ctrl-C to quit. Set `CMDFLOAT_LOG=debug` and redirect
//! stderr to see the overlay's log.

use std::rc::Rc;

use anyhow::{bail, Result};
use cmdfloat::completion::CompletionEntry;
use cmdfloat::event_loop::EventLoop;
use cmdfloat::host::{
    ActionInfo, EditorSurfaces, InMemoryHost, ModalEngine, OptionInfo, SurfaceId, WindowId,
};
use cmdfloat::key::{ComponentId, KeyEvent, KeyEventKind, VirtualKey};
use cmdfloat::mode::EngineMode;
use cmdfloat::service::OverlayService;
use cmdfloat::session::OverlaySession;
use cmdfloat::term::crossterm::CrosstermBackend;
use cmdfloat::term::TerminalBackend;
use unicode_width::UnicodeWidthStr;

const SURFACE: SurfaceId = SurfaceId(1);
const WINDOW: WindowId = WindowId(1);
const EDITOR: ComponentId = ComponentId(1);
const OVERLAY_INPUT: ComponentId = ComponentId(2);

const SAMPLE_TEXT: &str = "\
The quick brown fox jumps over the lazy dog.
Search for fox, then try :%s/fox/cat/ and watch the preview.
Fuzzy completion knows ex commands, :action ids and :set options.
History is kept per prompt; browse it with Up and Down.
";

const EX_COMMANDS: &[&str] = &[
    "bd[elete]",
    "b[uffer]",
    "e[dit]",
    "noh[lsearch]",
    "q[uit]",
    "s[ubstitute]",
    "se[t]",
    "setl[ocal]",
    "sp[lit]",
    "tabn[ew]",
    "vs[plit]",
    "w[rite]",
    "wq",
];

fn main() -> Result<()> {
    init_logging();

    let host = Rc::new(InMemoryHost::new());
    host.add_editor(SURFACE, SAMPLE_TEXT, EDITOR, WINDOW);
    host.add_component(OVERLAY_INPUT, WINDOW);
    host.set_ex_commands(EX_COMMANDS.iter().copied());
    host.set_actions(vec![
        action("GotoFile", Some("Go to File")),
        action("GotoClass", Some("Go to Class")),
        action("ReformatCode", Some("Reformat Code")),
        action("ShowSettings", None),
    ]);
    host.set_options(vec![
        option("ignorecase", Some("ic")),
        option("smartcase", Some("scs")),
        option("number", Some("nu")),
        option("relativenumber", Some("rnu")),
        option("hlsearch", Some("hls")),
    ]);
    host.set_flag("ignorecase", true);
    host.set_flag("smartcase", true);

    let events = EventLoop::new();
    let mut service = OverlayService::new(host.clone(), WINDOW, events.clone());
    if !service.initialize() {
        bail!("overlay service could not register");
    }

    let mut backend = CrosstermBackend::new().map_err(anyhow::Error::msg)?;
    backend.init().map_err(anyhow::Error::msg)?;
    let result = run(&mut backend, &host, &mut service, &events);
    backend.deinit();
    result
}

fn init_logging() {
    let Ok(filter) = std::env::var("CMDFLOAT_LOG") else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
}

fn action(id: &str, label: Option<&str>) -> ActionInfo {
    ActionInfo {
        id: id.to_string(),
        label: label.map(str::to_string),
    }
}

fn option(name: &str, abbreviation: Option<&str>) -> OptionInfo {
    OptionInfo {
        name: name.to_string(),
        abbreviation: abbreviation.map(str::to_string),
    }
}

fn run(
    backend: &mut impl TerminalBackend,
    host: &InMemoryHost,
    service: &mut OverlayService,
    events: &EventLoop,
) -> Result<()> {
    loop {
        draw(backend, host, service)?;
        for event in backend.read_key_events().map_err(anyhow::Error::msg)? {
            if !service.manager().is_active() && is_quit(host, &event) {
                return Ok(());
            }
            let source = if service.manager().is_active() {
                OVERLAY_INPUT
            } else {
                EDITOR
            };
            let mut event = event.from_component(source);
            if !service.dispatch_key_event(&mut event) && source == EDITOR {
                editor_key(host, &event);
            }
            if service.manager().is_active() {
                service.manager_mut().bind_overlay_component(OVERLAY_INPUT);
            }
        }
        events.run_pending();
    }
}

fn is_quit(host: &InMemoryHost, event: &KeyEvent) -> bool {
    if event.kind != KeyEventKind::Pressed {
        return false;
    }
    if event.ctrl() && event.key == VirtualKey::Letter('C') {
        return true;
    }
    event.ch == Some('q') && host.engine_mode(SURFACE) == Some(EngineMode::Normal)
}

/// Minimal modal editing for the demo buffer
fn editor_key(host: &InMemoryHost, event: &KeyEvent) {
    if event.kind != KeyEventKind::Pressed {
        return;
    }
    let text = host.document_text(SURFACE);
    let caret = host.caret_offset(SURFACE).min(text.len());
    let mode = host.engine_mode(SURFACE);
    match (mode, event.key, event.ch) {
        (_, VirtualKey::Escape, _) => host.set_engine_mode(Some(EngineMode::Normal)),
        (Some(EngineMode::Normal), _, Some('i')) => host.set_engine_mode(Some(EngineMode::Insert)),
        (Some(EngineMode::Normal), _, Some('v')) => host.set_engine_mode(Some(EngineMode::Visual)),
        (Some(EngineMode::Visual), _, Some('v')) => host.set_engine_mode(Some(EngineMode::Normal)),
        (Some(EngineMode::Normal | EngineMode::Visual), _, Some('l'))
        | (_, VirtualKey::Right, _) => {
            let next = text[caret..].chars().next().map_or(caret, |c| caret + c.len_utf8());
            host.move_caret(SURFACE, next.min(text.len()));
        }
        (Some(EngineMode::Normal | EngineMode::Visual), _, Some('h'))
        | (_, VirtualKey::Left, _) => {
            let prev = text[..caret].chars().next_back().map_or(caret, |c| caret - c.len_utf8());
            host.move_caret(SURFACE, prev);
        }
        (Some(EngineMode::Normal | EngineMode::Visual), _, Some('w')) => {
            let rest = &text[caret..];
            let skip = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let word = rest[skip..]
                .find(|c: char| !c.is_whitespace())
                .map_or(text.len(), |o| caret + skip + o);
            host.move_caret(SURFACE, word);
        }
        _ => {}
    }
}

fn draw(backend: &mut impl TerminalBackend, host: &InMemoryHost, service: &OverlayService) -> Result<()> {
    let size = backend.get_size().map_err(anyhow::Error::msg)?;
    let text = host.document_text(SURFACE);
    let caret = host.caret_offset(SURFACE);

    backend.clear_screen().map_err(anyhow::Error::msg)?;
    for (row, line) in text.lines().enumerate() {
        backend.move_cursor(row as u16, 0).map_err(anyhow::Error::msg)?;
        backend.write(line).map_err(anyhow::Error::msg)?;
    }

    let status_row = size.rows.saturating_sub(1);
    let mode = host.engine_mode(SURFACE).map_or("?".to_string(), |m| format!("{m:?}"));
    let last = host.executed().last().cloned().unwrap_or_default();
    let search = host.current_search_state().last_pattern.unwrap_or_default();
    let status = format!("-- {mode} --  last: {last}  /{search}");
    backend.move_cursor(status_row, 0).map_err(anyhow::Error::msg)?;
    backend.set_reverse(true).map_err(anyhow::Error::msg)?;
    backend.write(&fit(&status, size.cols as usize)).map_err(anyhow::Error::msg)?;
    backend.set_reverse(false).map_err(anyhow::Error::msg)?;

    let cursor = match service.manager().session() {
        Some(session) => draw_overlay(backend, session, size.cols)?,
        None => caret_position(&text, caret),
    };
    backend.move_cursor(cursor.0, cursor.1).map_err(anyhow::Error::msg)?;
    backend.flush().map_err(anyhow::Error::msg)
}

/// Draw the overlay box; returns where the input cursor goes
fn draw_overlay(
    backend: &mut impl TerminalBackend,
    session: &OverlaySession,
    cols: u16,
) -> Result<(u16, u16)> {
    let width = (cols as usize).clamp(20, 72);
    let top = 6u16;
    let mut header = format!("[ {} ]", session.header());
    if session.mode().is_search() {
        header.push_str(&format!("  {}", session.indicator().label()));
    }
    let prompt = format!("{} {}", session.mode().prefix(), session.input());

    backend.move_cursor(top, 2).map_err(anyhow::Error::msg)?;
    backend.set_reverse(true).map_err(anyhow::Error::msg)?;
    backend.write(&fit(&header, width)).map_err(anyhow::Error::msg)?;
    backend.set_reverse(false).map_err(anyhow::Error::msg)?;
    backend.move_cursor(top + 1, 2).map_err(anyhow::Error::msg)?;
    backend.write(&fit(&prompt, width)).map_err(anyhow::Error::msg)?;

    let completion = session.completion();
    for (i, entry) in completion.entries().iter().take(completion.visible_rows()).enumerate() {
        let selected = completion.selected() == Some(i);
        backend.move_cursor(top + 2 + i as u16, 2).map_err(anyhow::Error::msg)?;
        backend.set_reverse(selected).map_err(anyhow::Error::msg)?;
        backend.write(&fit(&entry_row(entry), width)).map_err(anyhow::Error::msg)?;
        backend.set_reverse(false).map_err(anyhow::Error::msg)?;
    }
    Ok((top + 1, 2 + prompt.width().min(width) as u16))
}

fn entry_row(entry: &CompletionEntry) -> String {
    format!("  {}", entry.label())
}

/// Pad or cut `text` to exactly `width` columns
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn caret_position(text: &str, caret: usize) -> (u16, u16) {
    let before = &text[..caret.min(text.len())];
    let row = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (row as u16, before[line_start..].width() as u16)
}
