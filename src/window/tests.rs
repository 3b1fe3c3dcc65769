use super::*;
use crate::buffer::BufferManager;
use crate::config::Config;
use crate::constants::errors;

fn window(buffer: BufferId) -> EditorWindow {
    EditorWindow::new(1, buffer, &default_processors(&Config::default()))
}

fn window_with(buffers: &[BufferId]) -> EditorWindow {
    let mut win = window(buffers[0]);
    for &b in &buffers[1..] {
        win.add_buffer(b);
    }
    win
}

// ============================================================
// Buffer list
// ============================================================

#[test]
fn test_add_buffer_ignores_duplicates() {
    let mut win = window(10);
    assert_eq!(win.add_buffer(11), 1);
    assert_eq!(win.add_buffer(10), 0);
    assert_eq!(win.buffers(), &[10, 11]);
    assert_eq!(win.active_buffer(), 10);
}

#[test]
fn test_switch_to_buffer() {
    let mut win = window_with(&[10, 11, 12]);
    win.switch_to_buffer(12).unwrap();
    assert_eq!(win.active_buffer(), 12);
    assert_eq!(win.get_active_buffer_index(), 2);

    let err = win.switch_to_buffer(99).unwrap_err();
    assert_eq!(err.code, errors::INVALID_WINDOW_OPERATION);
    assert_eq!(win.active_buffer(), 12);
}

#[test]
fn test_select_buffer_by_index() {
    let mut win = window_with(&[10, 11]);
    assert_eq!(win.select_buffer_by_index(1), Some(11));
    assert_eq!(win.active_buffer(), 11);
    assert_eq!(win.select_buffer_by_index(2), None);
    assert_eq!(win.active_buffer(), 11);
}

#[test]
fn test_select_buffer_by_name() {
    let mut buffers = BufferManager::new();
    let a = buffers.create_empty();
    let b = buffers.create_empty();
    buffers.get_mut(a).unwrap().set_path("/tmp/project/main.rs");
    buffers.get_mut(b).unwrap().set_path("/tmp/project/lib.rs");

    let mut win = window_with(&[a, b]);
    assert_eq!(win.select_buffer_by_name("lib.rs", &buffers), Some(b));
    assert_eq!(win.active_buffer(), b);

    let full = buffers.get(a).unwrap().display_name(false);
    assert_eq!(win.select_buffer_by_name(&full, &buffers), Some(a));
    assert_eq!(win.select_buffer_by_name("missing.rs", &buffers), None);
    assert_eq!(win.active_buffer(), a);
}

#[test]
fn test_next_and_previous_buffer_wrap() {
    let mut win = window_with(&[10, 11, 12]);
    assert_eq!(win.next_buffer(), 11);
    assert_eq!(win.next_buffer(), 12);
    assert_eq!(win.next_buffer(), 10);
    assert_eq!(win.previous_buffer(), 12);
    assert_eq!(win.previous_buffer(), 11);

    let mut single = window(5);
    assert_eq!(single.next_buffer(), 5);
    assert_eq!(single.previous_buffer(), 5);
}

#[test]
fn test_remove_buffer_keeps_active_consistent() {
    let mut win = window_with(&[10, 11, 12]);
    win.switch_to_buffer(12).unwrap();

    // before the active one
    assert!(win.remove_buffer(10));
    assert_eq!(win.active_buffer(), 12);

    // the active one, at the end
    assert!(win.remove_buffer(12));
    assert_eq!(win.active_buffer(), 11);
    assert_eq!(win.get_buffer_count(), 1);
}

#[test]
fn test_remove_active_buffer_selects_following() {
    let mut win = window_with(&[10, 11, 12]);
    win.switch_to_buffer(11).unwrap();
    assert!(win.remove_buffer(11));
    assert_eq!(win.active_buffer(), 12);
}

#[test]
fn test_remove_buffer_refusals() {
    let mut win = window(10);
    assert!(!win.remove_buffer(10));
    assert!(!win.remove_buffer(42));
    assert_eq!(win.buffers(), &[10]);
}

#[test]
fn test_cursor_is_kept_per_buffer() {
    let mut win = window_with(&[10, 11]);
    win.set_cursor_line(7);
    win.next_buffer();
    assert_eq!(win.cursor_line(), 0);
    win.set_cursor_line(3);
    win.previous_buffer();
    assert_eq!(win.cursor_line(), 7);
}

// ============================================================
// Processors
// ============================================================

#[test]
fn test_window_processors_start_with_diagnostics() {
    let defaults = default_processors(&Config::default());
    let win = EditorWindow::new(1, 10, &defaults);
    assert_eq!(win.processors()[0], Processor::LspDiagnostics);
    assert_eq!(&win.processors()[1..], defaults.as_slice());
}

#[test]
fn test_default_processor_order() {
    let names: Vec<_> = default_processors(&Config::default())
        .iter()
        .map(Processor::name)
        .collect();
    assert_eq!(
        names,
        vec![
            "trailing_whitespace",
            "highlight_selection",
            "highlight_search",
            "highlight_incremental_search",
            "matching_bracket",
            "display_multiple_cursors",
            "tabs",
        ]
    );
}

#[test]
fn test_refresh_processors_keeps_local_ones() {
    let mut win = EditorWindow::with_processors(
        1,
        10,
        &[Processor::LspDiagnostics, Processor::MatchingBracket],
        &default_processors(&Config::default()),
    );
    let config = Config {
        tabstop: 8,
        ..Config::default()
    };
    win.refresh_processors(&default_processors(&config));

    assert_eq!(win.processors()[0], Processor::LspDiagnostics);
    assert_eq!(win.processors()[1], Processor::MatchingBracket);
    assert!(matches!(
        win.processors().last(),
        Some(Processor::Tabs { tabstop: 8, .. })
    ));
}

fn tabs(config: &Config) -> Processor {
    default_processors(config)
        .into_iter()
        .find(|p| matches!(p, Processor::Tabs { .. }))
        .unwrap()
}

#[test]
fn test_tab_characters_follow_settings() {
    let plain = Config {
        use_nerd_icons: false,
        ..Config::default()
    };
    assert_eq!(tabs(&plain).expand_tabs("a\tb").as_deref(), Some("a|..b"));

    let nerd = Config {
        use_nerd_icons: true,
        ..Config::default()
    };
    assert_eq!(tabs(&nerd).expand_tabs("\tx").as_deref(), Some("|┈┈┈x"));

    let hidden = Config {
        show_unprintable_characters: false,
        ..Config::default()
    };
    assert_eq!(tabs(&hidden).expand_tabs("\tx").as_deref(), Some("    x"));
}

#[test]
fn test_expand_tabs_aligns_to_tabstop() {
    let p = Processor::Tabs {
        tabstop: 4,
        char1: '>',
        char2: '-',
    };
    assert_eq!(p.expand_tabs("abcd\te").as_deref(), Some("abcd>---e"));
    assert_eq!(p.expand_tabs("abc\t").as_deref(), Some("abc>"));
    assert_eq!(Processor::MatchingBracket.expand_tabs("\t"), None);
}
