//! List replacement, resize and prompt-only sessions.

mod common;

use common::{Harness, animals, plain};
use core_config::{FinderInit, SessionOptions};
use core_events::{Event, InputEvent, KeyCode, KeyEvent};
use core_session::{Exit, SessionEnv};
use core_terminal::TerminalCapabilities;
use std::sync::Arc;

fn shared(items: &[&str]) -> Arc<[String]> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn update_preserves_query_and_cursor() {
    let mut h = Harness::new(animals());
    h.type_str("ra");
    h.key(plain(KeyCode::Left));
    let before = h.session.state().editor.clone();

    h.send(Event::ListUpdate(shared(&["Rats", "Zebras", "Crabs"])));
    assert_eq!(h.session.state().editor, before);
    assert_eq!(h.session.results().len(), 3);
    assert_eq!(h.session.results().total(), 3);
}

#[test]
fn update_clamps_selection() {
    let mut h = Harness::new(animals());
    h.ctrl('j', 30);
    h.send(Event::ListUpdate(shared(&["one", "two"])));
    assert_eq!(h.session.state().selected_rank, 1);
    let out = h.enter();
    assert_eq!(out.selected.unwrap().value, "two");
}

#[test]
fn empty_list_is_a_valid_state() {
    let mut h = Harness::new(Vec::<String>::new());
    assert!(h.session.results().is_empty());
    h.ctrl('j', 3);
    assert_eq!(h.session.state().selected_rank, 0);
    assert!(h.screen().contains("0/0"));
    assert_eq!(h.enter().selected, None);
}

#[test]
fn zero_sized_terminal_does_not_fail() {
    let env = SessionEnv {
        size: Some((0, 0)),
        capabilities: TerminalCapabilities::colored(),
        ..SessionEnv::default()
    };
    let mut h = Harness::with_env(animals(), env);
    h.type_str("a");
    h.send(Event::Input(InputEvent::Resize(0, 0)));
    assert!(h.enter().selected.is_some());
}

#[test]
fn resize_changes_visible_rows_with_height() {
    let options = SessionOptions {
        height: Some(50),
        ..SessionOptions::default()
    };
    let env = SessionEnv {
        size: Some((80, 43)),
        ..SessionEnv::default()
    };
    let mut h = Harness::with_env(FinderInit::with_options(animals(), options), env);
    assert_eq!(h.session.printed_rows(), 20);
    h.send(Event::Input(InputEvent::Resize(80, 13)));
    assert_eq!(h.session.printed_rows(), 6);
}

#[test]
fn prompt_only_session_captures_text() {
    let options = SessionOptions {
        label: "Name: ".into(),
        no_list: true,
        ..SessionOptions::default()
    };
    let mut h = Harness::new(FinderInit::with_options(Vec::new(), options));
    assert_eq!(h.session.band_extent(), 1);
    h.type_str("jon");
    h.key(plain(KeyCode::Left));
    h.type_str("h");
    assert_eq!(h.session.state().editor.cursor(), 3);
    h.send(Event::ListUpdate(shared(&["ignored"])));
    assert!(h.session.list().is_empty());
    let out = h.enter();
    assert_eq!(out.query, "john");
    assert_eq!(out.selected, None);
    assert!(!h.screen().contains("fuzzy mode"));
}

#[test]
fn stop_cancels_from_outside() {
    let mut h = Harness::new(animals());
    h.type_str("cro");
    let mut out = Vec::new();
    let outcome = h.session.stop(&mut out).unwrap();
    assert_eq!(outcome.status, Exit::Cancelled);
    assert_eq!(outcome.query, "cro");
    assert_eq!(h.session.band_extent(), 0);
}

#[test]
fn keep_right_and_scroll_show_in_status() {
    let mut h = Harness::new(animals());
    h.key(KeyEvent::ctrl('e'));
    assert!(h.session.state().keep_right);
    h.key(KeyEvent::alt(KeyCode::Char('p')));
    h.key(KeyEvent::alt(KeyCode::Char('p')));
    assert_eq!(h.session.state().horizontal_scroll, 2);
    assert!(h.screen().contains("[+2]"));
}

#[test]
fn word_editing_recomputes() {
    let mut h = Harness::new(animals());
    h.type_str("zz cro");
    assert!(h.session.results().is_empty());
    h.key(KeyEvent::ctrl('a'));
    h.key(KeyEvent::ctrl('f'));
    h.key(KeyEvent::ctrl('w'));
    assert_eq!(h.session.state().query(), "cro");
    // Crocodiles, Crows, Rhinoceroses
    assert_eq!(h.session.results().len(), 3);
}

#[test]
fn appended_batches_keep_original_indices_stable() {
    let mut h = Harness::new(Vec::<String>::new());
    h.type_str("o");
    h.send(Event::ListAppend(shared(&["Apes", "Moles"])));
    h.send(Event::ListAppend(shared(&["Goats", "Otters"])));
    h.send(Event::ListAppend(shared(&[])));
    h.send(Event::ListAppend(shared(&["Owls", "Zebras"])));

    let list = h.session.list();
    assert_eq!(list.len(), 6);
    for (idx, item) in list.iter().enumerate() {
        assert_eq!(item.original_index, idx);
    }
    assert_eq!(list.get(3).map(|i| i.value.as_str()), Some("Otters"));

    // Goats, Moles, Otters, Owls
    assert_eq!(h.session.results().len(), 4);
    assert_eq!(h.session.results().total(), 6);
    assert_eq!(h.session.state().query(), "o");
    h.key(KeyEvent::ctrl('j'));
    let out = h.enter();
    let selected = out.selected.expect("a match");
    assert_eq!((selected.value.as_str(), selected.index), ("Moles", 1));
}

#[test]
fn append_after_replacement_continues_from_the_new_list() {
    let mut h = Harness::new(animals());
    h.send(Event::ListUpdate(shared(&["Apes"])));
    h.send(Event::ListAppend(shared(&["Bats"])));
    assert_eq!(h.session.list().get(1).map(|i| i.original_index), Some(1));
    assert_eq!(h.session.results().total(), 2);
}
