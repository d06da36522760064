//! Key and resize events from the controlling terminal.
//!
//! A Tokio task reads `crossterm::EventStream` and forwards normalized [`core_events::Event`]s
//! into the session channel until it is signalled, the channel closes or the stream ends.

mod async_service;
pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;

use core_events::{Event, InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CMods};
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Normalize a crossterm key. Keys the finder has no use for map to `None`.
pub fn map_key(key: CKeyEvent) -> Option<Event> {
    let mods = map_mods(key.modifiers);
    let code = match key.code {
        // some terminals send ^H for backspace
        CKeyCode::Char('h') if mods.contains(KeyModifiers::CTRL) => {
            return Some(build_key_event(KeyCode::Backspace, mods - KeyModifiers::CTRL));
        }
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    Some(build_key_event(code, mods))
}

#[inline]
pub(crate) fn build_key_event(code: KeyCode, mods: KeyModifiers) -> Event {
    Event::Input(InputEvent::Key(KeyEvent { code, mods }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: CKeyCode, mods: CMods) -> Option<KeyEvent> {
        match map_key(CKeyEvent::new(code, mods)) {
            Some(Event::Input(InputEvent::Key(k))) => Some(k),
            _ => None,
        }
    }

    #[test]
    fn maps_printable_and_control_keys() {
        assert_eq!(key(CKeyCode::Char('a'), CMods::NONE), Some(KeyEvent::char('a')));
        assert_eq!(key(CKeyCode::Char('A'), CMods::SHIFT), Some(KeyEvent::char('A')));
        assert_eq!(key(CKeyCode::Char('j'), CMods::CONTROL), Some(KeyEvent::ctrl('j')));
        assert_eq!(key(CKeyCode::Left, CMods::ALT), Some(KeyEvent::alt(KeyCode::Left)));
        assert_eq!(key(CKeyCode::Enter, CMods::NONE), Some(KeyEvent::plain(KeyCode::Enter)));
    }

    #[test]
    fn ctrl_h_is_backspace() {
        assert_eq!(
            key(CKeyCode::Char('h'), CMods::CONTROL),
            Some(KeyEvent::plain(KeyCode::Backspace))
        );
    }

    #[test]
    fn unused_keys_are_dropped() {
        assert!(map_key(CKeyEvent::new(CKeyCode::F(5), CMods::NONE)).is_none());
        assert!(map_key(CKeyEvent::new(CKeyCode::PageDown, CMods::NONE)).is_none());
    }
}
