//! Key -> Action translation.
//!
//! Stateless: every binding is a single key. Control bindings are checked first, then Alt
//! bindings; any other key carrying Ctrl or Alt is ignored so that unbound chords never insert
//! text.

use crate::{Action, CursorMotion, EditKind, SelectMotion};
use core_events::{KeyCode, KeyEvent, KeyModifiers};

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return match key.code {
            KeyCode::Char(c) => ctrl_binding(c.to_ascii_lowercase()),
            _ => None,
        };
    }
    if key.mods.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('n') | KeyCode::Left => Some(Action::Scroll(-1)),
            KeyCode::Char('p') | KeyCode::Right => Some(Action::Scroll(1)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => Some(Action::Finish),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Backspace => Some(Action::Edit(EditKind::Backspace)),
        KeyCode::Left => Some(Action::Cursor(CursorMotion::Left)),
        KeyCode::Right => Some(Action::Cursor(CursorMotion::Right)),
        KeyCode::Home => Some(Action::Cursor(CursorMotion::Home)),
        KeyCode::End => Some(Action::Cursor(CursorMotion::End)),
        KeyCode::Down => Some(Action::Select(SelectMotion::Down)),
        KeyCode::Up => Some(Action::Select(SelectMotion::Up)),
        KeyCode::Char(c) if !c.is_control() => Some(Action::Insert {
            c,
            shift: key.mods.contains(KeyModifiers::SHIFT),
        }),
        KeyCode::Char(_) | KeyCode::Tab => None,
    }
}

fn ctrl_binding(c: char) -> Option<Action> {
    let action = match c {
        'c' | 'z' | 'q' => Action::Cancel,
        'm' => Action::Finish,
        'l' => Action::Redraw,
        'h' => Action::Edit(EditKind::Backspace),
        'w' => Action::Edit(EditKind::DeleteWordBack),
        'a' => Action::Cursor(CursorMotion::Home),
        'b' => Action::Cursor(CursorMotion::WordBack),
        'f' => Action::Cursor(CursorMotion::WordForward),
        'e' => Action::EndOrKeepRight,
        'j' | 'n' => Action::Select(SelectMotion::Down),
        'k' | 'p' => Action::Select(SelectMotion::Up),
        'd' => Action::Select(SelectMotion::PageDown),
        'u' => Action::Select(SelectMotion::PageUp),
        's' => Action::CycleMode,
        _ => return None,
    };
    Some(action)
}
