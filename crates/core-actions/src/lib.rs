//! Keybinding state machine for the finder.
//!
//! Two stages:
//! * [`translate_key`] maps a normalized key to an [`Action`] (or nothing).
//! * [`dispatch`] applies an action to a [`core_state::FinderState`] and reports what the session
//!   must do next: recompute the result set, repaint, or exit.
//!
//! Neither stage touches the source list, the result set or the terminal.

pub mod dispatcher;
pub mod key_translator;

pub use dispatcher::{DispatchContext, DispatchResult, Exit, dispatch};
pub use key_translator::translate_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Insert a printable character; `shift` uppercases it.
    Insert { c: char, shift: bool },
    Edit(EditKind),
    Cursor(CursorMotion),
    /// Ctrl-e: jump to the end of the query, or toggle keep-right when already there.
    EndOrKeepRight,
    Select(SelectMotion),
    /// Signed horizontal scroll step.
    Scroll(i32),
    CycleMode,
    Redraw,
    Finish,
    Cancel,
}

impl Action {
    /// Short label for logs; never includes inserted text.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Insert { .. } => "insert",
            Action::Edit(EditKind::Backspace) => "backspace",
            Action::Edit(EditKind::DeleteWordBack) => "delete_word_back",
            Action::Cursor(_) => "cursor",
            Action::EndOrKeepRight => "end_or_keep_right",
            Action::Select(_) => "select",
            Action::Scroll(_) => "scroll",
            Action::CycleMode => "cycle_mode",
            Action::Redraw => "redraw",
            Action::Finish => "finish",
            Action::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Backspace,
    DeleteWordBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    Left,
    Right,
    Home,
    End,
    WordBack,
    WordForward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMotion {
    Down,
    Up,
    PageDown,
    PageUp,
}
