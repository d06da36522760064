//! Query text edits and cursor motions.

use super::DispatchResult;
use crate::{CursorMotion, EditKind};
use core_state::FinderState;

pub(crate) fn handle_edit(kind: EditKind, state: &mut FinderState) -> DispatchResult {
    let changed = match kind {
        EditKind::Backspace => state.editor.backspace(),
        EditKind::DeleteWordBack => state.editor.delete_word_back(),
    };
    DispatchResult::edited(changed)
}

/// Cursor motions never change the text, so they only repaint.
pub(crate) fn handle_cursor(motion: CursorMotion, state: &mut FinderState) -> DispatchResult {
    let editor = &mut state.editor;
    match motion {
        CursorMotion::Left => editor.move_left(),
        CursorMotion::Right => editor.move_right(),
        CursorMotion::Home => editor.home(),
        CursorMotion::End => editor.end(),
        CursorMotion::WordBack => editor.jump_word_back(),
        CursorMotion::WordForward => editor.jump_word_forward(),
    };
    DispatchResult::dirty()
}
