//! Runtime toggles: match mode and keep-right.

use super::DispatchResult;
use core_state::FinderState;

/// Changing the mode changes which items match.
pub(crate) fn handle_cycle_mode(state: &mut FinderState) -> DispatchResult {
    state.cycle_mode();
    DispatchResult::recompute()
}

/// Ctrl-e: the first press jumps to the end of the query, a press at the end toggles keep-right.
pub(crate) fn handle_end_or_keep_right(state: &mut FinderState) -> DispatchResult {
    if state.editor.at_end() {
        state.toggle_keep_right();
    } else {
        state.editor.end();
    }
    DispatchResult::dirty()
}
