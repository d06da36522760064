//! Selection and horizontal scroll.

use super::{DispatchContext, DispatchResult};
use crate::SelectMotion;
use core_state::FinderState;

/// Page step used before anything was printed.
const DEFAULT_PAGE: usize = 10;

pub(crate) fn handle_select(
    motion: SelectMotion,
    state: &mut FinderState,
    ctx: DispatchContext,
) -> DispatchResult {
    let page = if ctx.page_rows == 0 {
        DEFAULT_PAGE
    } else {
        ctx.page_rows
    };
    let page = isize::try_from(page).unwrap_or(isize::MAX);
    let delta = match motion {
        SelectMotion::Down => 1,
        SelectMotion::Up => -1,
        SelectMotion::PageDown => page,
        SelectMotion::PageUp => -page,
    };
    state.move_selection(delta, ctx.match_count);
    DispatchResult::dirty()
}

pub(crate) fn handle_scroll(delta: i32, state: &mut FinderState) -> DispatchResult {
    state.scroll_horizontally(delta);
    DispatchResult::dirty()
}
