//! Dispatcher applying [`Action`] to finder state.
//!
//! Decomposed by concern:
//! * `edit`   - query text and cursor
//! * `motion` - selection and horizontal scroll
//! * `mode`   - match mode and keep-right toggles

use crate::Action;
use core_state::FinderState;
use tracing::trace;

mod edit;
mod mode;
mod motion;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Finished,
    Cancelled,
}

/// Result of dispatching a single [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The query or mode changed; the result set must be recomputed before painting.
    pub recompute: bool,
    /// A repaint is needed.
    pub dirty: bool,
    /// Wipe the band and everything below it before repainting.
    pub redraw: bool,
    pub exit: Option<Exit>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            recompute: false,
            dirty: true,
            redraw: false,
            exit: None,
        }
    }

    pub fn recompute() -> Self {
        Self {
            recompute: true,
            dirty: true,
            redraw: false,
            exit: None,
        }
    }

    pub fn exit(exit: Exit) -> Self {
        Self {
            recompute: false,
            dirty: false,
            redraw: false,
            exit: Some(exit),
        }
    }

    pub fn redraw() -> Self {
        Self {
            recompute: false,
            dirty: true,
            redraw: true,
            exit: None,
        }
    }

    /// Recompute when the text changed, otherwise just repaint.
    pub fn edited(changed: bool) -> Self {
        if changed {
            Self::recompute()
        } else {
            Self::dirty()
        }
    }
}

/// Result-set facts the selection motions need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchContext {
    pub match_count: usize,
    /// Rows printed by the last paint; paging falls back to 10 when none were.
    pub page_rows: usize,
}

pub fn dispatch(action: Action, state: &mut FinderState, ctx: DispatchContext) -> DispatchResult {
    trace!(target: "session", action = action.label(), "dispatch");
    match action {
        Action::Insert { c, shift } => DispatchResult::edited(state.editor.insert_char(c, shift)),
        Action::Edit(kind) => edit::handle_edit(kind, state),
        Action::Cursor(motion) => edit::handle_cursor(motion, state),
        Action::EndOrKeepRight => mode::handle_end_or_keep_right(state),
        Action::Select(motion) => motion::handle_select(motion, state, ctx),
        Action::Scroll(delta) => motion::handle_scroll(delta, state),
        Action::CycleMode => mode::handle_cycle_mode(state),
        Action::Redraw => DispatchResult::redraw(),
        Action::Finish => DispatchResult::exit(Exit::Finished),
        Action::Cancel => DispatchResult::exit(Exit::Cancelled),
    }
}
