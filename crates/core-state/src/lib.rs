//! Finder session state: query editor, selection, horizontal scroll and the two runtime toggles.
//!
//! Nothing here knows about the source list or the terminal. The session controller owns a
//! [`FinderState`] next to its result set and calls [`FinderState::clamp_selection`] every time
//! the result set changes, which keeps `selected_rank` valid without any fallible path.

use core_filter::MatchMode;

pub mod editor;
pub use editor::QueryEditor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderState {
    pub editor: QueryEditor,
    /// Index into the current result set; 0 when the set is empty.
    pub selected_rank: usize,
    /// Signed manual shift applied to every visible row's horizontal cut.
    pub horizontal_scroll: i32,
    pub mode: MatchMode,
    pub keep_right: bool,
}

impl FinderState {
    pub fn new(query: impl Into<String>, mode: MatchMode, keep_right: bool) -> Self {
        Self {
            editor: QueryEditor::new(query),
            selected_rank: 0,
            horizontal_scroll: 0,
            mode,
            keep_right,
        }
    }

    pub fn query(&self) -> &str {
        self.editor.buffer()
    }

    /// Clamp `selected_rank` into `[0, max(0, match_count - 1)]`.
    pub fn clamp_selection(&mut self, match_count: usize) {
        let max = match_count.saturating_sub(1);
        if self.selected_rank > max {
            self.selected_rank = max;
        }
    }

    /// Move the selection by `delta` rows, clamped to the result set.
    pub fn move_selection(&mut self, delta: isize, match_count: usize) {
        self.selected_rank = self.selected_rank.saturating_add_signed(delta);
        self.clamp_selection(match_count);
    }

    pub fn scroll_horizontally(&mut self, delta: i32) {
        self.horizontal_scroll = self.horizontal_scroll.saturating_add(delta);
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    pub fn toggle_keep_right(&mut self) {
        self.keep_right = !self.keep_right;
    }
}
