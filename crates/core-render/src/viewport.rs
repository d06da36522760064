//! Viewport geometry: which matches are visible and which part of each row is shown.
//!
//! Vertical: the visible window keeps the selected row near the bottom with one or two rows of
//! bottom padding, so scrolling down always reveals what comes next.
//!
//! Horizontal: each row is cut independently in its own [`TextPos`] space. The cut places the
//! row's anchor (the last matched character, or the final character in keep-right mode) around
//! `right_margin` columns from the right edge, never cuts more than needed to show the tail, and
//! marks truncated sides with [`ELLIPSIS`].

use core_text::{CutPos, TextPos, char_width, chars_width};

/// Rows drawn above the match rows and below them for breathing room (prompt, status, slack).
pub const RESERVED_ROWS: u16 = 3;
pub const ELLIPSIS: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalWindow {
    pub start: usize,
    pub end: usize,
    /// Row budget the window was computed with (may exceed `end - start`).
    pub capacity: usize,
}

impl VerticalWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, rank: usize) -> bool {
        (self.start..self.end).contains(&rank)
    }
}

/// Number of match rows the band may use.
///
/// Without a configured height the band is `min_rows` tall. With a height percentage the budget
/// is that share of the terminal rows left after [`RESERVED_ROWS`], never below `min_rows`.
/// The budget is at least one row so a selection always has somewhere to be drawn.
pub fn row_budget(min_rows: u16, height_pct: Option<u8>, terminal_rows: u16) -> usize {
    let min_rows = usize::from(min_rows);
    let budget = match height_pct {
        None => min_rows,
        Some(pct) => {
            let available = usize::from(terminal_rows.saturating_sub(RESERVED_ROWS));
            let share = usize::from(pct.min(100)) * available / 100;
            share.max(min_rows)
        }
    };
    budget.max(1)
}

/// Visible slice `[start, end)` of a result set with `match_count` entries.
///
/// `selected` must already be clamped. An empty result set yields an empty window.
pub fn vertical_window(
    match_count: usize,
    selected: usize,
    min_rows: u16,
    height_pct: Option<u8>,
    terminal_rows: u16,
) -> VerticalWindow {
    let capacity = row_budget(min_rows, height_pct, terminal_rows);
    let visible = match_count.min(capacity);
    let padding = if match_count > usize::from(min_rows) { 2 } else { 1 };
    // padding can exceed a one-row window
    let start = (selected + padding).saturating_sub(visible).min(selected);
    let end = (start + visible).min(match_count);
    VerticalWindow {
        start,
        end,
        capacity,
    }
}

/// Columns reserved around a row's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutLayout {
    /// Columns unavailable to row text (gutter arrow, ellipsis markers, slack).
    pub gutter: u16,
    /// Distance from the right edge at which the anchor is placed.
    pub right_margin: u16,
}

impl Default for CutLayout {
    fn default() -> Self {
        Self {
            gutter: 9,
            right_margin: 12,
        }
    }
}

/// Horizontal cut of one row: `text[start..end]` is shown, with markers on cut sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCut {
    pub start: usize,
    pub end: usize,
    pub lead_marker: bool,
    pub tail_marker: bool,
}

impl LineCut {
    pub fn compute(
        text: &[char],
        anchor: Option<TextPos>,
        scroll: i32,
        columns: u16,
        layout: CutLayout,
    ) -> Self {
        let len = text.len();
        let max_len = usize::from(columns.saturating_sub(layout.gutter));

        // shift so the anchor lands at the margin
        let mut start = 0usize;
        if let Some(anchor) = anchor {
            let margin = i64::from(columns) - i64::from(layout.right_margin);
            let lead = chars_width(&text[..anchor.get().min(len)]) as i64;
            let overflow = lead - margin;
            if overflow > 0 {
                let mut cut = 0i64;
                while cut < overflow && start < len {
                    cut += char_width(text[start]) as i64;
                    start += 1;
                }
            }
        }

        let shifted = start as i64 + i64::from(scroll);
        start = shifted.clamp(0, len as i64) as usize;

        // never cut more than needed to show the tail
        start = start.min(first_fitting_start(text, max_len));

        let mut end = start;
        let mut used = 0usize;
        while end < len {
            let w = char_width(text[end]);
            if used + w > max_len {
                break;
            }
            used += w;
            end += 1;
        }

        Self {
            start,
            end,
            lead_marker: start > 0,
            tail_marker: end < len,
        }
    }

    /// Display text of the cut, markers included.
    pub fn render(&self, text: &[char]) -> String {
        let mut out = String::with_capacity(self.end - self.start + 2 * ELLIPSIS.len());
        if self.lead_marker {
            out.push_str(ELLIPSIS);
        }
        out.extend(&text[self.start..self.end]);
        if self.tail_marker {
            out.push_str(ELLIPSIS);
        }
        out
    }

    /// Where `pos` lands in the rendered cut; `None` when it was cut away.
    pub fn to_cut(&self, pos: TextPos) -> Option<CutPos> {
        let p = pos.get();
        if p < self.start || p >= self.end {
            return None;
        }
        let lead = if self.lead_marker {
            ELLIPSIS.chars().count()
        } else {
            0
        };
        Some(CutPos(p - self.start + lead))
    }
}

/// Smallest start index whose tail fits in `max_len` columns.
fn first_fitting_start(text: &[char], max_len: usize) -> usize {
    let mut used = 0usize;
    let mut start = text.len();
    while start > 0 {
        let w = char_width(text[start - 1]);
        if used + w > max_len {
            break;
        }
        used += w;
        start -= 1;
    }
    start
}
