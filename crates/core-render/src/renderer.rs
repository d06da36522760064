//! Inline band renderer.
//!
//! The band is drawn below the shell prompt, never in an alternate screen:
//!
//! ```text
//! <label lines...><query>       <- prompt row (cursor parks here)
//!   <matched>/<total> ...       <- status (omitted in prompt-only sessions)
//! > <selected row>
//!   <row>
//! ```
//!
//! Every paint is a full redraw. The renderer remembers how many lines it drew last time
//! (`extent`) and which of them holds the query (`prompt_row`), so the next paint or an erase can
//! walk back to the top of the band with relative moves only.

use crate::status::{StatusContext, compose_status, format_status};
use crate::style::Palette;
use crate::viewport::{CutLayout, LineCut};
use crate::writer::Writer;
use anyhow::Result;
use core_text::{CutPos, TextPos, display_width};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::trace;

/// Columns the status line leaves free at the right edge.
const STATUS_SLACK: u16 = 4;

#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    pub text: &'a str,
    pub positions: &'a BTreeSet<TextPos>,
    pub anchor: Option<TextPos>,
    pub selected: bool,
    /// Hook output drawn between the gutter and the text.
    pub prefix: &'a str,
    /// Hook output drawn after the text.
    pub suffix: &'a str,
}

impl<'a> RowView<'a> {
    pub fn new(
        text: &'a str,
        positions: &'a BTreeSet<TextPos>,
        anchor: Option<TextPos>,
        selected: bool,
    ) -> Self {
        Self {
            text,
            positions,
            anchor,
            selected,
            prefix: "",
            suffix: "",
        }
    }

    pub fn decorated(self, prefix: &'a str, suffix: &'a str) -> Self {
        Self {
            prefix,
            suffix,
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub columns: u16,
    pub label: &'a str,
    pub query: &'a str,
    /// Query cursor as a char index.
    pub cursor: usize,
    /// `None` draws the prompt only.
    pub status: Option<StatusContext>,
    pub rows: Vec<RowView<'a>>,
    pub keep_right: bool,
    pub scroll: i32,
}

#[derive(Debug)]
pub struct Renderer {
    palette: Palette,
    layout: CutLayout,
    extent: u16,
    prompt_row: u16,
}

impl Renderer {
    pub fn new(palette: Palette, layout: CutLayout) -> Self {
        Self {
            palette,
            layout,
            extent: 0,
            prompt_row: 0,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Lines drawn by the last paint; 0 after an erase.
    pub fn extent(&self) -> u16 {
        self.extent
    }

    /// Lines of `frame`, top to bottom, without cursor movement.
    pub fn compose(&self, frame: &Frame<'_>) -> Vec<String> {
        let mut lines: Vec<String> = frame
            .label
            .split('\n')
            .map(|line| self.label_line(line))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.push_str(frame.query);
        }

        if let Some(ctx) = &frame.status {
            let budget = usize::from(frame.columns.saturating_sub(STATUS_SLACK));
            lines.push(format_status(&compose_status(ctx), &self.palette, budget));
        }

        lines.extend(
            frame
                .rows
                .iter()
                .map(|row| self.render_row(row, frame.columns, frame.scroll, frame.keep_right)),
        );
        lines
    }

    /// One match row: horizontal cut, match highlights, then the gutter and hook output.
    ///
    /// Hook output is never cut; its width comes out of the columns left for the text.
    pub fn render_row(&self, row: &RowView<'_>, columns: u16, scroll: i32, keep_right: bool) -> String {
        let chars: Vec<char> = row.text.chars().collect();
        let anchor = if keep_right {
            chars.len().checked_sub(1).map(TextPos)
        } else {
            row.anchor
        };
        let decor = display_width(row.prefix) + display_width(row.suffix);
        let columns = columns.saturating_sub(u16::try_from(decor).unwrap_or(u16::MAX));
        let cut = LineCut::compute(&chars, anchor, scroll, columns, self.layout);
        let shown = cut.render(&chars);
        let marks: Vec<CutPos> = row.positions.iter().filter_map(|p| cut.to_cut(*p)).collect();
        let text = self.palette.highlight(&shown, &marks);
        self.palette.row(row.prefix, &text, row.suffix, row.selected)
    }

    fn label_line(&self, line: &str) -> String {
        // labels that carry their own escapes are drawn as given
        if line.contains('\x1b') {
            line.to_string()
        } else {
            self.palette.fg(line, self.palette.prompt)
        }
    }

    /// Redraw the band for `frame` and park the cursor in the query.
    pub fn paint<W: Write>(&mut self, frame: &Frame<'_>, out: &mut W) -> Result<()> {
        let lines = self.compose(frame);
        let mut w = Writer::new();
        self.rewind(&mut w);

        for (i, line) in lines.iter().enumerate() {
            w.clear_line();
            w.print(line.as_str());
            if i + 1 < lines.len() {
                w.new_line();
            }
        }

        let drawn = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let label_lines = u16::try_from(frame.label.split('\n').count()).unwrap_or(u16::MAX);
        let prompt_row = label_lines.saturating_sub(1);
        w.move_up(drawn.saturating_sub(1).saturating_sub(prompt_row));

        let last_label = frame.label.rsplit('\n').next().unwrap_or_default();
        let before_cursor: String = frame.query.chars().take(frame.cursor).collect();
        let col = display_width(last_label) + display_width(&before_cursor);
        w.move_to_column(u16::try_from(col).unwrap_or(u16::MAX));

        trace!(target: "render", lines = drawn, previous = self.extent, col, "paint");
        self.extent = drawn;
        self.prompt_row = prompt_row;
        w.flush(out)
    }

    /// Clear the band and leave the cursor at its top-left corner.
    pub fn erase<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut w = Writer::new();
        self.rewind(&mut w);
        trace!(target: "render", lines = self.extent, "erase");
        self.extent = 0;
        self.prompt_row = 0;
        w.flush(out)
    }

    /// Wipe the band and everything below it, then forget the band. The next paint starts from
    /// the band's top-left corner.
    pub fn reset<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut w = Writer::new();
        w.move_to_column(0);
        w.move_up(self.prompt_row);
        w.clear_below();
        trace!(target: "render", lines = self.extent, "reset");
        self.extent = 0;
        self.prompt_row = 0;
        w.flush(out)
    }

    /// Move to the top of the band and clear what was drawn there.
    fn rewind(&self, w: &mut Writer) {
        w.move_to_column(0);
        w.move_up(self.prompt_row);
        for i in 0..self.extent {
            w.clear_line();
            if i + 1 < self.extent {
                w.move_down(1);
            }
        }
        w.move_up(self.extent.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_filter::MatchMode;
    use core_text::strip_ansi;
    use pretty_assertions::assert_eq;

    fn set(ps: &[usize]) -> BTreeSet<TextPos> {
        ps.iter().copied().map(TextPos).collect()
    }

    fn status(matched: usize, total: usize) -> Option<StatusContext> {
        Some(StatusContext {
            matched,
            total,
            mode: MatchMode::Fuzzy,
            keep_right: false,
            scroll: 0,
        })
    }

    fn paint_to_string(r: &mut Renderer, frame: &Frame<'_>) -> String {
        let mut out = Vec::new();
        r.paint(frame, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn compose_lays_out_prompt_status_and_rows() {
        let r = Renderer::new(Palette::monochrome(), CutLayout::default());
        let a = set(&[0]);
        let b = set(&[]);
        let frame = Frame {
            columns: 80,
            label: "> ",
            query: "a",
            cursor: 1,
            status: status(2, 60),
            rows: vec![
                RowView::new("Apes", &a, Some(TextPos(0)), true),
                RowView::new("Bats", &b, None, false),
            ],
            keep_right: false,
            scroll: 0,
        };
        assert_eq!(
            r.compose(&frame),
            vec![
                "> a".to_string(),
                "  2/60 fuzzy mode ctrl-s ctrl-e [0]".to_string(),
                "> Apes".to_string(),
                "  Bats".to_string(),
            ]
        );
    }

    #[test]
    fn first_paint_parks_cursor_in_query() {
        let mut r = Renderer::new(Palette::monochrome(), CutLayout::default());
        let a = set(&[]);
        let frame = Frame {
            columns: 80,
            label: "> ",
            query: "ab",
            cursor: 1,
            status: status(1, 1),
            rows: vec![RowView::new("Apes", &a, None, true)],
            keep_right: false,
            scroll: 0,
        };
        let s = paint_to_string(&mut r, &frame);
        assert_eq!(
            s,
            "\x1b[1G\x1b[2K> ab\r\n\x1b[2K  1/1 fuzzy mode ctrl-s ctrl-e [0]\r\n\x1b[2K> Apes\x1b[2A\x1b[4G"
        );
        assert_eq!(r.extent(), 3);
    }

    #[test]
    fn repaint_clears_previous_extent_first() {
        let mut r = Renderer::new(Palette::monochrome(), CutLayout::default());
        let empty = set(&[]);
        let rows = vec![
            RowView::new("a", &empty, None, true),
            RowView::new("b", &empty, None, false),
        ];
        let frame = Frame {
            columns: 40,
            label: "> ",
            query: "",
            cursor: 0,
            status: status(2, 2),
            rows,
            keep_right: false,
            scroll: 0,
        };
        paint_to_string(&mut r, &frame);
        let shrunk = Frame { rows: Vec::new(), status: status(0, 2), ..frame };
        let s = paint_to_string(&mut r, &shrunk);
        // four stale lines cleared top to bottom, then back up to the top
        assert!(s.starts_with(
            "\x1b[1G\x1b[2K\x1b[1B\x1b[2K\x1b[1B\x1b[2K\x1b[1B\x1b[2K\x1b[3A"
        ));
        assert_eq!(r.extent(), 2);
    }

    #[test]
    fn erase_resets_extent() {
        let mut r = Renderer::new(Palette::monochrome(), CutLayout::default());
        let frame = Frame {
            columns: 40,
            label: "name: ",
            query: "x",
            cursor: 1,
            status: None,
            rows: Vec::new(),
            keep_right: false,
            scroll: 0,
        };
        assert_eq!(paint_to_string(&mut r, &frame), "\x1b[1G\x1b[2Kname: x\x1b[8G");
        let mut out = Vec::new();
        r.erase(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[1G\x1b[2K");
        assert_eq!(r.extent(), 0);
    }

    #[test]
    fn multi_line_label_keeps_cursor_on_last_label_line() {
        let mut r = Renderer::new(Palette::monochrome(), CutLayout::default());
        let frame = Frame {
            columns: 40,
            label: "pick one\n\x1b[1m>\x1b[0m ",
            query: "ab",
            cursor: 2,
            status: status(0, 0),
            rows: Vec::new(),
            keep_right: false,
            scroll: 0,
        };
        let s = paint_to_string(&mut r, &frame);
        // three lines drawn, prompt on line 1: one move up, column 2 + 2
        assert!(s.ends_with("\x1b[1A\x1b[5G"));

        let s = paint_to_string(&mut r, &frame);
        assert!(s.starts_with("\x1b[1G\x1b[1A\x1b[2K"));
    }

    #[test]
    fn coloured_rows_highlight_visible_matches_only() {
        let r = Renderer::new(Palette::new(true), CutLayout::default());
        let long = format!("{}X", "a".repeat(60));
        let positions = set(&[0, 60]);
        let row = RowView::new(&long, &positions, Some(TextPos(60)), false);
        let s = r.render_row(&row, 30, 0, false);
        assert_eq!(s.matches("38;5;107").count(), 1);
        let plain = strip_ansi(&s);
        assert!(plain.starts_with("  .."));
        assert!(plain.ends_with('X'));
    }

    #[test]
    fn keep_right_shows_line_end() {
        let r = Renderer::new(Palette::monochrome(), CutLayout::default());
        let text = format!("{}tail", "x".repeat(80));
        let positions = set(&[0]);
        let row = RowView::new(&text, &positions, Some(TextPos(0)), false);
        assert!(r.render_row(&row, 40, 0, true).ends_with("tail"));
        assert!(r.render_row(&row, 40, 0, false).ends_with(".."));
    }

    #[test]
    fn label_is_coloured_unless_it_brings_escapes() {
        let r = Renderer::new(Palette::new(true), CutLayout::default());
        assert!(r.label_line("> ").contains("38;5;110"));
        assert_eq!(r.label_line("\x1b[1m>\x1b[0m "), "\x1b[1m>\x1b[0m ");
    }
}
