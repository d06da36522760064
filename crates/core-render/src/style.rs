//! Colour palette and highlight injection.
//!
//! All styling goes through [`Palette`]. A monochrome palette returns text untouched, so callers
//! never branch on colour support themselves. Foreground spans end with a foreground-only reset,
//! which keeps the selected row's background intact across highlighted characters.

use core_text::CutPos;
use crossterm::style::{Color, ContentStyle, StyledContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
    pub arrow: Color,
    pub selected_bg: Color,
    pub prompt: Color,
    pub mode: Color,
    pub count: Color,
    pub matched: Color,
    pub hint_off: Color,
    pub hint_on: Color,
    pub scroll: Color,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self {
            enabled: color,
            arrow: Color::AnsiValue(198),
            selected_bg: Color::AnsiValue(236),
            prompt: Color::AnsiValue(110),
            mode: Color::AnsiValue(110),
            count: Color::AnsiValue(143),
            matched: Color::AnsiValue(107),
            hint_off: Color::DarkGrey,
            hint_on: Color::Yellow,
            scroll: Color::DarkMagenta,
        }
    }

    pub fn monochrome() -> Self {
        Self::new(false)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn fg(&self, text: &str, color: Color) -> String {
        self.styled(text, Some(color), None)
    }

    pub fn bg(&self, text: &str, color: Color) -> String {
        self.styled(text, None, Some(color))
    }

    fn styled(&self, text: &str, fg: Option<Color>, bg: Option<Color>) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        let mut style = ContentStyle::new();
        style.foreground_color = fg;
        style.background_color = bg;
        StyledContent::new(style, text).to_string()
    }

    /// Colour the characters of `cut` at `positions`.
    ///
    /// Byte offsets are resolved against the unmodified text first, then markers are inserted
    /// from the last position to the first so earlier offsets stay valid.
    pub fn highlight(&self, cut: &str, positions: &[CutPos]) -> String {
        if !self.enabled || positions.is_empty() {
            return cut.to_string();
        }
        let mut spans: Vec<(usize, usize)> = positions
            .iter()
            .filter_map(|p| {
                let start = p.to_byte(cut)?;
                let ch = cut[start..].chars().next()?;
                Some((start, start + ch.len_utf8()))
            })
            .collect();
        spans.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        spans.dedup();

        let mut out = cut.to_string();
        for (start, end) in spans {
            let painted = self.fg(&out[start..end], self.matched);
            out.replace_range(start..end, &painted);
        }
        out
    }

    /// Gutter, prefix, text and suffix of one match row. Only the text takes the selection
    /// background; hook output is drawn as given.
    pub fn row(&self, prefix: &str, text: &str, suffix: &str, selected: bool) -> String {
        if selected {
            let arrow = self.styled("> ", Some(self.arrow), Some(self.selected_bg));
            format!("{arrow}{prefix}{}{suffix}", self.bg(text, self.selected_bg))
        } else {
            format!("{} {prefix}{text}{suffix}", self.bg(" ", self.selected_bg))
        }
    }
}
