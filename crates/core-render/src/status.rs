//! Status line composition.
//!
//! Two stages, as with any line we draw from parts:
//! 1. [`compose_status`] produces ordered [`StatusSegment`]s from plain state.
//! 2. [`format_status`] renders them with colours, truncated to a column budget.
//!
//! Truncation happens on segment text before colouring, so a cut can never split an escape
//! sequence or leave a colour open.
//!
//! Layout: `  <matched>/<total> <mode> mode ctrl-s ctrl-e [<scroll>]`

use crate::style::Palette;
use core_filter::MatchMode;
use core_text::char_width;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusContext {
    pub matched: usize,
    pub total: usize,
    pub mode: MatchMode,
    pub keep_right: bool,
    pub scroll: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment {
    Count { matched: usize, total: usize },
    Mode(MatchMode),
    /// `ctrl-s` legend; lit when a non-default mode is active.
    ModeHint { lit: bool },
    /// `ctrl-e` legend; lit while keep-right is on.
    KeepRightHint { lit: bool },
    Scroll(i32),
}

impl StatusSegment {
    pub fn text(&self) -> String {
        match self {
            StatusSegment::Count { matched, total } => format!("  {matched}/{total}"),
            StatusSegment::Mode(mode) => format!(" {mode} mode"),
            StatusSegment::ModeHint { .. } => " ctrl-s".to_string(),
            StatusSegment::KeepRightHint { .. } => " ctrl-e".to_string(),
            StatusSegment::Scroll(n) if *n > 0 => format!(" [+{n}]"),
            StatusSegment::Scroll(n) => format!(" [{n}]"),
        }
    }

    fn color(&self, palette: &Palette) -> Color {
        match self {
            StatusSegment::Count { .. } => palette.count,
            StatusSegment::Mode(_) => palette.mode,
            StatusSegment::ModeHint { lit } | StatusSegment::KeepRightHint { lit } => {
                if *lit {
                    palette.hint_on
                } else {
                    palette.hint_off
                }
            }
            StatusSegment::Scroll(_) => palette.scroll,
        }
    }
}

pub fn compose_status(ctx: &StatusContext) -> Vec<StatusSegment> {
    vec![
        StatusSegment::Count {
            matched: ctx.matched,
            total: ctx.total,
        },
        StatusSegment::Mode(ctx.mode),
        StatusSegment::ModeHint {
            lit: ctx.mode != MatchMode::default(),
        },
        StatusSegment::KeepRightHint {
            lit: ctx.keep_right,
        },
        StatusSegment::Scroll(ctx.scroll),
    ]
}

/// Render `segments` within `max_width` columns.
pub fn format_status(segments: &[StatusSegment], palette: &Palette, max_width: usize) -> String {
    let mut out = String::with_capacity(64);
    let mut used = 0usize;
    for seg in segments {
        let text = seg.text();
        let mut fitted = String::with_capacity(text.len());
        for c in text.chars() {
            let w = char_width(c);
            if used + w > max_width {
                break;
            }
            used += w;
            fitted.push(c);
        }
        let truncated = fitted.len() < text.len();
        // leading spaces stay uncoloured
        let body = fitted.trim_start_matches(' ');
        out.push_str(&fitted[..fitted.len() - body.len()]);
        out.push_str(&palette.fg(body, seg.color(palette)));
        if truncated {
            break;
        }
    }
    out
}
