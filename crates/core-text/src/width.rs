//! Display width of rendered text.
//!
//! Two granularities are exposed:
//! - [`egc_width`] / [`display_width`] measure grapheme clusters and are used wherever a whole
//!   string lands on screen as-is (label, query, status line, cursor column).
//! - [`char_width`] measures one `char` and is used by the horizontal line cut, which works in
//!   `char` indices of the normalized item text.
//!
//! Escape sequences never occupy columns; [`display_width`] strips them before measuring. The
//! classifier leans toward over-estimating emoji composites: an extra blank cell is harmless,
//! an under-estimate makes the cursor drift.

use crate::ansi::strip_ansi;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Narrow,
    Wide,
    /// Pictographic cluster (single emoji, flags, keycaps, modifier and ZWJ sequences).
    Emoji,
    /// Base + combining mark(s); `true` when the base is wide.
    Combining(bool),
}

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Rough Extended Pictographic heuristic: main emoji planes plus misc symbols and dingbats.
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Narrow;
    };
    if chars.next().is_none() {
        if is_extended_pictographic(first) {
            return EgcKind::Emoji;
        }
        return match UnicodeWidthChar::width(first) {
            Some(2) => EgcKind::Wide,
            _ => EgcKind::Narrow,
        };
    }

    let mut pictographic = 0usize;
    let mut regional = 0usize;
    let mut has_zwj = false;
    let mut has_skin = false;
    let mut has_combining = false;
    let mut ends_with_keycap = false;
    let mut any_wide = false;
    let mut base_wide = false;
    let mut saw_base = false;

    for c in egc.chars() {
        if is_extended_pictographic(c) {
            pictographic += 1;
        }
        if is_regional_indicator(c) {
            regional += 1;
        }
        has_zwj |= c == ZWJ;
        has_skin |= is_skin_tone_modifier(c);
        ends_with_keycap = c == KEYCAP_COMBINING;
        let wide = UnicodeWidthChar::width(c) == Some(2);
        any_wide |= wide;
        if is_combining_mark(c) {
            has_combining = true;
        } else if !saw_base {
            saw_base = true;
            base_wide = wide || is_extended_pictographic(c);
        }
    }

    if ends_with_keycap
        || regional == 2
        || (has_zwj && pictographic >= 2)
        || (pictographic >= 1 && has_skin)
        || pictographic == 1
    {
        return EgcKind::Emoji;
    }
    if has_combining {
        return EgcKind::Combining(base_wide);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    if pictographic > 0 || regional > 0 {
        return EgcKind::Emoji;
    }
    EgcKind::Narrow
}

/// Column width of a single grapheme cluster. Empty input is zero wide.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    if egc.chars().any(|c| c.is_control()) {
        return 0;
    }
    let width = match classify(egc) {
        EgcKind::Narrow | EgcKind::Combining(false) => 1,
        EgcKind::Wide | EgcKind::Emoji | EgcKind::Combining(true) => 2,
    };
    // Lone regional indicators and other pictographic stragglers still take two cells.
    if width == 1 && egc.chars().any(|c| is_extended_pictographic(c) || is_regional_indicator(c))
    {
        return 2;
    }
    width
}

/// Column width of one `char` (controls and combining marks are zero wide).
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Rendered width of `text`: escape sequences are stripped, the remainder is measured per
/// grapheme cluster.
pub fn display_width(text: &str) -> usize {
    strip_ansi(text)
        .graphemes(true)
        .map(|g| egc_width(g) as usize)
        .sum()
}

/// Rendered width of a run of chars measured with [`char_width`].
pub fn chars_width(chars: &[char]) -> usize {
    chars.iter().map(|&c| char_width(c)).sum()
}
