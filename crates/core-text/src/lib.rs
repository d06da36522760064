//! Text measurement and coordinate spaces shared by the filter and the renderer.
//!
//! Three index spaces exist for a rendered match row:
//! - [`TextPos`]: `char` index into the whitespace-normalized item text. Match positions live here.
//! - [`CutPos`]: `char` index into the horizontally cut display text (including any leading
//!   `..` marker). Produced only by the renderer's line cut.
//! - byte offsets into the cut display text, used once when colour markers are injected.
//!
//! Conversions only go forward (`TextPos` -> `CutPos` -> byte) and each one lives next to the
//! code that owns the target space.

pub mod ansi;
pub mod normalize;
pub mod width;

pub use ansi::strip_ansi;
pub use normalize::normalize_whitespace;
pub use width::{char_width, chars_width, display_width, egc_width};

/// `char` index into normalized item text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPos(pub usize);

/// `char` index into cut display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutPos(pub usize);

impl TextPos {
    pub fn get(self) -> usize {
        self.0
    }
}

impl CutPos {
    pub fn get(self) -> usize {
        self.0
    }

    /// Byte offset of this position within `cut`, or `None` past the end.
    pub fn to_byte(self, cut: &str) -> Option<usize> {
        cut.char_indices().nth(self.0).map(|(b, _)| b)
    }
}

/// Byte offset of the `idx`-th char in `s`, clamped to `s.len()`.
pub fn char_to_byte(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map_or(s.len(), |(b, _)| b)
}

/// Number of chars that start before `byte`. Offsets past the end count every char.
pub fn byte_to_char(s: &str, byte: usize) -> usize {
    s.char_indices().take_while(|(b, _)| *b < byte).count()
}
