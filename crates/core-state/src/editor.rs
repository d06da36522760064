//! Single-line query editor.
//!
//! The cursor is a `char` index in `0..=len`. Every mutating operation reports whether the
//! buffer text changed so the caller knows whether a recompute is due; pure cursor motions
//! never change text.

use core_text::{byte_to_char, char_to_byte};
use regex::Regex;
use std::sync::LazyLock;

// last word (and any trailing whitespace) before the cursor
static LAST_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+\s*$").expect("valid regex"));
// first word (and any trailing whitespace) after the cursor
static FIRST_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+\s*").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEditor {
    buffer: String,
    cursor: usize,
}

impl QueryEditor {
    /// Editor holding `query` with the cursor at its end.
    pub fn new(query: impl Into<String>) -> Self {
        let buffer = query.into();
        let cursor = buffer.chars().count();
        Self { buffer, cursor }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.len()
    }

    /// Text left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.cursor_byte()]
    }

    fn cursor_byte(&self) -> usize {
        char_to_byte(&self.buffer, self.cursor)
    }

    /// Insert `c` at the cursor, uppercased when `shift` is held.
    pub fn insert_char(&mut self, c: char, shift: bool) -> bool {
        let at = self.cursor_byte();
        if shift {
            let upper: String = c.to_uppercase().collect();
            self.cursor += upper.chars().count();
            self.buffer.insert_str(at, &upper);
        } else {
            self.buffer.insert(at, c);
            self.cursor += 1;
        }
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.cursor_byte();
        self.buffer.remove(at);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        false
    }

    pub fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor += 1;
        false
    }

    pub fn home(&mut self) -> bool {
        self.cursor = 0;
        false
    }

    pub fn end(&mut self) -> bool {
        self.cursor = self.len();
        false
    }

    /// Start of the word left of the cursor (trailing whitespace belongs to that word).
    fn word_back_target(&self) -> usize {
        let before = self.before_cursor();
        match LAST_WORD.find(before) {
            Some(m) if m.start() > 0 => byte_to_char(before, m.start()),
            _ => 0,
        }
    }

    pub fn jump_word_back(&mut self) -> bool {
        self.cursor = self.word_back_target();
        false
    }

    /// Past the word right of the cursor and its trailing whitespace. When the text after the
    /// cursor does not start with a word the cursor goes to the end.
    pub fn jump_word_forward(&mut self) -> bool {
        let at = self.cursor_byte();
        let after = &self.buffer[at..];
        self.cursor = match FIRST_WORD.find(after) {
            Some(m) => self.cursor + after[..m.end()].chars().count(),
            None => self.len(),
        };
        false
    }

    pub fn delete_word_back(&mut self) -> bool {
        let target = self.word_back_target();
        if target == self.cursor {
            return false;
        }
        let from = char_to_byte(&self.buffer, target);
        let to = self.cursor_byte();
        self.buffer.replace_range(from..to, "");
        self.cursor = target;
        true
    }
}
