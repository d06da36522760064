//! Single-token matching against one candidate text.
//!
//! Comparison is case-insensitive per `char` (full Unicode lowercase mapping on both sides), so
//! every reported position is a `char` index into the text exactly as given; no lowercased copy
//! of the text with shifted indices is ever produced.

use crate::MatchMode;
use core_text::TextPos;

/// Whitespace-delimited query tokens, in order. Empty or blank queries yield no tokens.
pub fn tokenize(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

#[inline]
fn fold_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Positions in `text` matched by `token`, or `None` when `token` does not match.
///
/// An empty token matches everything with zero positions. On a match the result always holds
/// exactly one position per `char` of `token`, strictly increasing.
pub fn match_token(mode: MatchMode, token: &str, text: &str) -> Option<Vec<TextPos>> {
    if token.is_empty() {
        return Some(Vec::new());
    }
    match mode {
        MatchMode::Fuzzy => fuzzy_positions(token, text),
        MatchMode::Normal => substring_positions(token, text),
    }
}

fn fuzzy_positions(token: &str, text: &str) -> Option<Vec<TextPos>> {
    let mut positions = Vec::with_capacity(token.len());
    let mut cursor = text.chars().enumerate();
    'token: for wanted in token.chars() {
        for (idx, c) in cursor.by_ref() {
            if fold_eq(wanted, c) {
                positions.push(TextPos(idx));
                continue 'token;
            }
        }
        return None;
    }
    Some(positions)
}

fn substring_positions(token: &str, text: &str) -> Option<Vec<TextPos>> {
    let needle: Vec<char> = token.chars().collect();
    let hay: Vec<char> = text.chars().collect();
    if needle.len() > hay.len() {
        return None;
    }
    let start = (0..=hay.len() - needle.len()).find(|&start| {
        needle
            .iter()
            .zip(&hay[start..])
            .all(|(&n, &h)| fold_eq(n, h))
    })?;
    Some((start..start + needle.len()).map(TextPos).collect())
}
