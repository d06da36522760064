//! Whitespace normalization of candidate text.
//!
//! Every run of whitespace (spaces, tabs, any Unicode white space) becomes exactly one ASCII
//! space. Leading and trailing runs are collapsed too, not removed, so a line that starts with
//! indentation still starts with a single space. Match positions always index into this form.

use std::borrow::Cow;

pub fn normalize_whitespace(text: &str) -> Cow<'_, str> {
    if !needs_normalizing(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    Cow::Owned(out)
}

fn needs_normalizing(text: &str) -> bool {
    let mut prev_ws = false;
    for c in text.chars() {
        let ws = c.is_whitespace();
        if ws && (prev_ws || c != ' ') {
            return true;
        }
        prev_ws = ws;
    }
    false
}
