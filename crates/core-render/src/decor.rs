//! Caller-supplied text drawn before and after each match row.
//!
//! Hooks are keyed by the item's original index, so a caller can attach per-item annotations
//! (icons, sizes, git status) without putting them into the searchable text. Hook output is never
//! matched against, but it does take columns away from the row's horizontal cut.

use std::fmt;
use std::sync::Arc;

/// Text for one row, from the item's original index.
pub type RowHook = Arc<dyn Fn(usize) -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct RowHooks {
    pub prefix: Option<RowHook>,
    pub suffix: Option<RowHook>,
}

impl RowHooks {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.suffix.is_none()
    }

    /// Prefix and suffix for the item at `original_index`. Missing hooks give empty strings.
    pub fn around(&self, original_index: usize) -> (String, String) {
        let call = |hook: &Option<RowHook>| hook.as_ref().map(|h| h(original_index)).unwrap_or_default();
        (call(&self.prefix), call(&self.suffix))
    }
}

impl fmt::Debug for RowHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowHooks")
            .field("prefix", &self.prefix.is_some())
            .field("suffix", &self.suffix.is_some())
            .finish()
    }
}
