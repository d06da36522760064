use core_text::normalize_whitespace;
use std::ops::Deref;
use std::sync::Arc;

/// One candidate line. Identity is `original_index`, stable for the lifetime of its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub value: String,
    pub original_index: usize,
    /// Whitespace-normalized `value`; matching and display both use this form.
    pub normalized: String,
}

impl Item {
    pub fn new(value: impl Into<String>, original_index: usize) -> Self {
        let value = value.into();
        let normalized = normalize_whitespace(&value).into_owned();
        Self {
            value,
            original_index,
            normalized,
        }
    }

    pub fn text(&self) -> &str {
        &self.normalized
    }
}

/// Cheaply clonable source list. A replacement list is a new `SourceList`; appended items
/// continue the index sequence.
#[derive(Debug, Clone, Default)]
pub struct SourceList {
    items: Arc<Vec<Item>>,
}

impl SourceList {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<Item> = values
            .into_iter()
            .enumerate()
            .map(|(idx, v)| Item::new(v, idx))
            .collect();
        Self {
            items: Arc::new(items),
        }
    }

    pub fn from_shared(values: &[String]) -> Self {
        Self::new(values.iter().cloned())
    }

    /// Append `values` after the current items. Only the new items are normalized; storage is
    /// copied once if a clone still shares it.
    pub fn extend(&mut self, values: &[String]) {
        let items = Arc::make_mut(&mut self.items);
        let base = items.len();
        items.extend(
            values
                .iter()
                .enumerate()
                .map(|(offset, v)| Item::new(v.as_str(), base + offset)),
        );
    }

    /// Item by original index (items are stored in original order).
    pub fn get(&self, original_index: usize) -> Option<&Item> {
        self.items.get(original_index)
    }
}

impl Deref for SourceList {
    type Target = [Item];

    fn deref(&self) -> &[Item] {
        &self.items
    }
}
