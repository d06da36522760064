//! Cumulative multi-token filtering and the sorted result set.

use crate::{Item, MatchMode, SourceList, match_token, tokenize};
use core_text::TextPos;
use std::collections::BTreeSet;

/// One item that matched one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord<'a> {
    pub item: &'a Item,
    pub positions: Vec<TextPos>,
}

/// An item that survived every token so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survivor<'a> {
    pub item: &'a Item,
    /// Union of all tokens' positions.
    pub positions: BTreeSet<TextPos>,
    /// Right-most position matched by the most recent token.
    pub anchor: Option<TextPos>,
}

/// Items whose normalized text matches `token`, in input order, with their positions.
pub fn filter_list<'a, I>(mode: MatchMode, token: &str, items: I) -> Vec<MatchRecord<'a>>
where
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .filter_map(|item| {
            match_token(mode, token, item.text()).map(|positions| MatchRecord { item, positions })
        })
        .collect()
}

/// Apply `tokens` left to right, each one filtering the survivors of the previous one.
/// No tokens means every item survives with no positions.
pub fn filter_tokens<'a>(mode: MatchMode, tokens: &[&str], items: &'a [Item]) -> Vec<Survivor<'a>> {
    let mut survivors: Vec<Survivor<'a>> = items
        .iter()
        .map(|item| Survivor {
            item,
            positions: BTreeSet::new(),
            anchor: None,
        })
        .collect();

    for token in tokens {
        // records are an ordered subsequence of survivors
        let mut records = filter_list(mode, token, survivors.iter().map(|s| s.item)).into_iter();
        let mut next = records.next();
        survivors.retain_mut(|s| match next.take() {
            Some(rec) if rec.item.original_index == s.item.original_index => {
                s.anchor = rec.positions.last().copied();
                s.positions.extend(rec.positions);
                next = records.next();
                true
            }
            other => {
                next = other;
                false
            }
        });
        if survivors.is_empty() {
            break;
        }
    }
    survivors
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub original_index: usize,
    pub positions: BTreeSet<TextPos>,
    pub anchor: Option<TextPos>,
}

/// Filtered and ordered view of a source list for one query. Rebuilt wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<ResultEntry>,
    total: usize,
}

impl ResultSet {
    pub fn compute(list: &SourceList, query: &str, mode: MatchMode) -> Self {
        let tokens = tokenize(query);
        let mut survivors = filter_tokens(mode, &tokens, list);
        // stable: equal texts keep original relative order
        survivors.sort_by(|a, b| a.item.normalized.cmp(&b.item.normalized));
        let entries: Vec<ResultEntry> = survivors
            .into_iter()
            .map(|s| ResultEntry {
                original_index: s.item.original_index,
                positions: s.positions,
                anchor: s.anchor,
            })
            .collect();
        tracing::debug!(
            target: "filter",
            %mode,
            tokens = tokens.len(),
            matches = entries.len(),
            total = list.len(),
            "recompute"
        );
        Self {
            entries,
            total: list.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the source list this set was computed from.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn get(&self, rank: usize) -> Option<&ResultEntry> {
        self.entries.get(rank)
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }
}
