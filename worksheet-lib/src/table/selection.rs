//! Key-based row selection state.
//!
//! Selection tracks row identity keys rather than positions, so it stays
//! stable when the view is re-sorted, re-filtered or re-fetched.

use std::collections::HashSet;

use super::identity::RowKey;

/// Selected row keys.
///
/// The set itself does not know which keys are still current; the
/// controller resolves it against the live record set before reporting.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<RowKey>,
}

/// How a set of visible keys relates to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// No visible key is selected (or nothing is visible).
    Nothing,
    /// Some, but not all, visible keys are selected.
    Partial,
    /// Every visible key is selected and at least one is visible.
    All,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    /// Get the number of selected keys, stale ones included.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate over the raw selected keys.
    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selected.iter()
    }

    /// Add or remove one key. Returns `true` if the set changed.
    pub fn set(&mut self, key: RowKey, selected: bool) -> bool {
        if selected {
            self.selected.insert(key)
        } else {
            self.selected.remove(&key)
        }
    }

    /// Replace the selection with exactly the given keys.
    pub fn replace<I: IntoIterator<Item = RowKey>>(&mut self, keys: I) {
        self.selected.clear();
        self.selected.extend(keys);
    }

    /// Clear all selection. Returns the number of keys removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.selected.len();
        self.selected.clear();
        removed
    }

    /// Classify how much of `visible` is selected.
    pub fn coverage<'a, I>(&self, visible: I) -> Coverage
    where
        I: IntoIterator<Item = &'a RowKey>,
    {
        let mut total = 0usize;
        let mut hits = 0usize;
        for key in visible {
            total += 1;
            if self.selected.contains(key) {
                hits += 1;
            }
        }
        match hits {
            0 => Coverage::Nothing,
            h if h == total => Coverage::All,
            _ => Coverage::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ids: &[i64]) -> Vec<RowKey> {
        ids.iter().map(|&i| RowKey::Number(i)).collect()
    }

    #[test]
    fn test_set_reports_change() {
        let mut sel = Selection::new();
        assert!(sel.set(RowKey::Number(1), true));
        assert!(!sel.set(RowKey::Number(1), true));
        assert!(sel.set(RowKey::Number(1), false));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_coverage() {
        let mut sel = Selection::new();
        let visible = keys(&[1, 2, 3]);
        assert_eq!(sel.coverage(&visible), Coverage::Nothing);

        sel.set(RowKey::Number(2), true);
        assert_eq!(sel.coverage(&visible), Coverage::Partial);

        sel.replace(visible.clone());
        assert_eq!(sel.coverage(&visible), Coverage::All);
    }

    #[test]
    fn test_coverage_empty_view_is_none() {
        let mut sel = Selection::new();
        sel.set(RowKey::Number(9), true);
        assert_eq!(sel.coverage(&Vec::<RowKey>::new()), Coverage::Nothing);
    }
}
