//! Insertion-ordered counting with stable top-N ranking.

use std::collections::BTreeMap;

/// Counts keys, remembering the order in which they were first seen.
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    index: BTreeMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Ord + Clone> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self {
            index: BTreeMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Ord + Clone> OrderedCounter<K> {
    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<(K, usize)> {
        self.entries
    }

    /// Highest counts first; equal counts keep first-seen order.
    pub fn top(self, n: usize) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

impl<K: Ord + Clone> FromIterator<K> for OrderedCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::default();
        for key in iter {
            counter.add(key);
        }
        counter
    }
}
