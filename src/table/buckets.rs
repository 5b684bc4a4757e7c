use std::collections::HashMap;

use super::config::TableError;

/// Grapheme table partitioned by key length (in chars).
///
/// `buckets[n - 1]` holds every key of length `n`. Scanners probe from the
/// longest bucket down, so the first hit is the longest match.
#[derive(Debug, Clone, Default)]
pub struct LengthBucketedTable {
    buckets: Vec<HashMap<Vec<char>, String>>,
}

impl LengthBucketedTable {
    /// Build from `(key, value)` pairs. `view` names the table in conflict errors.
    ///
    /// The same key mapped twice to the same value is accepted; two different
    /// values for one key is a `TableError::Conflict`.
    pub fn from_pairs<'a, I>(view: &'static str, pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut table = Self::default();
        for (key, value) in pairs {
            let chars: Vec<char> = key.chars().collect();
            if chars.is_empty() {
                continue;
            }
            if table.buckets.len() < chars.len() {
                table.buckets.resize_with(chars.len(), HashMap::new);
            }
            let bucket = &mut table.buckets[chars.len() - 1];
            match bucket.get(&chars) {
                Some(existing) if *existing != value => {
                    return Err(TableError::Conflict {
                        view,
                        key: key.to_string(),
                        first: existing.clone(),
                        second: value,
                    });
                }
                Some(_) => {}
                None => {
                    bucket.insert(chars, value);
                }
            }
        }
        Ok(table)
    }

    /// Length of the longest key.
    pub fn max_len(&self) -> usize {
        self.buckets.len()
    }

    /// Number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &[char]) -> Option<&str> {
        let bucket = self.buckets.get(key.len().checked_sub(1)?)?;
        bucket.get(key).map(String::as_str)
    }

    /// Longest match at the start of `window`, trying lengths from
    /// `min(max_len, window.len())` down to 1. `accept` may veto a hit, in
    /// which case shorter lengths are tried.
    pub fn longest_match<F>(&self, window: &[char], mut accept: F) -> Option<(usize, &str)>
    where
        F: FnMut(&[char], &str) -> bool,
    {
        let longest = self.max_len().min(window.len());
        (1..=longest).rev().find_map(|n| {
            let key = &window[..n];
            self.get(key)
                .filter(|target| accept(key, target))
                .map(|target| (n, target))
        })
    }

    /// Entries of one bucket (1-based length), sorted by key.
    pub fn bucket_entries(&self, len: usize) -> Vec<(String, &str)> {
        let mut entries: Vec<(String, &str)> = len
            .checked_sub(1)
            .and_then(|i| self.buckets.get(i))
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(k, v)| (k.iter().collect(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort();
        entries
    }
}
