use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

pub type IntentName = String;
pub type SlotName = String;
pub type ServiceName = String;
pub type DialogueId = String;

/// Number of characters of a name that participate in alphabetical sorting.
/// Matches the shortened-prefix key used when the corpus metadata was first
/// published, so regenerated reports stay diff-stable against old ones.
const SORT_PREFIX_LEN: usize = 10;

pub fn alphabetical_sort_key(name: &str) -> &str {
    let end = name
        .char_indices()
        .nth(SORT_PREFIX_LEN)
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| name.len());
    &name[..end]
}

/// Numeric key for composite dialogue IDs of the form `"<file>_<index>"`.
/// IDs that do not match the expected shape sort first.
pub fn dial_sort_key(dialogue_id: &str) -> (u64, u64) {
    let mut components = dialogue_id.splitn(2, '_');
    let file = components
        .next()
        .and_then(|c| c.parse::<u64>().ok())
        .unwrap_or(0);
    let index = components
        .next()
        .and_then(|c| c.parse::<u64>().ok())
        .unwrap_or(0);
    (file, index)
}

/// Numeric key for dialogue bundle filenames (`dialogues_012.json` -> 12).
pub fn dial_files_sort_key(name: &str) -> u64 {
    name.rsplit('_')
        .next()
        .map(|suffix| suffix.trim_end_matches(".json"))
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Full alphabetical order first, then a stable pass on the shortened
/// prefix, so ties on the prefix stay deterministic.
pub fn sorted_by_prefix(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values
        .into_iter()
        .sorted()
        .sorted_by(|a, b| alphabetical_sort_key(a).cmp(alphabetical_sort_key(b)))
        .collect()
}

pub fn sorted_by_dial_key(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values
        .into_iter()
        .sorted_by_key(|id| dial_sort_key(id))
        .collect()
}

/// Merge-by-union over the nested map-of-map-of-set aggregates produced by
/// the extractors. Implemented recursively so one reducer covers both the
/// flat per-service maps and the per-service/per-intent maps.
pub trait UnionMerge {
    fn union_merge(&mut self, other: Self);
}

impl UnionMerge for BTreeSet<String> {
    fn union_merge(&mut self, other: Self) {
        self.extend(other);
    }
}

impl<K: Ord, V: UnionMerge + Default> UnionMerge for BTreeMap<K, V> {
    fn union_merge(&mut self, other: Self) {
        for (key, value) in other {
            self.entry(key).or_default().union_merge(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use maplit::{btreemap, btreeset};

    use super::*;

    #[test]
    fn test_dial_sort_key_is_numeric() {
        // Given
        let mut ids = vec!["10_00002".to_string(), "2_00001".to_string(), "2_00000".to_string()];

        // When
        ids.sort_by_key(|id| dial_sort_key(id));

        // Then
        assert_eq!(ids, vec!["2_00000", "2_00001", "10_00002"]);
    }

    #[test]
    fn test_dial_files_sort_key() {
        // Given
        let mut files = vec!["dialogues_010.json", "dialogues_002.json"];

        // When
        files.sort_by_key(|name| dial_files_sort_key(name));

        // Then
        assert_eq!(files, vec!["dialogues_002.json", "dialogues_010.json"]);
    }

    #[test]
    fn test_union_merge_nested() {
        // Given
        let mut acc = btreemap! {
            "Restaurants_1".to_string() => btreemap! {
                "FindRestaurants".to_string() => btreeset!{"city".to_string()},
            },
        };
        let other = btreemap! {
            "Restaurants_1".to_string() => btreemap! {
                "FindRestaurants".to_string() => btreeset!{"cuisine".to_string()},
            },
            "Music_1".to_string() => btreemap! {
                "LookupMusic".to_string() => btreeset!{"genre".to_string()},
            },
        };

        // When
        acc.union_merge(other);

        // Then
        assert_eq!(
            acc["Restaurants_1"]["FindRestaurants"],
            btreeset! {"city".to_string(), "cuisine".to_string()}
        );
        assert_eq!(
            acc["Music_1"]["LookupMusic"],
            btreeset! {"genre".to_string()}
        );
    }
}
