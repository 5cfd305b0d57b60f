use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::analysis::dialogue_intents;
use crate::corpus::{turns, Corpus, Split};
use crate::errors::*;
use crate::extraction::intents::IntentTaxonomy;
use crate::models::NO_ACTIVE_INTENT;
use crate::utils::{sorted_by_dial_key, DialogueId};

/// Dialogue IDs of one split, bucketed by dialogue type. Lists are sorted
/// by the numeric `(file, index)` key, not lexicographically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueTypeBuckets {
    pub transactional: Vec<DialogueId>,
    pub search: Vec<DialogueId>,
    pub mixed_intent: Vec<DialogueId>,
}

/// Labels every dialogue of every split as transactional-only, search-only
/// or mixed-intent. A dialogue that never activates an intent lands in the
/// mixed-intent bucket.
pub fn dialogues_by_type(
    corpus: &Corpus,
    taxonomy: &IntentTaxonomy,
) -> Result<BTreeMap<String, DialogueTypeBuckets>> {
    let mut by_split = BTreeMap::new();
    for split in &Split::all() {
        let mut buckets = DialogueTypeBuckets::default();
        for entry in corpus.dialogues(*split)? {
            let (_, dialogue) = entry?;
            let mut transactional = false;
            let mut search = false;
            'scan: for turn in turns(&dialogue, true, false)? {
                for frame in &turn.frames {
                    if let Some(state) = &frame.state {
                        if state.active_intent == NO_ACTIVE_INTENT {
                            continue;
                        }
                        if taxonomy.is_transactional(&state.active_intent) {
                            transactional = true;
                        } else {
                            search = true;
                        }
                    }
                }
                if transactional && search {
                    break 'scan;
                }
            }
            let bucket = if transactional && !search {
                &mut buckets.transactional
            } else if search && !transactional {
                &mut buckets.search
            } else {
                &mut buckets.mixed_intent
            };
            bucket.push(dialogue.dialogue_id);
        }
        buckets.transactional = sorted_by_dial_key(buckets.transactional);
        buckets.search = sorted_by_dial_key(buckets.search);
        buckets.mixed_intent = sorted_by_dial_key(buckets.mixed_intent);
        by_split.insert(split.to_string(), buckets);
    }
    Ok(by_split)
}

/// Returns, per backing file, the dialogues whose whole intent set matches
/// the requested taxonomy group(s). With both flags set the result is the
/// genuinely mixed dialogues: those whose intent set is a subset of neither
/// group alone.
pub fn filter_by_intent_type(
    corpus: &Corpus,
    split: Split,
    include_transactional: bool,
    include_search: bool,
) -> Result<BTreeMap<PathBuf, BTreeSet<DialogueId>>> {
    if !include_transactional && !include_search {
        return Err(SgdError::InvalidArgument(
            "at least one intent type must be specified".to_string(),
        )
        .into());
    }

    let taxonomy = crate::extraction::intents::intents_by_type(corpus)?;
    let mut dialogue_ids: BTreeMap<PathBuf, BTreeSet<DialogueId>> = BTreeMap::new();
    for entry in corpus.dialogues(split)? {
        let (path, dialogue) = entry?;
        let intents = dialogue_intents(&dialogue, true)?;
        let transactional_subset = intents.is_subset(&taxonomy.transactional);
        let search_subset = intents.is_subset(&taxonomy.search);
        let selected = if include_transactional && !include_search {
            transactional_subset
        } else if include_search && !include_transactional {
            search_subset
        } else {
            !transactional_subset && !search_subset
        };
        if selected {
            dialogue_ids
                .entry(path)
                .or_insert_with(BTreeSet::new)
                .insert(dialogue.dialogue_id);
        }
    }
    Ok(dialogue_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::intents::intents_by_type;
    use crate::testutils::test_corpus;

    #[test]
    fn test_dialogues_by_type() {
        // Given
        let corpus = test_corpus();
        let taxonomy = intents_by_type(&corpus).unwrap();

        // When
        let by_type = dialogues_by_type(&corpus, &taxonomy).unwrap();

        // Then
        assert_eq!(by_type["train"].transactional, vec!["1_00000"]);
        assert_eq!(by_type["train"].search, vec!["1_00001"]);
        assert_eq!(by_type["train"].mixed_intent, vec!["1_00002", "2_00000"]);
        // a dialogue with no active intent anywhere is mixed-intent
        assert_eq!(by_type["dev"].mixed_intent, vec!["1_00002"]);
    }

    #[test]
    fn test_filter_by_intent_type_requires_a_flag() {
        // Given
        let corpus = test_corpus();

        // When
        let result = filter_by_intent_type(&corpus, Split::Train, false, false);

        // Then
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_by_intent_type_buckets() {
        // Given
        let corpus = test_corpus();

        // When
        let transactional = filter_by_intent_type(&corpus, Split::Train, true, false).unwrap();
        let search = filter_by_intent_type(&corpus, Split::Train, false, true).unwrap();
        let mixed = filter_by_intent_type(&corpus, Split::Train, true, true).unwrap();

        // Then
        let all_ids = |result: &BTreeMap<PathBuf, BTreeSet<DialogueId>>| -> BTreeSet<DialogueId> {
            result.values().flatten().cloned().collect()
        };
        assert!(all_ids(&transactional).contains("1_00000"));
        assert!(all_ids(&search).contains("1_00001"));
        assert!(all_ids(&mixed).contains("1_00002"));
        assert!(all_ids(&mixed).contains("2_00000"));
        // mixed is not the union of the two single-group subsets
        assert!(!all_ids(&mixed).contains("1_00000"));
        assert!(!all_ids(&mixed).contains("1_00001"));
    }
}
