use std::collections::{BTreeMap, BTreeSet};

use crate::corpus::{turns, Corpus, Split};
use crate::errors::*;
use crate::extraction::classification::filter_by_intent_type;
use crate::extraction::intents::IntentTaxonomy;
use crate::utils::{DialogueId, IntentName, ServiceName, SlotName, UnionMerge};

pub type EntitySlotMap = BTreeMap<ServiceName, BTreeMap<IntentName, BTreeSet<SlotName>>>;

/// Finds, for one split, the slots the system always mentions after a
/// successful call to a search intent ("entity" slots).
///
/// Only dialogues containing at least one search intent qualify, whether
/// search-only or mixed. For every qualifying system frame the mentioned
/// slot names are intersected into the running per-(service, intent) set,
/// which the first occurrence seeds; the set only shrinks afterwards.
pub fn entity_slots(
    corpus: &Corpus,
    split: Split,
    taxonomy: &IntentTaxonomy,
) -> Result<EntitySlotMap> {
    // mixed-intent dialogues plus search-only dialogues
    let mut filtered = filter_by_intent_type(corpus, split, true, true)?;
    filtered.union_merge(filter_by_intent_type(corpus, split, false, true)?);

    let mut entity_slots_map = EntitySlotMap::new();
    let ids: BTreeSet<DialogueId> = filtered.into_iter().flat_map(|(_, ids)| ids).collect();
    for entry in corpus.dialogues_restricted(split, &ids)? {
        let (_, dialogue) = entry?;
        for turn in turns(&dialogue, false, true)? {
            if turn.frames.len() != 1 {
                return Err(SgdError::InvalidFrame {
                    dialogue_id: dialogue.dialogue_id.clone(),
                    n_frames: turn.frames.len(),
                }
                .into());
            }
            let frame = &turn.frames[0];
            let call = match &frame.service_call {
                Some(call) => call,
                None => continue,
            };
            if !taxonomy.search.contains(&call.method) || !frame.has_service_results() {
                continue;
            }
            let mentioned: BTreeSet<SlotName> = frame
                .slots
                .iter()
                .map(|mention| mention.slot.clone())
                .collect();
            let intents = entity_slots_map
                .entry(frame.service.clone())
                .or_insert_with(BTreeMap::new);
            match intents.get_mut(&call.method) {
                Some(running) => {
                    *running = running.intersection(&mentioned).cloned().collect();
                }
                None => {
                    intents.insert(call.method.clone(), mentioned);
                }
            }
        }
    }
    Ok(entity_slots_map)
}

/// Corpus-wide entity slots: per-split maps merged by set union.
pub fn entity_slots_map(corpus: &Corpus, taxonomy: &IntentTaxonomy) -> Result<EntitySlotMap> {
    let mut merged = EntitySlotMap::new();
    for split in &Split::all() {
        merged.union_merge(entity_slots(corpus, *split, taxonomy)?);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use maplit::btreeset;

    use super::*;
    use crate::extraction::intents::intents_by_type;
    use crate::testutils::test_corpus;

    #[test]
    fn test_entity_slots_shrink_by_intersection() {
        // Given
        let corpus = test_corpus();
        let taxonomy = intents_by_type(&corpus).unwrap();

        // When
        let per_split = entity_slots(&corpus, Split::Train, &taxonomy).unwrap();

        // Then: 1_00001 mentions {restaurant_name, city} then
        // {restaurant_name}; 1_00002 mentions {restaurant_name, city}
        assert_eq!(
            per_split["Restaurants_1"]["FindRestaurants"],
            btreeset! {"restaurant_name".to_string()}
        );
    }

    #[test]
    fn test_entity_slots_merged_across_splits() {
        // Given
        let corpus = test_corpus();
        let taxonomy = intents_by_type(&corpus).unwrap();

        // When
        let merged = entity_slots_map(&corpus, &taxonomy).unwrap();

        // Then: Music_1 appears in train and test; the per-split sets are
        // unioned
        assert_eq!(
            merged["Music_1"]["LookupMusic"],
            btreeset! {"track".to_string(), "genre".to_string()}
        );
        assert_eq!(
            merged["Homes_1"]["FindHomeByArea"],
            btreeset! {"area".to_string()}
        );
    }

    #[test]
    fn test_entity_slots_are_subset_of_every_qualifying_frame() {
        // Given
        let corpus = test_corpus();
        let taxonomy = intents_by_type(&corpus).unwrap();

        // When/Then: the intersection is computed per split, so the
        // subset property holds against each split's own result
        for split in &Split::all() {
            let per_split = entity_slots(&corpus, *split, &taxonomy).unwrap();
            for entry in corpus.dialogues(*split).unwrap() {
                let (_, dialogue) = entry.unwrap();
                for turn in turns(&dialogue, false, true).unwrap() {
                    let frame = &turn.frames[0];
                    if let Some(call) = &frame.service_call {
                        if taxonomy.search.contains(&call.method) && frame.has_service_results() {
                            let mentioned: BTreeSet<SlotName> =
                                frame.slots.iter().map(|m| m.slot.clone()).collect();
                            let expected = per_split
                                .get(&frame.service)
                                .and_then(|intents| intents.get(&call.method))
                                .unwrap();
                            assert!(expected.is_subset(&mentioned));
                        }
                    }
                }
            }
        }
    }
}
