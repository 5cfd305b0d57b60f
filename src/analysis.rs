//! Dialogue inspection helpers, used both by the extraction passes and by
//! downstream analysis code in combination with the loaded metadata.

use std::collections::BTreeSet;

use crate::accessor::CorpusMetadata;
use crate::corpus::turns;
use crate::errors::*;
use crate::models::{Dialogue, NO_ACTIVE_INTENT};
use crate::utils::IntentName;

/// Intents activated in user frames over the whole dialogue. The sentinel
/// "no active intent" value is skipped unless `exclude_none` is false.
pub fn dialogue_intents(dialogue: &Dialogue, exclude_none: bool) -> Result<BTreeSet<IntentName>> {
    let mut intents = BTreeSet::new();
    for turn in turns(dialogue, true, false)? {
        for frame in &turn.frames {
            if let Some(state) = &frame.state {
                if exclude_none && state.active_intent == NO_ACTIVE_INTENT {
                    continue;
                }
                intents.insert(state.active_intent.clone());
            }
        }
    }
    Ok(intents)
}

/// True iff the user requests information from the system at some point.
pub fn has_requestables(dialogue: &Dialogue) -> Result<bool> {
    for turn in turns(dialogue, true, false)? {
        for frame in &turn.frames {
            if let Some(state) = &frame.state {
                if !state.requested_slots.is_empty() {
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

/// True iff the system offers some entity in the dialogue, based on whether
/// the dialogue contains at least one search intent.
pub fn offers_entities(dialogue: &Dialogue, metadata: &CorpusMetadata) -> Result<bool> {
    let intents = dialogue_intents(dialogue, true)?;
    Ok(intents
        .iter()
        .any(|intent| metadata.search_intents.contains(intent)))
}

#[cfg(test)]
mod tests {
    use maplit::btreeset;

    use super::*;
    use crate::corpus::Split;
    use crate::testutils::test_corpus;

    #[test]
    fn test_dialogue_intents() {
        // Given
        let corpus = test_corpus();
        let (_, dialogue) = corpus
            .dialogues(Split::Train)
            .unwrap()
            .map(|entry| entry.unwrap())
            .find(|(_, dialogue)| dialogue.dialogue_id == "1_00002")
            .unwrap();

        // When
        let intents = dialogue_intents(&dialogue, true).unwrap();

        // Then
        assert_eq!(
            intents,
            btreeset! {"FindRestaurants".to_string(), "ReserveRestaurant".to_string()}
        );
    }

    #[test]
    fn test_has_requestables() {
        // Given
        let corpus = test_corpus();
        let dialogues: Vec<_> = corpus
            .dialogues(Split::Train)
            .unwrap()
            .map(|entry| entry.unwrap().1)
            .collect();

        // When/Then
        let requesting = dialogues
            .iter()
            .find(|d| d.dialogue_id == "1_00001")
            .unwrap();
        let silent = dialogues
            .iter()
            .find(|d| d.dialogue_id == "1_00000")
            .unwrap();
        assert!(has_requestables(requesting).unwrap());
        assert!(!has_requestables(silent).unwrap());
    }
}
