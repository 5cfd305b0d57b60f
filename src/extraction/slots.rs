use std::collections::{BTreeMap, BTreeSet};

use crate::corpus::{turns, Corpus, Split};
use crate::errors::*;
use crate::models::Service;
use crate::utils::{ServiceName, SlotName, UnionMerge};

/// Binary slots of the corpus: the corpus-wide union plus the per-service
/// breakdown. Every service name is a key, with an explicit empty entry
/// when the service declares no binary slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinarySlots {
    pub all: BTreeSet<SlotName>,
    pub by_service: BTreeMap<ServiceName, BTreeSet<SlotName>>,
}

pub fn binary_slots(corpus: &Corpus) -> Result<BinarySlots> {
    let mut result = BinarySlots::default();
    for split in &Split::all() {
        for service in corpus.schemas(*split)? {
            let service_slots: BTreeSet<SlotName> = service
                .slots
                .iter()
                .filter(|slot| slot.is_binary())
                .map(|slot| slot.name.clone())
                .collect();
            result.all.extend(service_slots.iter().cloned());
            result
                .by_service
                .entry(service.service_name)
                .or_insert_with(BTreeSet::new)
                .union_merge(service_slots);
        }
    }
    Ok(result)
}

/// Categorical slots of the corpus, with the full possible-value lists per
/// service. Binary slots are excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalSlots {
    pub all: BTreeSet<SlotName>,
    pub by_service: BTreeMap<ServiceName, BTreeMap<SlotName, Vec<String>>>,
}

fn service_categorical_slots(
    service: &Service,
    binary: &BTreeSet<SlotName>,
) -> BTreeMap<SlotName, Vec<String>> {
    service
        .slots
        .iter()
        .filter(|slot| slot.is_categorical && !binary.contains(&slot.name))
        .map(|slot| (slot.name.clone(), slot.possible_values.clone()))
        .collect()
}

/// A service/slot pair recurring across splits must agree on its value
/// list; a mismatch means the corpus itself is untrustworthy and aborts
/// the run.
pub fn categorical_slots(
    corpus: &Corpus,
    binary_by_service: &BTreeMap<ServiceName, BTreeSet<SlotName>>,
) -> Result<CategoricalSlots> {
    let empty = BTreeSet::new();
    let mut result = CategoricalSlots::default();
    for split in &Split::all() {
        for service in corpus.schemas(*split)? {
            let binary = binary_by_service
                .get(&service.service_name)
                .unwrap_or(&empty);
            let service_slots = service_categorical_slots(&service, binary);
            result.all.extend(service_slots.keys().cloned());
            match result.by_service.get(&service.service_name) {
                Some(seen) => {
                    for (slot_name, values) in seen {
                        let recurring = service_slots.get(slot_name);
                        if recurring != Some(values) {
                            return Err(SgdError::CorpusInconsistency(format!(
                                "categorical slot '{}' of service '{}' changes values across splits",
                                slot_name, service.service_name
                            ))
                            .into());
                        }
                    }
                }
                None => {
                    result
                        .by_service
                        .insert(service.service_name.clone(), service_slots);
                }
            }
        }
    }
    Ok(result)
}

/// Union, over every dialogue in the corpus, of every slot the user ever
/// placed in a frame's requested-slots set.
pub fn requestable_slots(corpus: &Corpus) -> Result<BTreeSet<SlotName>> {
    let mut requestables = BTreeSet::new();
    for entry in corpus.all_dialogues()? {
        let (_, dialogue) = entry?;
        for turn in turns(&dialogue, true, false)? {
            for frame in &turn.frames {
                if let Some(state) = &frame.state {
                    requestables.extend(state.requested_slots.iter().cloned());
                }
            }
        }
    }
    Ok(requestables)
}
