use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

use crate::utils::{DialogueId, IntentName, ServiceName, SlotName};

/// The serialized metadata artifact. Field names follow the layout
/// consumed by downstream analysis tools; fields are declared in
/// alphabetical order so the report is written key-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MetadataReport {
    pub all_intents: Vec<IntentName>,
    pub binary_slots: Vec<SlotName>,
    pub binary_slots_by_service: BTreeMap<ServiceName, Vec<SlotName>>,
    pub categorical_slots: Vec<SlotName>,
    pub categorical_slots_by_service: BTreeMap<ServiceName, BTreeMap<SlotName, Vec<String>>>,
    pub entity_slots_by_service: BTreeMap<ServiceName, BTreeMap<IntentName, Vec<SlotName>>>,
    pub intents_by_split: BTreeMap<String, Vec<IntentName>>,
    pub intents_to_services: BTreeMap<String, BTreeMap<IntentName, Vec<ServiceName>>>,
    pub mixed_intent_dialogues: BTreeMap<String, Vec<DialogueId>>,
    pub multiple_services_dialogues: BTreeMap<String, Vec<DialogueId>>,
    pub requestable_slots: Vec<SlotName>,
    pub search_dialogues: BTreeMap<String, Vec<DialogueId>>,
    pub search_intents: Vec<IntentName>,
    pub services_to_files: BTreeMap<String, BTreeMap<ServiceName, Vec<String>>>,
    pub split_names: Vec<String>,
    pub transactional_dialogues: BTreeMap<String, Vec<DialogueId>>,
    pub transactional_intents: Vec<IntentName>,
    pub version: String,
}
