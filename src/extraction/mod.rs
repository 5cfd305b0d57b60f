pub mod classification;
pub mod entity_slots;
pub mod intents;
pub mod services;
pub mod slots;

pub use self::classification::{dialogues_by_type, filter_by_intent_type, DialogueTypeBuckets};
pub use self::entity_slots::{entity_slots, entity_slots_map};
pub use self::intents::{
    intents_by_split, intents_by_type, intents_to_services, schema_intents, IntentTaxonomy,
};
pub use self::services::{multiple_services_dialogues, service_to_file_map};
pub use self::slots::{binary_slots, categorical_slots, requestable_slots, BinarySlots, CategoricalSlots};
