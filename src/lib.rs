pub mod accessor;
pub mod analysis;
pub mod assembler;
pub mod corpus;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod outline;
#[cfg(test)]
mod testutils;
pub mod utils;

pub use crate::accessor::CorpusMetadata;
pub use crate::assembler::{generate_metadata, write_metadata};
pub use crate::corpus::{actions, turns, Corpus, Split};
pub use crate::errors::*;
pub use crate::extraction::{
    binary_slots, categorical_slots, dialogues_by_type, entity_slots_map, filter_by_intent_type,
    intents_by_type, requestable_slots, IntentTaxonomy,
};
pub use crate::models::{Dialogue, Frame, MetadataReport, Service, Speaker, Turn};
