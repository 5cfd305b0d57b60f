//! Read-only, typed view of a previously generated metadata report.
//!
//! The context is constructed once at startup and passed to consumers.
//! When the report is absent or corrupt the loader hands back an explicit
//! degraded (empty) context instead of failing the process, since many
//! callers only need a subset of the metadata.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use failure::ResultExt;
use log::warn;

use crate::errors::*;
use crate::models::MetadataReport;
use crate::utils::{DialogueId, IntentName, ServiceName, SlotName};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusMetadata {
    pub version: String,
    pub split_names: Vec<String>,
    pub all_intents: HashSet<IntentName>,
    pub search_intents: HashSet<IntentName>,
    pub transactional_intents: HashSet<IntentName>,
    pub intents_by_split: HashMap<String, HashSet<IntentName>>,
    pub intents_to_services: HashMap<String, HashMap<IntentName, HashSet<ServiceName>>>,
    pub requestable_slots: HashSet<SlotName>,
    pub binary_slots: HashSet<SlotName>,
    pub binary_slots_by_service: HashMap<ServiceName, HashSet<SlotName>>,
    pub categorical_slots: HashSet<SlotName>,
    pub categorical_slots_by_service: HashMap<ServiceName, HashMap<SlotName, HashSet<String>>>,
    pub entity_slots: HashMap<ServiceName, HashMap<IntentName, HashSet<SlotName>>>,
    pub services_to_files: HashMap<String, HashMap<ServiceName, Vec<String>>>,
    pub transactional_dialogues: HashMap<String, HashSet<DialogueId>>,
    pub search_dialogues: HashMap<String, HashSet<DialogueId>>,
    pub mixed_intent_dialogues: HashMap<String, HashSet<DialogueId>>,
    pub multiple_services_dialogues: HashMap<String, HashSet<DialogueId>>,
    degraded: bool,
}

fn to_set_map(source: std::collections::BTreeMap<String, Vec<String>>) -> HashMap<String, HashSet<String>> {
    source
        .into_iter()
        .map(|(key, values)| (key, values.into_iter().collect()))
        .collect()
}

fn to_nested_set_map(
    source: std::collections::BTreeMap<String, std::collections::BTreeMap<String, Vec<String>>>,
) -> HashMap<String, HashMap<String, HashSet<String>>> {
    source
        .into_iter()
        .map(|(key, inner)| (key, to_set_map(inner)))
        .collect()
}

impl CorpusMetadata {
    /// The explicit degraded variant: every set and mapping is empty.
    pub fn empty() -> Self {
        CorpusMetadata {
            degraded: true,
            ..CorpusMetadata::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn from_report(report: MetadataReport) -> Self {
        CorpusMetadata {
            version: report.version,
            split_names: report.split_names,
            all_intents: report.all_intents.into_iter().collect(),
            search_intents: report.search_intents.into_iter().collect(),
            transactional_intents: report.transactional_intents.into_iter().collect(),
            intents_by_split: to_set_map(report.intents_by_split),
            intents_to_services: to_nested_set_map(report.intents_to_services),
            requestable_slots: report.requestable_slots.into_iter().collect(),
            binary_slots: report.binary_slots.into_iter().collect(),
            binary_slots_by_service: to_set_map(report.binary_slots_by_service),
            categorical_slots: report.categorical_slots.into_iter().collect(),
            categorical_slots_by_service: to_nested_set_map(report.categorical_slots_by_service),
            entity_slots: to_nested_set_map(report.entity_slots_by_service),
            services_to_files: report
                .services_to_files
                .into_iter()
                .map(|(split, services)| (split, services.into_iter().collect()))
                .collect(),
            transactional_dialogues: to_set_map(report.transactional_dialogues),
            search_dialogues: to_set_map(report.search_dialogues),
            mixed_intent_dialogues: to_set_map(report.mixed_intent_dialogues),
            multiple_services_dialogues: to_set_map(report.multiple_services_dialogues),
            degraded: false,
        }
    }

    /// Strict load for callers that cannot work without metadata.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).with_context(|_| {
            SgdError::MissingOrCorruptMetadata(path.to_string_lossy().to_string())
        })?;
        let report: MetadataReport = serde_json::from_reader(file).with_context(|_| {
            SgdError::MissingOrCorruptMetadata(path.to_string_lossy().to_string())
        })?;
        Ok(CorpusMetadata::from_report(report))
    }

    /// Soft load: degrades to the empty context with a warning when the
    /// report is missing or unparsable.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match CorpusMetadata::load(&path) {
            Ok(metadata) => metadata,
            Err(error) => {
                warn!(
                    "No metadata file detected for corpus or metadata file corrupt ({}); \
                     falling back to empty metadata",
                    error
                );
                CorpusMetadata::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{generate_metadata, write_metadata};
    use crate::testutils::test_corpus;

    #[test]
    fn test_from_path_degrades_on_missing_file() {
        // Given
        let dir = tempfile::tempdir().unwrap();

        // When
        let metadata = CorpusMetadata::from_path(dir.path().join("metadata.json"));

        // Then
        assert!(metadata.is_degraded());
        assert!(metadata.search_intents.is_empty());
    }

    #[test]
    fn test_load_fails_on_corrupt_file() {
        // Given
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, b"{ not json").unwrap();

        // When
        let result = CorpusMetadata::load(&path);

        // Then
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_preserves_memberships() {
        // Given
        let corpus = test_corpus();
        let report = generate_metadata(&corpus).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        write_metadata(&report, &path).unwrap();

        // When
        let metadata = CorpusMetadata::load(&path).unwrap();

        // Then
        assert!(!metadata.is_degraded());
        assert_eq!(
            metadata.search_intents,
            report.search_intents.iter().cloned().collect()
        );
        assert_eq!(
            metadata.transactional_intents,
            report.transactional_intents.iter().cloned().collect()
        );
        assert!(metadata.entity_slots["Restaurants_1"]["FindRestaurants"]
            .contains("restaurant_name"));
        assert!(metadata.transactional_dialogues["train"].contains("1_00000"));
    }
}
