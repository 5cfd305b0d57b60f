//! Runs every extraction pass once over the corpus, merges the per-split
//! partial results and serializes the combined metadata report.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use failure::ResultExt;
use log::info;

use crate::corpus::{Corpus, Split};
use crate::errors::*;
use crate::extraction::{
    binary_slots, categorical_slots, dialogues_by_type, entity_slots_map, intents_by_split,
    intents_by_type, intents_to_services, multiple_services_dialogues, requestable_slots,
    service_to_file_map,
};
use crate::models::MetadataReport;
use crate::utils::{dial_files_sort_key, sorted_by_prefix};

/// Version marker written into the report: the commit hash of the corpus
/// checkout when available, else the crate version.
fn corpus_version(corpus: &Corpus) -> String {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("HEAD")
        .current_dir(corpus.root())
        .output();
    match output {
        Ok(ref out) if out.status.success() => {
            String::from_utf8_lossy(&out.stdout).trim().to_string()
        }
        _ => env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Computes the full metadata report for a corpus checkout. Every
/// aggregation recomputes from scratch; nothing is cached between runs.
pub fn generate_metadata(corpus: &Corpus) -> Result<MetadataReport> {
    info!("Scanning schemas for the intent taxonomy");
    let taxonomy = intents_by_type(corpus)?;

    info!("Classifying dialogues by intent type");
    let by_type = dialogues_by_type(corpus, &taxonomy)?;

    info!("Scanning schemas for slot taxonomies");
    let binary = binary_slots(corpus)?;
    let categorical = categorical_slots(corpus, &binary.by_service)?;

    info!("Scanning dialogues for requestable and entity slots");
    let requestables = requestable_slots(corpus)?;
    let entity = entity_slots_map(corpus, &taxonomy)?;

    info!("Mapping services to files");
    let services_to_files = service_to_file_map(corpus)?;

    let sort_files = |files: std::collections::BTreeSet<String>| -> Vec<String> {
        let mut sorted: Vec<String> = files.into_iter().collect();
        sorted.sort_by_key(|name| dial_files_sort_key(name));
        sorted
    };

    let mut transactional_dialogues = BTreeMap::new();
    let mut search_dialogues = BTreeMap::new();
    let mut mixed_intent_dialogues = BTreeMap::new();
    for (split, buckets) in by_type {
        transactional_dialogues.insert(split.clone(), buckets.transactional);
        search_dialogues.insert(split.clone(), buckets.search);
        mixed_intent_dialogues.insert(split, buckets.mixed_intent);
    }

    Ok(MetadataReport {
        all_intents: sorted_by_prefix(taxonomy.all_intents()),
        binary_slots: sorted_by_prefix(binary.all),
        binary_slots_by_service: binary
            .by_service
            .into_iter()
            .map(|(service, slots)| (service, sorted_by_prefix(slots)))
            .collect(),
        categorical_slots: sorted_by_prefix(categorical.all),
        categorical_slots_by_service: categorical.by_service,
        entity_slots_by_service: entity
            .into_iter()
            .map(|(service, intents)| {
                (
                    service,
                    intents
                        .into_iter()
                        .map(|(intent, slots)| (intent, sorted_by_prefix(slots)))
                        .collect(),
                )
            })
            .collect(),
        intents_by_split: intents_by_split(corpus)?
            .into_iter()
            .map(|(split, intents)| (split, sorted_by_prefix(intents)))
            .collect(),
        intents_to_services: intents_to_services(corpus)?
            .into_iter()
            .map(|(split, intents)| {
                (
                    split,
                    intents
                        .into_iter()
                        .map(|(intent, services)| (intent, sorted_by_prefix(services)))
                        .collect(),
                )
            })
            .collect(),
        mixed_intent_dialogues,
        multiple_services_dialogues: multiple_services_dialogues(corpus)?,
        requestable_slots: sorted_by_prefix(requestables),
        search_dialogues,
        search_intents: sorted_by_prefix(taxonomy.search.clone()),
        services_to_files: services_to_files
            .into_iter()
            .map(|(split, services)| {
                (
                    split,
                    services
                        .into_iter()
                        .map(|(service, files)| (service, sort_files(files)))
                        .collect(),
                )
            })
            .collect(),
        split_names: Split::all().iter().map(|split| split.to_string()).collect(),
        transactional_dialogues,
        transactional_intents: sorted_by_prefix(taxonomy.transactional),
        version: corpus_version(corpus),
    })
}

/// Serializes the report key-sorted with 4-space indentation. The file is
/// written in one shot so a failed run leaves no partial artifact behind.
pub fn write_metadata(report: &MetadataReport, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(report, &mut serializer)
        .with_context(|_| "Could not serialize metadata report")?;
    fs::write(path, buffer)
        .with_context(|_| format!("Could not write metadata report to {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::test_corpus;

    #[test]
    fn test_generate_metadata_report() {
        // Given
        let corpus = test_corpus();

        // When
        let report = generate_metadata(&corpus).unwrap();

        // Then
        assert_eq!(
            report.search_intents,
            vec!["FindHomeByArea", "FindRestaurants", "LookupMusic"]
        );
        assert_eq!(
            report.transactional_intents,
            vec!["PlayMedia", "ReserveRestaurant", "ScheduleVisit"]
        );
        assert_eq!(report.all_intents.len(), 6);
        assert_eq!(report.split_names, vec!["train", "dev", "test"]);
        assert_eq!(report.transactional_dialogues["train"], vec!["1_00000"]);
        assert_eq!(
            report.entity_slots_by_service["Restaurants_1"]["FindRestaurants"],
            vec!["restaurant_name"]
        );
        // every service is a key of the binary slot map, even without
        // binary slots
        assert!(report.binary_slots_by_service["Music_1"].is_empty());
    }

    #[test]
    fn test_write_metadata_round_trip() {
        // Given
        let corpus = test_corpus();
        let report = generate_metadata(&corpus).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        // When
        write_metadata(&report, &path).unwrap();
        let reloaded: MetadataReport =
            serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();

        // Then
        assert_eq!(report, reloaded);
    }
}
