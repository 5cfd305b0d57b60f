use std::collections::{BTreeMap, BTreeSet};

use crate::corpus::{Corpus, Split};
use crate::errors::*;
use crate::utils::{IntentName, ServiceName, UnionMerge};

/// Partition of intent names into the two schema-level intent kinds.
///
/// The partition is an invariant of each split's schema; across splits an
/// inconsistently flagged intent ends up in both buckets. Membership checks
/// test the transactional bucket first, so such an intent counts as
/// transactional, matching the published metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentTaxonomy {
    pub transactional: BTreeSet<IntentName>,
    pub search: BTreeSet<IntentName>,
}

impl IntentTaxonomy {
    pub fn is_transactional(&self, intent: &str) -> bool {
        self.transactional.contains(intent)
    }

    pub fn is_search(&self, intent: &str) -> bool {
        !self.transactional.contains(intent) && self.search.contains(intent)
    }

    pub fn all_intents(&self) -> BTreeSet<IntentName> {
        self.transactional.union(&self.search).cloned().collect()
    }
}

impl UnionMerge for IntentTaxonomy {
    fn union_merge(&mut self, other: Self) {
        self.transactional.union_merge(other.transactional);
        self.search.union_merge(other.search);
    }
}

/// Buckets every intent of one split's schema by its transactional flag.
pub fn schema_intents(corpus: &Corpus, split: Split) -> Result<IntentTaxonomy> {
    let mut taxonomy = IntentTaxonomy::default();
    for service in corpus.schemas(split)? {
        for intent in service.intents {
            if intent.is_transactional {
                taxonomy.transactional.insert(intent.name);
            } else {
                taxonomy.search.insert(intent.name);
            }
        }
    }
    Ok(taxonomy)
}

/// Corpus-wide taxonomy: union of the per-split taxonomies.
pub fn intents_by_type(corpus: &Corpus) -> Result<IntentTaxonomy> {
    let mut taxonomy = IntentTaxonomy::default();
    for split in &Split::all() {
        taxonomy.union_merge(schema_intents(corpus, *split)?);
    }
    Ok(taxonomy)
}

/// Split name -> every intent named in that split's schema.
pub fn intents_by_split(corpus: &Corpus) -> Result<BTreeMap<String, BTreeSet<IntentName>>> {
    let mut by_split = BTreeMap::new();
    for split in &Split::all() {
        let taxonomy = schema_intents(corpus, *split)?;
        by_split.insert(split.to_string(), taxonomy.all_intents());
    }
    Ok(by_split)
}

/// Split -> intent -> services declaring it. The same intent name can be
/// part of several service APIs (e.g. `Restaurants_1` and `Restaurants_2`).
pub fn intents_to_services(
    corpus: &Corpus,
) -> Result<BTreeMap<String, BTreeMap<IntentName, BTreeSet<ServiceName>>>> {
    let mut mapping: BTreeMap<String, BTreeMap<IntentName, BTreeSet<ServiceName>>> =
        BTreeMap::new();
    for split in &Split::all() {
        let split_map = mapping.entry(split.to_string()).or_insert_with(BTreeMap::new);
        for service in corpus.schemas(*split)? {
            for intent in &service.intents {
                split_map
                    .entry(intent.name.clone())
                    .or_insert_with(BTreeSet::new)
                    .insert(service.service_name.clone());
            }
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::test_corpus;

    #[test]
    fn test_schema_intents_are_disjoint_in_every_split() {
        // Given
        let corpus = test_corpus();

        // When/Then
        for split in &Split::all() {
            let taxonomy = schema_intents(&corpus, *split).unwrap();
            assert!(taxonomy.transactional.is_disjoint(&taxonomy.search));
        }
    }

    #[test]
    fn test_intents_by_type_covers_every_schema_intent() {
        // Given
        let corpus = test_corpus();
        let mut direct_scan = BTreeSet::new();
        for split in &Split::all() {
            for service in corpus.schemas(*split).unwrap() {
                for intent in service.intents {
                    direct_scan.insert(intent.name);
                }
            }
        }

        // When
        let taxonomy = intents_by_type(&corpus).unwrap();

        // Then
        assert_eq!(
            direct_scan.len(),
            taxonomy.transactional.len() + taxonomy.search.len()
        );
        assert_eq!(direct_scan, taxonomy.all_intents());
    }

    #[test]
    fn test_intents_to_services() {
        // Given
        let corpus = test_corpus();

        // When
        let mapping = intents_to_services(&corpus).unwrap();

        // Then
        assert!(mapping["train"]["FindRestaurants"].contains("Restaurants_1"));
        assert!(mapping["test"]["LookupMusic"].contains("Music_1"));
    }
}
