use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::corpus::{Corpus, Split};
use crate::errors::*;
use crate::utils::{sorted_by_dial_key, DialogueId, ServiceName};

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Split -> service -> bundle files containing at least one dialogue that
/// invokes the service. Starts from "every file" per service and removes
/// the files found to lack the service.
pub fn service_to_file_map(
    corpus: &Corpus,
) -> Result<BTreeMap<String, BTreeMap<ServiceName, BTreeSet<String>>>> {
    let mut mapping = BTreeMap::new();
    for split in &Split::all() {
        let files = corpus.dialogue_files(*split)?;
        let file_names: BTreeSet<String> = files.iter().map(|path| file_name(path)).collect();
        let services: BTreeSet<ServiceName> = corpus
            .schemas(*split)?
            .into_iter()
            .map(|service| service.service_name)
            .collect();

        let mut split_map: BTreeMap<ServiceName, BTreeSet<String>> = services
            .iter()
            .map(|service| (service.clone(), file_names.clone()))
            .collect();

        for path in &files {
            let mut file_services = BTreeSet::new();
            for dialogue in Corpus::load_dialogue_file(path)? {
                file_services.extend(dialogue.services);
            }
            for missing in services.difference(&file_services) {
                if let Some(entries) = split_map.get_mut(missing) {
                    entries.remove(&file_name(path));
                }
            }
        }
        mapping.insert(split.to_string(), split_map);
    }
    Ok(mapping)
}

/// Split -> IDs of dialogues that invoke more than one service.
pub fn multiple_services_dialogues(corpus: &Corpus) -> Result<BTreeMap<String, Vec<DialogueId>>> {
    let mut multi_service = BTreeMap::new();
    for split in &Split::all() {
        let mut ids = Vec::new();
        for entry in corpus.dialogues(*split)? {
            let (_, dialogue) = entry?;
            if dialogue.services.len() > 1 {
                ids.push(dialogue.dialogue_id);
            }
        }
        multi_service.insert(split.to_string(), sorted_by_dial_key(ids));
    }
    Ok(multi_service)
}
