use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::PathBuf;
use std::vec;

use failure::format_err;

use crate::corpus::{Corpus, Split};
use crate::errors::*;
use crate::models::{Action, Dialogue, Frame, Speaker, Turn};
use crate::utils::{dial_sort_key, DialogueId};

/// Lazy `(file, dialogue)` sequence over a list of bundle files. Each file
/// is parsed when first needed; a read failure ends the iteration after
/// yielding the error once.
pub struct SplitDialogues {
    files: vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, vec::IntoIter<Dialogue>)>,
    failed: bool,
}

impl SplitDialogues {
    pub(crate) fn new(files: Vec<PathBuf>) -> Self {
        SplitDialogues {
            files: files.into_iter(),
            current: None,
            failed: false,
        }
    }
}

impl Iterator for SplitDialogues {
    type Item = Result<(PathBuf, Dialogue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some((path, dialogues)) = self.current.as_mut() {
                if let Some(dialogue) = dialogues.next() {
                    return Some(Ok((path.clone(), dialogue)));
                }
                self.current = None;
            }
            match self.files.next() {
                None => return None,
                Some(path) => match Corpus::load_dialogue_file(&path) {
                    Ok(dialogues) => self.current = Some((path, dialogues.into_iter())),
                    Err(error) => {
                        self.failed = true;
                        return Some(Err(error));
                    }
                },
            }
        }
    }
}

/// ID-filtered traversal of one split. Requested IDs are grouped by their
/// backing bundle file so each file is opened once; files are processed
/// lazily, in numeric filename order.
pub struct RestrictedDialogues {
    file_groups: vec::IntoIter<(PathBuf, BTreeSet<DialogueId>)>,
    pending: VecDeque<(PathBuf, Dialogue)>,
    failed: bool,
}

impl Iterator for RestrictedDialogues {
    type Item = Result<(PathBuf, Dialogue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Some(Ok(entry));
            }
            match self.file_groups.next() {
                None => return None,
                Some((path, ids)) => match select_from_bundle(&path, &ids) {
                    Ok(selected) => self.pending = selected.into(),
                    Err(error) => {
                        self.failed = true;
                        return Some(Err(error));
                    }
                },
            }
        }
    }
}

impl Corpus {
    /// Lazy traversal restricted to the given dialogue IDs.
    pub fn dialogues_restricted(
        &self,
        split: Split,
        restrict_to: &BTreeSet<DialogueId>,
    ) -> Result<RestrictedDialogues> {
        let mut file_groups: BTreeMap<PathBuf, BTreeSet<DialogueId>> = BTreeMap::new();
        for dialogue_id in restrict_to {
            let file_index: u64 = dialogue_id
                .splitn(2, '_')
                .next()
                .and_then(|c| c.parse().ok())
                .ok_or_else(|| {
                    SgdError::InvalidArgument(format!("Malformed dialogue ID '{}'", dialogue_id))
                })?;
            let path = self.split_dir(split).join(Corpus::bundle_filename(file_index));
            file_groups
                .entry(path)
                .or_insert_with(BTreeSet::new)
                .insert(dialogue_id.clone());
        }
        Ok(RestrictedDialogues {
            file_groups: file_groups.into_iter().collect::<Vec<_>>().into_iter(),
            pending: VecDeque::new(),
            failed: false,
        })
    }
}

/// Selects the requested dialogues from one bundle. When the bundle is
/// complete (last dialogue's within-file index + 1 equals the bundle
/// length), dialogues are picked by direct index; otherwise the bundle has
/// missing dialogues and a slower linear scan matches IDs by equality,
/// short-circuiting once every requested ID has been found.
fn select_from_bundle(
    path: &PathBuf,
    ids: &BTreeSet<DialogueId>,
) -> Result<Vec<(PathBuf, Dialogue)>> {
    let bundle = Corpus::load_dialogue_file(path)?;
    let missing_dialogues = bundle
        .last()
        .and_then(|dialogue| dialogue.within_file_index())
        .map(|last_index| last_index + 1 != bundle.len())
        .unwrap_or(true);

    let mut selected = Vec::with_capacity(ids.len());
    if !missing_dialogues {
        let mut ordered: Vec<&DialogueId> = ids.iter().collect();
        ordered.sort_by_key(|id| dial_sort_key(id));
        for dialogue_id in ordered {
            let index = dialogue_id
                .splitn(2, '_')
                .nth(1)
                .and_then(|c| c.parse::<usize>().ok())
                .ok_or_else(|| {
                    SgdError::InvalidArgument(format!("Malformed dialogue ID '{}'", dialogue_id))
                })?;
            let dialogue = bundle.get(index).ok_or_else(|| {
                format_err!("Dialogue '{}' not found in {:?}", dialogue_id, path)
            })?;
            selected.push((path.clone(), dialogue.clone()));
        }
    } else {
        let mut returned = BTreeSet::new();
        for dialogue in bundle {
            if ids.contains(&dialogue.dialogue_id) {
                returned.insert(dialogue.dialogue_id.clone());
                selected.push((path.clone(), dialogue));
                if returned.len() == ids.len() {
                    break;
                }
            }
        }
    }
    Ok(selected)
}

/// Lazy speaker-filtered view of a dialogue's turns. At least one speaker
/// must be requested.
pub fn turns<'a>(
    dialogue: &'a Dialogue,
    include_user: bool,
    include_system: bool,
) -> Result<impl Iterator<Item = &'a Turn>> {
    if !include_user && !include_system {
        return Err(SgdError::InvalidArgument(
            "at least one speaker must be requested".to_string(),
        )
        .into());
    }
    Ok(dialogue.turns.iter().filter(move |turn| match turn.speaker {
        Speaker::User => include_user,
        Speaker::System => include_system,
    }))
}

/// Lazy view of a frame's actions, skipping the given act names.
pub fn actions<'a>(
    frame: &'a Frame,
    exclude_acts: &'a BTreeSet<String>,
) -> impl Iterator<Item = &'a Action> {
    frame
        .actions
        .iter()
        .filter(move |action| !exclude_acts.contains(&action.act))
}
