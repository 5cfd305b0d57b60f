pub mod iteration;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use failure::ResultExt;

use crate::errors::*;
use crate::models::{Dialogue, Service};
use crate::utils::dial_files_sort_key;

pub use self::iteration::{actions, turns, RestrictedDialogues, SplitDialogues};

/// Named partition of the corpus. Every dialogue and every schema belongs
/// to exactly one split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub fn all() -> [Split; 3] {
        [Split::Train, Split::Dev, Split::Test]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle on a corpus checkout. The corpus is treated as immutable input
/// for the duration of a run; every traversal re-reads from disk.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
}

impl Corpus {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Corpus {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.root.join(split.as_str())
    }

    /// Reconstructs the bundle filename backing a dialogue ID, e.g.
    /// `"5_00023"` -> `dialogues_005.json`.
    pub fn bundle_filename(file_index: u64) -> String {
        format!("dialogues_{:03}.json", file_index)
    }

    /// Dialogue bundle files of a split, sorted by their numeric suffix.
    pub fn dialogue_files(&self, split: Split) -> Result<Vec<PathBuf>> {
        let split_dir = self.split_dir(split);
        let entries = fs::read_dir(&split_dir)
            .with_context(|_| format!("Could not list split directory {:?}", split_dir))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if name.starts_with("dialogues") && name.ends_with(".json") {
                files.push(path);
            }
        }
        files.sort_by_key(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(dial_files_sort_key)
                .unwrap_or(0)
        });
        Ok(files)
    }

    /// Parses one dialogue bundle. The file handle is released as soon as
    /// parsing completes.
    pub fn load_dialogue_file(path: &Path) -> Result<Vec<Dialogue>> {
        let file = fs::File::open(path)
            .with_context(|_| format!("Could not open dialogue file {:?}", path))?;
        let dialogues = serde_json::from_reader(file)
            .with_context(|_| format!("Invalid dialogue file {:?}", path))?;
        Ok(dialogues)
    }

    /// Service definitions of a split, in schema order.
    pub fn schemas(&self, split: Split) -> Result<Vec<Service>> {
        let schema_path = self.split_dir(split).join("schema.json");
        let file = fs::File::open(&schema_path)
            .with_context(|_| format!("Could not open schema file {:?}", schema_path))?;
        let services = serde_json::from_reader(file)
            .with_context(|_| format!("Invalid schema file {:?}", schema_path))?;
        Ok(services)
    }

    /// Lazy `(file, dialogue)` traversal of a split, in file-then-in-file
    /// order. Restart by calling this again.
    pub fn dialogues(&self, split: Split) -> Result<SplitDialogues> {
        Ok(SplitDialogues::new(self.dialogue_files(split)?))
    }

    /// Lazy traversal of the whole corpus, split by split.
    pub fn all_dialogues(&self) -> Result<SplitDialogues> {
        let mut files = Vec::new();
        for split in &Split::all() {
            files.extend(self.dialogue_files(*split)?);
        }
        Ok(SplitDialogues::new(files))
    }
}
