//! Ordered source-to-name mapping and duplicate numbering.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One source file and the name it will be copied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub source: PathBuf,
    pub name: String,
}

/// Insertion-ordered mapping from source path to file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenameMap {
    entries: Vec<RenameEntry>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps entries whose sources are already known to be distinct.
    pub(crate) fn from_entries(entries: Vec<RenameEntry>) -> Self {
        Self { entries }
    }

    /// Name assigned to `source`. Scans the entries linearly.
    pub fn get(&self, source: &Path) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| entry.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A source seen twice keeps its first position and takes the later name.
impl<P, S> FromIterator<(P, S)> for RenameMap
where
    P: Into<PathBuf>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (P, S)>>(iter: T) -> Self {
        let mut positions: HashMap<PathBuf, usize> = HashMap::new();
        let mut entries: Vec<RenameEntry> = Vec::new();
        for (source, name) in iter {
            let source = source.into();
            let name = name.into();
            match positions.get(&source) {
                Some(&index) => entries[index].name = name,
                None => {
                    positions.insert(source.clone(), entries.len());
                    entries.push(RenameEntry { source, name });
                }
            }
        }
        RenameMap { entries }
    }
}

impl IntoIterator for RenameMap {
    type Item = RenameEntry;
    type IntoIter = std::vec::IntoIter<RenameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a RenameMap {
    type Item = &'a RenameEntry;
    type IntoIter = std::slice::Iter<'a, RenameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Numbers every name so that no two entries share one.
///
/// Entries are stably sorted by name. Within each run of equal names the
/// entries get `_1`, `_2`, ... inserted before the extension, in their input
/// order. A name with no duplicate still gets `_1`.
pub fn resolve(mapping: RenameMap) -> RenameMap {
    let mut entries = mapping.entries;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut current: Option<String> = None;
    let mut counter = 1usize;
    for entry in &mut entries {
        if current.as_deref() == Some(entry.name.as_str()) {
            counter += 1;
        } else {
            current = Some(entry.name.clone());
            counter = 1;
        }
        entry.name = number_name(&entry.name, counter);
    }

    RenameMap { entries }
}

/// Inserts `_<n>` before the extension of `name`.
fn number_name(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{n}.{ext}"),
        None => format!("{name}_{n}"),
    }
}
