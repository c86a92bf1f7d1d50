//! Audit of the three-location invariant of a lexicon directory.
//!
//! Reads the raw XML instead of a [`crate::loader::Lexicon`] so that
//! duplicated elements, which the loader would collapse, are counted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::paths::LexiconPaths;
use crate::xml;

/// How many copies of one LU each location holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LuOccurrences {
    pub lu_index: usize,
    pub lu_files: usize,
    pub frames: usize,
}

impl LuOccurrences {
    pub fn is_consistent(&self) -> bool {
        self.lu_index == 1 && self.lu_files == 1 && self.frames == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyIssue {
    pub lu_id: u64,
    pub occurrences: LuOccurrences,
    /// Frame files holding a `lexUnit` with this id
    pub frames: Vec<String>,
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.occurrences;
        write!(
            f,
            "LU {}: {} luIndex row(s), {} lu file(s), {} frame lexUnit(s)",
            self.lu_id, o.lu_index, o.lu_files, o.frames
        )?;
        if !self.frames.is_empty() {
            write!(f, " in {}", self.frames.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    /// Number of distinct LU ids seen in any location
    pub checked: usize,
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Checks that every LU id appears exactly once in `luIndex.xml`, once as
/// `lu/lu{ID}.xml` and once as a `lexUnit` of a frame file.
pub fn check_consistency(root: &Path) -> Result<ConsistencyReport> {
    let paths = LexiconPaths::existing(root)?;
    let mut occurrences: BTreeMap<u64, LuOccurrences> = BTreeMap::new();
    let mut frames_of: BTreeMap<u64, BTreeSet<String>> = BTreeMap::new();

    let lu_index = xml::read_document(&paths.lu_index)?;
    for id in xml::children(&lu_index.root, "lu").filter_map(parse_id) {
        occurrences.entry(id).or_default().lu_index += 1;
    }

    for id in paths.lu_file_ids()? {
        occurrences.entry(id).or_default().lu_files += 1;
    }

    for (frame_name, frame_path) in paths.frame_files()? {
        let document = xml::read_document(&frame_path)?;
        for id in xml::children(&document.root, "lexUnit").filter_map(parse_id) {
            occurrences.entry(id).or_default().frames += 1;
            frames_of.entry(id).or_default().insert(frame_name.clone());
        }
    }

    let issues: Vec<ConsistencyIssue> = occurrences
        .iter()
        .filter(|(_, o)| !o.is_consistent())
        .map(|(id, o)| ConsistencyIssue {
            lu_id: *id,
            occurrences: *o,
            frames: frames_of
                .remove(id)
                .map(|names| names.into_iter().collect())
                .unwrap_or_default(),
        })
        .collect();

    debug!(
        "Checked {} LU ids at {}, {} issue(s)",
        occurrences.len(),
        root.display(),
        issues.len()
    );

    Ok(ConsistencyReport {
        checked: occurrences.len(),
        issues,
    })
}

fn parse_id(element: &xml::Element) -> Option<u64> {
    xml::attr(element, "ID")?.trim().parse().ok()
}
