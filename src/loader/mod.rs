//! In-memory, indexed view of a lexicon directory.
//!
//! A [`Lexicon`] is a snapshot: it reflects the directory at the time of
//! [`Lexicon::load`] and is never refreshed. Writers reload after every
//! mutation.

mod records;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::{LexiconError, Result};
use crate::paths::LexiconPaths;
use crate::xml::{self, Element};

pub use records::{Frame, FrameElement, LexUnit, LuIndexEntry};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct Lexicon {
    paths: LexiconPaths,
    frames: BTreeMap<String, Frame>,
    lus: BTreeMap<u64, LexUnit>,
    lu_index: BTreeMap<u64, LuIndexEntry>,
}

impl Lexicon {
    /// Reads `frameIndex.xml`, every indexed frame file and `luIndex.xml`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let paths = LexiconPaths::existing(root.as_ref())?;

        let mut frames = BTreeMap::new();
        let mut lus = BTreeMap::new();

        let frame_index = xml::read_document(&paths.frame_index)?;
        for entry in xml::children(&frame_index.root, "frame") {
            let Some(name) = xml::attr(entry, "name") else {
                continue;
            };
            let frame_path = paths.frame_file(name);
            let document = xml::read_document(&frame_path)?;
            let frame = parse_frame(&document.root, entry)?;

            for lexunit in xml::children(&document.root, "lexUnit") {
                if let Some(lu) = LexUnit::from_element(lexunit, &frame) {
                    lus.insert(lu.id, lu);
                }
            }
            frames.insert(frame.name.clone(), frame);
        }

        let lu_index_doc = xml::read_document(&paths.lu_index)?;
        let lu_index: BTreeMap<u64, LuIndexEntry> = xml::children(&lu_index_doc.root, "lu")
            .filter_map(LuIndexEntry::from_element)
            .map(|entry| (entry.id, entry))
            .collect();

        debug!(
            "Loaded lexicon at {}: {} frames, {} LUs",
            paths.root.display(),
            frames.len(),
            lus.len()
        );

        Ok(Self {
            paths,
            frames,
            lus,
            lu_index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    pub fn paths(&self) -> &LexiconPaths {
        &self.paths
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    /// Every LU recorded in a frame file.
    pub fn lus(&self) -> impl Iterator<Item = &LexUnit> {
        self.lus.values()
    }

    pub fn lu_count(&self) -> usize {
        self.lus.len()
    }

    /// Looks a frame up by its exact name.
    pub fn frame_by_name(&self, name: &str) -> Result<&Frame> {
        self.frames.get(name).ok_or_else(|| LexiconError::NotFound {
            kind: "frame",
            name: name.to_string(),
            suggestion: self.closest_frame_name(name),
        })
    }

    pub fn lu(&self, id: u64) -> Result<&LexUnit> {
        self.lus
            .get(&id)
            .ok_or_else(|| LexiconError::not_found("lexical unit", id.to_string()))
    }

    pub fn contains_lu(&self, id: u64) -> bool {
        self.lu_index.contains_key(&id) || self.lus.contains_key(&id)
    }

    /// LU id to composed `lemma.pos` name, as listed in `luIndex.xml`.
    pub fn lu_ids_and_names(&self) -> BTreeMap<u64, &str> {
        self.lu_index
            .values()
            .map(|entry| (entry.id, entry.name.as_str()))
            .collect()
    }

    pub fn lu_index_entries(&self) -> impl Iterator<Item = &LuIndexEntry> {
        self.lu_index.values()
    }

    /// Names of the frames that contain an LU with the composed name `lu_name`.
    pub fn frames_by_lemma(&self, lu_name: &str) -> BTreeSet<&str> {
        self.lus
            .values()
            .filter(|lu| lu.name == lu_name)
            .map(|lu| lu.frame_name.as_str())
            .collect()
    }

    fn closest_frame_name(&self, name: &str) -> Option<String> {
        self.frames
            .keys()
            .map(|candidate| (candidate, strsim::jaro_winkler(name, candidate)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate.clone())
    }
}

fn parse_frame(document: &Element, index_entry: &Element) -> Result<Frame> {
    let name = xml::attr(document, "name")
        .or_else(|| xml::attr(index_entry, "name"))
        .unwrap_or_default()
        .to_string();
    let id = xml::attr(document, "ID")
        .or_else(|| xml::attr(index_entry, "ID"))
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| LexiconError::InvalidArgument(format!("frame {} has no numeric ID", name)))?;

    let fes = xml::children(document, "FE")
        .filter_map(|el| {
            let name = xml::attr(el, "name")?.to_string();
            let id = xml::attr(el, "ID")?.trim().parse().ok()?;
            Some((
                name.clone(),
                FrameElement { id, name },
            ))
        })
        .collect();

    let lu_ids = xml::children(document, "lexUnit")
        .filter_map(|el| xml::attr(el, "ID")?.trim().parse().ok())
        .collect();

    Ok(Frame {
        id,
        name,
        definition: xml::child(document, "definition")
            .map(xml::text)
            .unwrap_or_default(),
        fes,
        lu_ids,
    })
}
