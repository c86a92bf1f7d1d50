//! Layout of a lexicon directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{LexiconError, Result};

/// Every file and directory of a FrameNet-style lexicon rooted at `root`.
#[derive(Debug, Clone)]
pub struct LexiconPaths {
    pub root: PathBuf,
    pub fr_relation: PathBuf,
    pub frame_index: PathBuf,
    pub frame_index_xsl: PathBuf,
    pub lu_index: PathBuf,
    pub lu_index_xsl: PathBuf,
    pub sem_types: PathBuf,
    pub lu_dir: PathBuf,
    pub lex_unit_xsl: PathBuf,
    pub frame_dir: PathBuf,
    pub frame_xsl: PathBuf,
    pub fulltext_index: PathBuf,
    pub fulltext_index_xsl: PathBuf,
    pub fulltext_dir: PathBuf,
}

impl LexiconPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let lu_dir = root.join("lu");
        let frame_dir = root.join("frame");
        Self {
            fr_relation: root.join("frRelation.xml"),
            frame_index: root.join("frameIndex.xml"),
            frame_index_xsl: root.join("frameIndex.xsl"),
            lu_index: root.join("luIndex.xml"),
            lu_index_xsl: root.join("luIndex.xsl"),
            sem_types: root.join("semTypes.xml"),
            lex_unit_xsl: lu_dir.join("lexUnit.xsl"),
            frame_xsl: frame_dir.join("frame.xsl"),
            fulltext_index: root.join("fulltextIndex.xml"),
            fulltext_index_xsl: root.join("fulltextIndex.xsl"),
            fulltext_dir: root.join("fulltext"),
            lu_dir,
            frame_dir,
            root,
        }
    }

    /// Like [`LexiconPaths::new`], but fails when one of the index files or
    /// directories a reader needs is missing.
    pub fn existing(root: impl Into<PathBuf>) -> Result<Self> {
        let paths = Self::new(root);
        for path in paths.required() {
            if !path.exists() {
                return Err(LexiconError::not_found(
                    "lexicon path",
                    path.to_string_lossy().to_string(),
                ));
            }
        }
        Ok(paths)
    }

    fn required(&self) -> [&Path; 4] {
        [&self.frame_index, &self.lu_index, &self.frame_dir, &self.lu_dir]
    }

    /// Files copied verbatim from a source lexicon when initializing a new one.
    pub fn static_files(&self) -> [&Path; 7] {
        [
            &self.fr_relation,
            &self.frame_index,
            &self.frame_index_xsl,
            &self.lu_index_xsl,
            &self.lex_unit_xsl,
            &self.sem_types,
            &self.frame_xsl,
        ]
    }

    pub fn frame_file(&self, frame_name: &str) -> PathBuf {
        self.frame_dir.join(format!("{}.xml", frame_name))
    }

    pub fn lu_file(&self, lu_id: u64) -> PathBuf {
        self.lu_dir.join(format!("lu{}.xml", lu_id))
    }

    /// Annotation document of `document` in `corpus`, e.g. `fulltext/HDD__wiki_1.xml`.
    pub fn fulltext_file(&self, corpus: &str, document: &str) -> PathBuf {
        self.fulltext_dir.join(format!("{}__{}.xml", corpus, document))
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(".lexicon.lock")
    }

    /// Frame name to frame file, for every `frame/*.xml` on disk.
    pub fn frame_files(&self) -> Result<BTreeMap<String, PathBuf>> {
        let pattern = self.frame_dir.join("*.xml");
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern)
            .map_err(|e| LexiconError::InvalidArgument(format!("bad frame path pattern: {}", e)))?;

        let mut frames = BTreeMap::new();
        for path in entries.flatten() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                frames.insert(stem.to_string(), path.clone());
            }
        }
        Ok(frames)
    }

    /// LU ids of every `lu/lu{ID}.xml` on disk.
    pub fn lu_file_ids(&self) -> Result<Vec<u64>> {
        let pattern = self.lu_dir.join("lu*.xml");
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern)
            .map_err(|e| LexiconError::InvalidArgument(format!("bad LU path pattern: {}", e)))?;

        let mut ids: Vec<u64> = entries
            .flatten()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                stem.strip_prefix("lu")?.parse().ok()
            })
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
