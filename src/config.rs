//! Runtime configuration, loaded from TOML.
//!
//! ```toml
//! id_strategy = "clock"
//! duplicate_policy = "abort"
//! lock = true
//!
//! [rdf]
//! namespace = "http://rdf.cltl.nl/dfn/"
//! language = "nld"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{LexiconError, Result};

/// How new LU identifiers are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Largest existing id plus one
    #[default]
    Scan,
    /// Current epoch time in milliseconds
    Clock,
}

impl IdStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::Scan => "scan",
            IdStrategy::Clock => "clock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "scan" => Some(IdStrategy::Scan),
            "clock" => Some(IdStrategy::Clock),
            _ => None,
        }
    }
}

/// What `add_lu` does when the lemma and POS already exist in the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Log a warning and return `false`
    #[default]
    Warn,
    /// Fail with [`LexiconError::Duplicate`]
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RdfConfig {
    /// Base namespace of minted URIs, must end with `/`
    pub namespace: String,
    /// `eng` or `nld`
    pub language: String,
    pub major_version: u32,
    pub minor_version: u32,
    /// Namespace of frame URIs referenced by `ontolex:evokes`
    pub frame_namespace: String,
}

impl Default for RdfConfig {
    fn default() -> Self {
        Self {
            namespace: "http://rdf.cltl.nl/dfn/".to_string(),
            language: "nld".to_string(),
            major_version: 0,
            minor_version: 1,
            frame_namespace: "http://premon.fbk.eu/resource/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub id_strategy: IdStrategy,
    pub duplicate_policy: DuplicatePolicy,
    /// Hold an exclusive lock on `.lexicon.lock` during each add or remove
    pub lock: bool,
    pub rdf: RdfConfig,
}

impl LexiconConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LexiconError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }
}
