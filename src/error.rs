use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("XML write error in {path}: {message}")]
    XmlWrite { path: PathBuf, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation failed:\n{}", format_violations(.0))]
    Validation(Vec<ValidationError>),

    #[error("{kind} not found: {name}{}", .suggestion.as_ref().map(|s| format!(" (did you mean {s}?)")).unwrap_or_default())]
    NotFound {
        kind: &'static str,
        name: String,
        suggestion: Option<String>,
    },

    #[error("{lemma}.{pos} is already part of frame {frame}")]
    Duplicate {
        lemma: String,
        pos: String,
        frame: String,
    },

    #[error("LU {lu_id} is referenced by the lexemes of LU(s) {referenced_by:?}")]
    ReferentialIntegrity { lu_id: u64, referenced_by: Vec<u64> },

    #[error(
        "Consistency violation in {location} for LU {lu_id}: expected {expected} matching element(s), found {found}; the lexicon needs manual repair"
    )]
    ConsistencyViolation {
        location: PathBuf,
        lu_id: u64,
        expected: usize,
        found: usize,
    },

    #[error("Frame {frame} has no lexical unit in the source lexicon to use as template")]
    MissingTemplate { frame: String },

    #[error("NAF error in {path}: {message}")]
    Naf { path: PathBuf, message: String },

    #[error("Corpus {name} exists with description {existing:?}, not {requested:?}")]
    CorpusMismatch {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("Document {document} already exists in corpus {corpus}; use overwrite to replace it")]
    DocumentExists { corpus: String, document: String },

    #[error("Lexicon at {0} is locked by another writer")]
    Locked(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LexiconError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        LexiconError::NotFound {
            kind,
            name: name.into(),
            suggestion: None,
        }
    }
}

impl From<ValidationError> for LexiconError {
    fn from(err: ValidationError) -> Self {
        LexiconError::Validation(vec![err])
    }
}

fn format_violations(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, LexiconError>;
