//! Consistency-preserving editing of FrameNet-style lexicons.
//!
//! A lexicon is a directory of interlinked XML files (`luIndex.xml`,
//! `frame/*.xml`, `lu/lu{ID}.xml`). This crate loads it, validates
//! insertion requests, allocates identifiers and adds or removes lexical
//! units in all three locations at once. Frame annotations of NAF
//! documents can be imported as full-text annotation.

pub mod annotation;
pub mod batch;
pub mod config;
pub mod consistency;
pub mod context;
pub mod error;
pub mod ids;
pub mod loader;
pub mod lookup;
pub mod model;
pub mod paths;
pub mod rdf;
pub mod request;
pub mod stats;
pub mod timestamp;
pub mod validation;
pub mod writer;
pub mod xml;

pub use annotation::{import_naf, ImportOptions, ImportSummary};
pub use batch::{add_lus, add_lus_from_json, BatchSummary, EntryOutcome, LuEntry};
pub use config::{DuplicatePolicy, IdStrategy, LexiconConfig, RdfConfig};
pub use consistency::{check_consistency, ConsistencyIssue, ConsistencyReport};
pub use context::LexiconContext;
pub use error::{LexiconError, Result};
pub use ids::{lemma_id, next_lu_id, next_lu_id_by_clock, next_lu_id_by_scan};
pub use loader::{Frame, FrameElement, LexUnit, Lexicon, LuIndexEntry};
pub use lookup::{get_luid, LuidLookup};
pub use model::{
    compose_lu_name, reconstruct_lemma, split_lu_name, ExtraAttributes, Lexeme, LuType, Pos,
    RawLexeme, Separator, Status,
};
pub use paths::LexiconPaths;
pub use request::{AddLuRequest, ValidatedLu};
pub use validation::{validate_order_attr, validate_request, ValidationError};
pub use writer::{add_lu, initialize, remove_lu};
