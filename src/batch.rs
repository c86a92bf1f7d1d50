//! Batch insertion from a JSON document.
//!
//! ```json
//! {"lus": [
//!   {"lu_name": "Mexicaan.n", "frame": "People_by_origin", "pos": "N",
//!    "status": "Created", "provenance": "manual", "lu_type": "singleton",
//!    "definition": "iemand uit Mexico", "timestamp": [2020, 3, 1],
//!    "lexemes": [{"order": "1", "headword": "true", "breakBefore": "false",
//!                 "POS": "N", "name": "Mexicaan"}]}
//! ]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::LexiconContext;
use crate::error::{LexiconError, Result};
use crate::model::{ExtraAttributes, LuType, RawLexeme, Status};
use crate::request::AddLuRequest;
use crate::timestamp::from_ymd;
use crate::writer::add_lu;

#[derive(Debug, Clone, Deserialize)]
pub struct BatchFile {
    pub lus: Vec<LuEntry>,
}

/// One JSON entry, mirroring the arguments of [`add_lu`]. Unknown keys
/// (such as `agent`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LuEntry {
    pub lu_name: String,
    pub lexemes: Vec<RawLexeme>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub pos: String,
    pub frame: String,
    #[serde(default = "default_provenance")]
    pub provenance: String,
    #[serde(default = "default_lu_type")]
    pub lu_type: String,
    #[serde(default)]
    pub incorporated_fe: Option<String>,
    /// `[year, month, day]`
    #[serde(default)]
    pub timestamp: Option<(i32, u32, u32)>,
    #[serde(default, alias = "optional_lu_attrs")]
    pub extra: ExtraAttributes,
}

fn default_status() -> String {
    Status::Created.as_str().to_string()
}

fn default_provenance() -> String {
    "manual".to_string()
}

fn default_lu_type() -> String {
    LuType::Singleton.as_str().to_string()
}

impl LuEntry {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_request(&self) -> Result<AddLuRequest> {
        let mut request = AddLuRequest::new(
            self.lu_name.clone(),
            self.frame.clone(),
            self.pos.clone(),
            self.lexemes.clone(),
        )
        .with_status(self.status.clone())
        .with_provenance(self.provenance.clone())
        .with_lu_type(self.lu_type.clone())
        .with_extra(self.extra.clone());

        if let Some(definition) = &self.definition {
            request = request.with_definition(definition.clone());
        }
        if let Some(fe) = &self.incorporated_fe {
            request = request.with_incorporated_fe(fe.clone());
        }
        if let Some((year, month, day)) = self.timestamp {
            request = request.with_timestamp(from_ymd(year, month, day)?);
        }
        Ok(request)
    }
}

/// What happened to one entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EntryOutcome {
    Added,
    /// Refused under the warn duplicate policy
    Duplicate,
    /// Rejected before any file was touched
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub added: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.added + self.failed
    }
}

/// Adds each entry in turn.
///
/// Entries refused as duplicates or rejected before any write count as
/// failures and the batch goes on. Any other error aborts the batch, since
/// the lexicon may then be partially written.
pub fn add_lus<F>(
    root: &Path,
    context: &LexiconContext,
    entries: &[LuEntry],
    mut on_entry: F,
) -> Result<BatchSummary>
where
    F: FnMut(&LuEntry, &EntryOutcome),
{
    let mut summary = BatchSummary::default();

    for entry in entries {
        let outcome = match entry.to_request().and_then(|request| add_lu(root, context, &request)) {
            Ok(true) => EntryOutcome::Added,
            Ok(false) => EntryOutcome::Duplicate,
            Err(e) if is_entry_error(&e) => EntryOutcome::Failed(e.to_string()),
            Err(e) => return Err(e),
        };

        match &outcome {
            EntryOutcome::Added => summary.added += 1,
            EntryOutcome::Duplicate => summary.failed += 1,
            EntryOutcome::Failed(reason) => {
                warn!("Could not add {}: {}", entry.lu_name, reason);
                summary.failed += 1;
            }
        }
        on_entry(entry, &outcome);
    }

    info!(
        "Batch done: {} added, {} failed",
        summary.added, summary.failed
    );
    Ok(summary)
}

pub fn read_batch_file(json_path: &Path) -> Result<BatchFile> {
    let content = std::fs::read_to_string(json_path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Reads `{"lus": [...]}` from `json_path` and adds every entry.
pub fn add_lus_from_json(
    root: &Path,
    context: &LexiconContext,
    json_path: &Path,
) -> Result<BatchSummary> {
    let batch = read_batch_file(json_path)?;
    add_lus(root, context, &batch.lus, |_, _| {})
}

fn is_entry_error(error: &LexiconError) -> bool {
    matches!(
        error,
        LexiconError::Validation(_)
            | LexiconError::Duplicate { .. }
            | LexiconError::MissingTemplate { .. }
            | LexiconError::InvalidArgument(_)
    )
}
