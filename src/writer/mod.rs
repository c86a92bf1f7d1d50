//! Multi-file write orchestration.
//!
//! A lexical unit lives in three places at once: a `<lu>` row of
//! `luIndex.xml`, a `<lexUnit>` child of `frame/{frame}.xml` and the
//! standalone document `lu/lu{ID}.xml`. [`add_lu`] and [`remove_lu`] keep
//! the three in a 1:1:1 correspondence.
//!
//! Both operations validate and stage every mutated document in memory
//! first, including the exactly-one-element checks of a removal, and only
//! then flush. Once flushing starts, an I/O failure leaves the lexicon in a
//! state that needs manual repair.

mod elements;
pub mod staging;

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::{DuplicatePolicy, LexiconConfig};
use crate::context::LexiconContext;
use crate::error::{LexiconError, Result};
use crate::ids;
use crate::loader::Lexicon;
use crate::paths::LexiconPaths;
use crate::request::AddLuRequest;
use crate::timestamp::format_cdate;
use crate::validation::validate_request;
use crate::xml;

pub use staging::{LexiconLock, StagedWrites, WriteOp};

/// Creates an empty lexicon at `root` from `source`.
///
/// Any existing directory at `root` is removed first. Index and stylesheet
/// files are copied verbatim, frame files are copied without their
/// `lexUnit` children and `luIndex.xml` without its `lu` rows, so only the
/// frame and frame element definitions remain.
pub fn initialize(root: &Path, source: &Lexicon) -> Result<()> {
    if root.exists() {
        fs::remove_dir_all(root)?;
    }
    let target = LexiconPaths::new(root);
    fs::create_dir_all(&target.lu_dir)?;
    fs::create_dir_all(&target.frame_dir)?;

    let source_paths = source.paths();
    for (from, to) in source_paths.static_files().into_iter().zip(target.static_files()) {
        fs::copy(from, to)?;
    }

    for (frame_name, frame_path) in source_paths.frame_files()? {
        let mut document = xml::read_document(&frame_path)?;
        xml::remove_children(&mut document.root, |el| el.local_name() == "lexUnit");
        xml::write_document(&target.frame_file(&frame_name), &document)?;
    }

    let mut lu_index = xml::read_document(&source_paths.lu_index)?;
    xml::remove_children(&mut lu_index.root, |el| el.local_name() == "lu");
    xml::write_document(&target.lu_index, &lu_index)?;

    info!(
        "Initialized empty lexicon at {} from {}",
        root.display(),
        source.root().display()
    );
    Ok(())
}

/// Adds one lexical unit to the lexicon at `root`.
///
/// Returns `Ok(false)` without touching any file when the lemma and POS
/// already belong to the target frame and the duplicate policy is
/// [`DuplicatePolicy::Warn`]. Validation failures are reported as
/// [`LexiconError::Validation`] with every violation found.
pub fn add_lu(root: &Path, context: &LexiconContext, request: &AddLuRequest) -> Result<bool> {
    let config = context.config();
    let _lock = acquire_lock(root, config)?;

    let lexicon = Lexicon::load(root)?;
    let lu = validate_request(request, &lexicon).map_err(LexiconError::Validation)?;
    let lu_name = lu.lu_name();

    if lexicon.frames_by_lemma(&lu_name).contains(lu.frame.as_str()) {
        match config.duplicate_policy {
            DuplicatePolicy::Warn => {
                warn!("{} is already part of frame {}, not added", lu_name, lu.frame);
                return Ok(false);
            }
            DuplicatePolicy::Abort => {
                return Err(LexiconError::Duplicate {
                    lemma: lu.lemma.clone(),
                    pos: lu.pos.as_str().to_string(),
                    frame: lu.frame.clone(),
                })
            }
        }
    }

    let frame = lexicon.frame_by_name(&lu.frame)?;
    let source = context.source();
    let template_id = source
        .frame_by_name(&lu.frame)?
        .lu_ids
        .first()
        .copied()
        .ok_or_else(|| LexiconError::MissingTemplate {
            frame: lu.frame.clone(),
        })?;

    let lu_id = ids::next_lu_id(&lexicon, config.id_strategy);
    let lemma_id = ids::lemma_id(&lexicon, &lu.lemma, lu.pos);
    let cdate = format_cdate(lu.timestamp.unwrap_or_else(Utc::now));
    debug!(
        "Adding {} to {}: id {}, lemma id {}, template LU {}",
        lu_name, lu.frame, lu_id, lemma_id, template_id
    );

    let paths = lexicon.paths();
    let lu_path = paths.lu_file(lu_id);
    if lu_path.exists() {
        return Err(LexiconError::ConsistencyViolation {
            location: lu_path,
            lu_id,
            expected: 0,
            found: 1,
        });
    }

    let mut staged = StagedWrites::new();

    let template = xml::read_document(&source.paths().lu_file(template_id))?;
    staged.write_document(lu_path, &elements::lu_document(template, &lu, lu_id))?;

    let mut lu_index = xml::read_document(&paths.lu_index)?;
    xml::append(&mut lu_index.root, elements::lu_index_entry(&lu, lu_id, frame));
    staged.write_document(paths.lu_index.clone(), &lu_index)?;

    let frame_path = paths.frame_file(&frame.name);
    let mut frame_doc = xml::read_document(&frame_path)?;
    xml::append(
        &mut frame_doc.root,
        elements::frame_lex_unit(&lu, lu_id, lemma_id, &cdate),
    );
    staged.write_document(frame_path, &frame_doc)?;

    staged.commit()?;
    info!("Added {} (ID {}) to frame {}", lu_name, lu_id, lu.frame);
    Ok(true)
}

/// Removes LU `lu_id` from all three locations.
///
/// Fails with [`LexiconError::ReferentialIntegrity`] while a lexeme of
/// another LU still points at `lu_id`, and with
/// [`LexiconError::ConsistencyViolation`] when a location does not hold
/// exactly one copy of the LU. In both cases no file is touched.
pub fn remove_lu(root: &Path, config: &LexiconConfig, lu_id: u64) -> Result<bool> {
    let _lock = acquire_lock(root, config)?;

    let lexicon = Lexicon::load(root)?;
    let referenced_by: Vec<u64> = lexicon
        .lus()
        .filter(|lu| lu.lexemes.iter().any(|lexeme| lexeme.lu_id == Some(lu_id)))
        .map(|lu| lu.id)
        .collect();
    if !referenced_by.is_empty() {
        return Err(LexiconError::ReferentialIntegrity {
            lu_id,
            referenced_by,
        });
    }

    let lu = lexicon.lu(lu_id)?;
    let paths = lexicon.paths();
    let id = lu_id.to_string();
    let mut staged = StagedWrites::new();

    let frame_path = paths.frame_file(&lu.frame_name);
    let mut frame_doc = xml::read_document(&frame_path)?;
    let removed = xml::remove_children(&mut frame_doc.root, |el| {
        el.local_name() == "lexUnit" && xml::attr(el, "ID") == Some(id.as_str())
    });
    expect_one(&frame_path, lu_id, removed)?;
    staged.write_document(frame_path, &frame_doc)?;

    let lu_path = paths.lu_file(lu_id);
    expect_one(&lu_path, lu_id, usize::from(lu_path.is_file()))?;
    staged.delete(lu_path);

    let mut lu_index = xml::read_document(&paths.lu_index)?;
    let removed = xml::remove_children(&mut lu_index.root, |el| {
        el.local_name() == "lu" && xml::attr(el, "ID") == Some(id.as_str())
    });
    expect_one(&paths.lu_index, lu_id, removed)?;
    staged.write_document(paths.lu_index.clone(), &lu_index)?;

    staged.commit()?;
    info!("Removed {} (ID {}) from frame {}", lu.name, lu_id, lu.frame_name);
    Ok(true)
}

pub(crate) fn acquire_lock(root: &Path, config: &LexiconConfig) -> Result<Option<LexiconLock>> {
    if !config.lock {
        return Ok(None);
    }
    if !root.is_dir() {
        return Err(LexiconError::not_found(
            "lexicon",
            root.to_string_lossy().to_string(),
        ));
    }
    LexiconLock::acquire(&LexiconPaths::new(root).lock_file()).map(Some)
}

fn expect_one(location: &Path, lu_id: u64, found: usize) -> Result<()> {
    if found == 1 {
        Ok(())
    } else {
        Err(LexiconError::ConsistencyViolation {
            location: location.to_path_buf(),
            lu_id,
            expected: 1,
            found,
        })
    }
}
