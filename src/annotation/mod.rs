//! Import of frame annotations from NAF documents.
//!
//! Each non-deprecated `srl/predicate` whose most recent FrameNet 1.7
//! reference names a frame of the lexicon becomes an `annotationSet` of a
//! full-text document `fulltext/{corpus}__{document}.xml`, registered in
//! `fulltextIndex.xml`. The predicate's LU is taken from the `lu_uri` of
//! the reference, or looked up by frame, lemma and POS.

mod fulltext;
pub mod naf;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::LexiconContext;
use crate::error::{LexiconError, Result};
use crate::loader::{Frame, Lexicon};
use crate::lookup::get_luid;
use crate::rdf::frame_uri;
use crate::timestamp::format_cdate;
use crate::writer::{acquire_lock, StagedWrites};
use crate::xml;

use fulltext::AnnotationSet;
pub use fulltext::{annotation_set_id, sentence_id, setup_fulltext};
pub use naf::{framenet_pos, rebuild_sentence, NafDocument};

/// Status written for predicates that carry none.
const DEFAULT_STATUS: &str = "MANUAL";

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Short corpus name, e.g. `HDD`
    pub corpus_name: String,
    pub corpus_description: String,
    /// Replace the document when it was imported before
    pub overwrite: bool,
    /// Discard every full-text file of the lexicon first
    pub start_from_scratch: bool,
}

impl ImportOptions {
    pub fn new(corpus_name: impl Into<String>, corpus_description: impl Into<String>) -> Self {
        Self {
            corpus_name: corpus_name.into(),
            corpus_description: corpus_description.into(),
            overwrite: false,
            start_from_scratch: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_start_from_scratch(mut self, start_from_scratch: bool) -> Self {
        self.start_from_scratch = start_from_scratch;
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub corpus_id: u64,
    pub document_id: u64,
    pub document: PathBuf,
    pub sentences: usize,
    pub annotation_sets: usize,
    /// Predicates without a usable frame or LU
    pub skipped: usize,
}

/// Imports the frame annotations of `naf_path` into the lexicon at `root`.
///
/// The full-text index and stylesheet are set up from the source lexicon
/// of `context` on first use. Fails with [`LexiconError::DocumentExists`]
/// when the document was imported before and `overwrite` is not set.
pub fn import_naf(
    root: &Path,
    context: &LexiconContext,
    naf_path: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    let _lock = acquire_lock(root, context.config())?;

    let lexicon = Lexicon::load(root)?;
    let naf = NafDocument::read(naf_path)?;
    let doc_name = file_name(naf_path)?;
    let doc_stem = naf_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| doc_name.clone());

    let paths = lexicon.paths();
    setup_fulltext(paths, context.source().paths(), options.start_from_scratch)?;

    let mut index = xml::read_document(&paths.fulltext_index)?;
    let corpus = fulltext::corpus_id(&index.root, &options.corpus_name, &options.corpus_description)?;
    let document = fulltext::document_id(&index.root, corpus.id, &doc_name)?;
    let document_path = paths.fulltext_file(&options.corpus_name, &doc_stem);

    if (!document.is_new || document_path.exists()) && !options.overwrite {
        return Err(LexiconError::DocumentExists {
            corpus: options.corpus_name.clone(),
            document: doc_name,
        });
    }

    let (by_sentence, skipped) = collect_annotations(&lexicon, context, &naf, document.id);

    let corpus_ref = (
        options.corpus_name.as_str(),
        options.corpus_description.as_str(),
        corpus.id,
    );
    let mut output = fulltext::new_document(corpus_ref, (&doc_name, document.id));
    let mut annotation_sets = 0;
    for (sentence_no, annotations) in &by_sentence {
        let Some(sentence) = naf.sentences.get(sentence_no) else {
            continue;
        };
        xml::append(
            &mut output.root,
            fulltext::sentence_element(
                (corpus.id, document.id),
                *sentence_no,
                &sentence.text,
                annotations,
            ),
        );
        annotation_sets += annotations.len();
    }

    let mut staged = StagedWrites::new();
    if document.is_new {
        fulltext::register_document(&mut index.root, corpus_ref, (&doc_name, document.id))?;
        staged.write_document(paths.fulltext_index.clone(), &index)?;
    }
    staged.write_document(document_path.clone(), &output)?;
    staged.commit()?;

    let summary = ImportSummary {
        corpus_id: corpus.id,
        document_id: document.id,
        document: document_path,
        sentences: by_sentence.len(),
        annotation_sets,
        skipped,
    };
    info!(
        "Imported {} into corpus {}: {} sentences, {} annotation sets, {} predicates skipped",
        doc_name, options.corpus_name, summary.sentences, summary.annotation_sets, summary.skipped
    );
    Ok(summary)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| LexiconError::InvalidArgument(format!("not a file: {}", path.display())))
}

/// Annotation sets per NAF sentence, and the number of skipped predicates.
fn collect_annotations(
    lexicon: &Lexicon,
    context: &LexiconContext,
    naf: &NafDocument,
    document_id: u64,
) -> (BTreeMap<u32, Vec<AnnotationSet>>, usize) {
    let rdf = &context.config().rdf;
    let frames: HashMap<String, &Frame> = lexicon
        .frames()
        .map(|frame| (frame_uri(rdf, &frame.name), frame))
        .collect();

    let mut by_sentence: BTreeMap<u32, Vec<AnnotationSet>> = BTreeMap::new();
    let mut counter: u64 = 0;
    let mut skipped = 0;

    for predicate in &naf.predicates {
        if predicate.is_deprecated() {
            debug!("Predicate {} is deprecated, ignored", predicate.id);
            continue;
        }
        let resolved = resolve(lexicon, &frames, naf, predicate);
        let (frame, lu_id, reference, markable) = match resolved {
            Ok(resolved) => resolved,
            Err(reason) => {
                warn!("Predicate {} skipped: {}", predicate.id, reason);
                skipped += 1;
                continue;
            }
        };
        let Some(sentence) = markable.spans.first().map(|span| span.sentence) else {
            warn!("Predicate {} skipped: target has no tokens", predicate.id);
            skipped += 1;
            continue;
        };
        let lu_name = lexicon
            .lu(lu_id)
            .map(|lu| lu.name.clone())
            .unwrap_or_default();

        counter += 1;
        by_sentence.entry(sentence).or_default().push(AnnotationSet {
            id: annotation_set_id(document_id, sentence, counter),
            unannotated_id: annotation_set_id(document_id, sentence, counter - 1),
            cdate: format_cdate(reference.timestamp.and_utc()),
            lu_id,
            lu_name,
            frame_id: frame.id,
            frame_name: frame.name.clone(),
            status: predicate
                .status
                .clone()
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            created_by: reference.source.clone().unwrap_or_default(),
            spans: markable.spans.clone(),
        });
    }
    (by_sentence, skipped)
}

type Resolved<'a> = (&'a Frame, u64, &'a naf::FrameReference, &'a naf::Markable);

fn resolve<'a>(
    lexicon: &Lexicon,
    frames: &HashMap<String, &'a Frame>,
    naf: &'a NafDocument,
    predicate: &'a naf::Predicate,
) -> std::result::Result<Resolved<'a>, String> {
    let reference = predicate
        .reference
        .as_ref()
        .ok_or_else(|| format!("no {} reference", naf::PREMON_FN17))?;
    let frame = frames
        .get(&reference.frame_uri)
        .copied()
        .ok_or_else(|| format!("frame {} is not part of the lexicon", reference.frame_uri))?;
    let markable = naf
        .markables
        .get(&predicate.target)
        .ok_or_else(|| format!("unknown target {}", predicate.target))?;
    let lu_id = resolve_lu(lexicon, frame, reference, markable)?;
    Ok((frame, lu_id, reference, markable))
}

fn resolve_lu(
    lexicon: &Lexicon,
    frame: &Frame,
    reference: &naf::FrameReference,
    markable: &naf::Markable,
) -> std::result::Result<u64, String> {
    if let Some(lu_uri) = &reference.lu_uri {
        let id: u64 = lu_uri
            .rsplit_once('-')
            .and_then(|(_, id)| id.parse().ok())
            .ok_or_else(|| format!("cannot read an LU id from {}", lu_uri))?;
        return match lexicon.lu(id) {
            Ok(lu) if lu.frame_name == frame.name => Ok(id),
            Ok(lu) => Err(format!(
                "LU {} evokes {}, not {}",
                id, lu.frame_name, frame.name
            )),
            Err(_) => Err(format!("LU {} is not part of the lexicon", id)),
        };
    }

    let lemma = markable.lemma.as_deref().ok_or("target has no lemma")?;
    let tag = markable.pos.as_deref().ok_or("target has no pos")?;
    let pos = framenet_pos(tag).ok_or_else(|| format!("unknown pos {}", tag))?;
    let lookup = get_luid(lexicon, &frame.name, lemma, pos.as_str());
    lookup.id().ok_or_else(|| {
        format!(
            "{}.{} in {}: {}",
            lemma,
            pos.suffix(),
            frame.name,
            lookup.reason()
        )
    })
}
