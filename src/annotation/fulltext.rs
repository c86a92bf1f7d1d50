//! `fulltextIndex.xml` bookkeeping and the annotation documents under
//! `fulltext/`.

use std::fs;

use tracing::debug;

use super::naf::Span;
use crate::error::{LexiconError, Result};
use crate::paths::LexiconPaths;
use crate::xml::{self, Document, Element, FN_NAMESPACE};

const FRAME_LAYERS: &[&str] = &["FE", "GF", "PT", "Other", "Sent", "Verb"];
const UNANNOTATED_LAYERS: &[&str] = &["PENN", "NER", "WSL"];

/// Copies the full-text stylesheet and an index without corpora from
/// `source`, and creates `fulltext/`. Existing files are kept unless
/// `start_from_scratch` is set.
pub fn setup_fulltext(
    target: &LexiconPaths,
    source: &LexiconPaths,
    start_from_scratch: bool,
) -> Result<()> {
    if start_from_scratch {
        for file in [&target.fulltext_index_xsl, &target.fulltext_index] {
            if file.exists() {
                fs::remove_file(file)?;
                debug!("Removed {}", file.display());
            }
        }
        if target.fulltext_dir.exists() {
            fs::remove_dir_all(&target.fulltext_dir)?;
            debug!("Removed {}", target.fulltext_dir.display());
        }
    }

    if !target.fulltext_index_xsl.exists() {
        if !source.fulltext_index_xsl.exists() {
            return Err(LexiconError::not_found(
                "file",
                source.fulltext_index_xsl.to_string_lossy().to_string(),
            ));
        }
        fs::copy(&source.fulltext_index_xsl, &target.fulltext_index_xsl)?;
    }

    if !target.fulltext_dir.exists() {
        fs::create_dir_all(&target.fulltext_dir)?;
        debug!("Created {}", target.fulltext_dir.display());
    }

    if !target.fulltext_index.exists() {
        let mut index = xml::read_document(&source.fulltext_index)?;
        xml::remove_children(&mut index.root, |el| el.local_name() == "corpus");
        xml::write_document(&target.fulltext_index, &index)?;
        debug!("Copied {} without corpora", source.fulltext_index.display());
    }
    Ok(())
}

/// An id taken from the index, or the next free one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexId {
    pub id: u64,
    pub is_new: bool,
}

fn parse_id(element: &Element) -> Option<u64> {
    xml::attr(element, "ID").and_then(|id| id.trim().parse().ok())
}

fn next_id<'a>(elements: impl Iterator<Item = &'a Element>) -> u64 {
    elements.filter_map(parse_id).max().map_or(1, |max| max + 1)
}

fn find_by_name<'a>(
    mut elements: impl Iterator<Item = &'a Element>,
    kind: &str,
    name: &str,
) -> Result<Option<&'a Element>> {
    let Some(found) = elements.find(|el| xml::attr(el, "name") == Some(name)) else {
        return Ok(None);
    };
    if elements.any(|el| xml::attr(el, "name") == Some(name)) {
        return Err(LexiconError::InvalidArgument(format!(
            "{} {} occurs more than once in fulltextIndex.xml",
            kind, name
        )));
    }
    Ok(Some(found))
}

/// Corpus `name` of the index. A known corpus must carry `description`.
pub(crate) fn corpus_id(index: &Element, name: &str, description: &str) -> Result<IndexId> {
    match find_by_name(xml::children(index, "corpus"), "corpus", name)? {
        Some(corpus) => {
            let existing = xml::attr(corpus, "description").unwrap_or_default();
            if existing != description {
                return Err(LexiconError::CorpusMismatch {
                    name: name.to_string(),
                    existing: existing.to_string(),
                    requested: description.to_string(),
                });
            }
            let id = parse_id(corpus).ok_or_else(|| {
                LexiconError::InvalidArgument(format!("corpus {} has no numeric ID", name))
            })?;
            Ok(IndexId { id, is_new: false })
        }
        None => Ok(IndexId {
            id: next_id(xml::children(index, "corpus")),
            is_new: true,
        }),
    }
}

/// Document `name` of corpus `corpus_id`. New documents are numbered
/// across all corpora.
pub(crate) fn document_id(index: &Element, corpus_id: u64, name: &str) -> Result<IndexId> {
    let corpus = xml::children(index, "corpus").find(|el| parse_id(el) == Some(corpus_id));
    if let Some(corpus) = corpus {
        if let Some(document) = find_by_name(xml::children(corpus, "document"), "document", name)? {
            let id = parse_id(document).ok_or_else(|| {
                LexiconError::InvalidArgument(format!("document {} has no numeric ID", name))
            })?;
            return Ok(IndexId { id, is_new: false });
        }
    }

    let all_documents = xml::children(index, "corpus").flat_map(|el| xml::children(el, "document"));
    Ok(IndexId {
        id: next_id(all_documents),
        is_new: true,
    })
}

fn corpus_element(name: &str, description: &str, id: u64) -> Element {
    xml::with_attrs(
        Element::new("corpus"),
        [
            ("description", description.to_string()),
            ("name", name.to_string()),
            ("ID", id.to_string()),
        ],
    )
}

fn document_element(name: &str, id: u64) -> Element {
    xml::with_attrs(
        Element::new("document"),
        [
            ("description", name.to_string()),
            ("name", name.to_string()),
            ("ID", id.to_string()),
        ],
    )
}

/// Registers a document, and its corpus when the corpus is new.
pub(crate) fn register_document(
    index: &mut Element,
    corpus: (&str, &str, u64),
    document: (&str, u64),
) -> Result<()> {
    let (corpus_name, corpus_description, corpus_id) = corpus;
    let existing = index
        .children
        .iter()
        .any(|node| matches!(node, xml::Node::Element(el) if el.local_name() == "corpus" && parse_id(el) == Some(corpus_id)));
    if !existing {
        xml::append(index, corpus_element(corpus_name, corpus_description, corpus_id));
    }

    let corpus = index
        .children
        .iter_mut()
        .find_map(|node| match node {
            xml::Node::Element(el) if el.local_name() == "corpus" && parse_id(el) == Some(corpus_id) => {
                Some(el)
            }
            _ => None,
        })
        .ok_or_else(|| LexiconError::not_found("corpus", corpus_name))?;
    xml::append(corpus, document_element(document.0, document.1));
    Ok(())
}

/// One frame annotation of a predicate.
#[derive(Debug, Clone)]
pub(crate) struct AnnotationSet {
    pub id: String,
    /// Id of the `UNANN` set that precedes the first set of a sentence
    pub unannotated_id: String,
    pub cdate: String,
    pub lu_id: u64,
    pub lu_name: String,
    pub frame_id: u64,
    pub frame_name: String,
    pub status: String,
    pub created_by: String,
    pub spans: Vec<Span>,
}

/// `{document}{sentence:08}`
pub fn sentence_id(document_id: u64, sentence: u32) -> String {
    format!("{}{:08}", document_id, sentence)
}

/// `{document}{sentence:08}{counter:08}`; the counter runs over the whole
/// document.
pub fn annotation_set_id(document_id: u64, sentence: u32, counter: u64) -> String {
    format!("{}{:08}", sentence_id(document_id, sentence), counter)
}

/// An empty `fullTextAnnotation` document with its corpus header.
pub(crate) fn new_document(corpus: (&str, &str, u64), document: (&str, u64)) -> Document {
    let (corpus_name, corpus_description, corpus_id) = corpus;
    let mut header_corpus = corpus_element(corpus_name, corpus_description, corpus_id);
    xml::append(&mut header_corpus, document_element(document.0, document.1));
    let mut header = Element::new("header");
    xml::append(&mut header, header_corpus);

    let mut root = xml::with_attrs(
        Element::new("fullTextAnnotation"),
        [("xmlns", FN_NAMESPACE.to_string())],
    );
    xml::append(&mut root, header);
    Document::new(root)
}

fn layer(name: &str) -> Element {
    xml::with_attrs(
        Element::new("layer"),
        [("rank", "1".to_string()), ("name", name.to_string())],
    )
}

fn unannotated_set(id: &str, cdate: &str) -> Element {
    let mut set = xml::with_attrs(
        Element::new("annotationSet"),
        [
            ("cDate", cdate.to_string()),
            ("status", "UNANN".to_string()),
            ("ID", id.to_string()),
        ],
    );
    for name in UNANNOTATED_LAYERS {
        xml::append(&mut set, layer(name));
    }
    set
}

fn frame_set(annotation: &AnnotationSet) -> Element {
    let mut set = xml::with_attrs(
        Element::new("annotationSet"),
        [
            ("cDate", annotation.cdate.clone()),
            ("luID", annotation.lu_id.to_string()),
            ("luName", annotation.lu_name.clone()),
            ("frameID", annotation.frame_id.to_string()),
            ("frameName", annotation.frame_name.clone()),
            ("status", annotation.status.clone()),
            ("ID", annotation.id.clone()),
        ],
    );

    let mut target = layer("Target");
    for span in &annotation.spans {
        xml::append(
            &mut target,
            xml::with_attrs(
                Element::new("label"),
                [
                    ("cBy", annotation.created_by.clone()),
                    ("start", span.start.to_string()),
                    ("end", span.end.to_string()),
                    ("name", "Target".to_string()),
                ],
            ),
        );
    }
    xml::append(&mut set, target);
    for name in FRAME_LAYERS {
        xml::append(&mut set, layer(name));
    }
    set
}

/// A `<sentence>` with its text, an `UNANN` set and one set per annotation.
pub(crate) fn sentence_element(
    ids: (u64, u64),
    sentence_no: u32,
    text: &str,
    annotations: &[AnnotationSet],
) -> Element {
    let (corpus_id, document_id) = ids;
    let mut sentence = xml::with_attrs(
        Element::new("sentence"),
        [
            ("corpID", corpus_id.to_string()),
            ("docID", document_id.to_string()),
            ("sentNo", sentence_no.to_string()),
            ("paragNo", "0".to_string()),
            ("aPos", "0".to_string()),
            ("ID", sentence_id(document_id, sentence_no)),
        ],
    );
    let mut text_el = Element::new("text");
    xml::set_text(&mut text_el, text);
    xml::append(&mut sentence, text_el);

    if let Some(first) = annotations.first() {
        xml::append(&mut sentence, unannotated_set(&first.unannotated_id, &first.cdate));
    }
    for annotation in annotations {
        xml::append(&mut sentence, frame_set(annotation));
    }
    sentence
}
