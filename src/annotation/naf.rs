//! Reading of NAF documents: tokens, sentences, markables and predicates.
//!
//! Only the layers frame annotation needs are read: `text/wf` (with
//! subtokens), `terms/term` (with components), `multiwords/mw` and
//! `srl/predicate`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::{LexiconError, Result};
use crate::model::Pos;
use crate::xml::{self, Element};

/// `resource` of the external references that carry a FrameNet 1.7 frame.
pub const PREMON_FN17: &str = "http://premon.fbk.eu/premon/fn17";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: String,
    pub offset: usize,
    pub length: usize,
    pub text: String,
}

/// One NAF sentence, rebuilt from its tokens.
#[derive(Debug, Clone)]
pub struct NafSentence {
    pub number: u32,
    /// Document offset of the first token
    pub start: usize,
    pub tokens: Vec<Token>,
    pub text: String,
}

/// Characters `start..=end` of sentence `sentence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub sentence: u32,
    pub start: usize,
    pub end: usize,
}

/// A term, term component or multiword, resolved to sentence offsets.
#[derive(Debug, Clone)]
pub struct Markable {
    pub lemma: Option<String>,
    pub pos: Option<String>,
    pub spans: Vec<Span>,
}

/// The most recent FrameNet 1.7 reference of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReference {
    pub frame_uri: String,
    pub source: Option<String>,
    pub timestamp: NaiveDateTime,
    pub lu_uri: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Predicate {
    pub id: String,
    pub status: Option<String>,
    /// Term, component or multiword id of `span/target`
    pub target: String,
    pub reference: Option<FrameReference>,
}

impl Predicate {
    pub fn is_deprecated(&self) -> bool {
        self.status.as_deref() == Some("deprecated")
    }
}

#[derive(Debug, Clone)]
pub struct NafDocument {
    pub path: PathBuf,
    /// `xml:lang` of the root
    pub language: Option<String>,
    pub sentences: BTreeMap<u32, NafSentence>,
    pub markables: HashMap<String, Markable>,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy)]
struct TokenPosition {
    sentence: u32,
    offset: usize,
    length: usize,
}

fn naf_error(path: &Path, message: impl Into<String>) -> LexiconError {
    LexiconError::Naf {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn required<'a>(element: &'a Element, key: &str, path: &Path) -> Result<&'a str> {
    xml::attr(element, key)
        .ok_or_else(|| naf_error(path, format!("<{}> has no {} attribute", element.name, key)))
}

fn number<T: FromStr>(element: &Element, key: &str, path: &Path) -> Result<T> {
    let value = required(element, key, path)?;
    value.trim().parse().map_err(|_| {
        naf_error(
            path,
            format!("{} of <{}> is not a number: {:?}", key, element.name, value),
        )
    })
}

impl NafDocument {
    pub fn read(path: &Path) -> Result<Self> {
        let document = xml::read_document(path)?;
        Self::from_root(&document.root, path)
    }

    /// Parses NAF content; `path` names the document in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let document = xml::parse_document(content, path)?;
        Self::from_root(&document.root, path)
    }

    fn from_root(root: &Element, path: &Path) -> Result<Self> {
        let (sentences, positions) = read_sentences(root, path)?;
        let markables = read_markables(root, path, &sentences, &positions)?;
        let predicates = read_predicates(root, path)?;

        Ok(Self {
            path: path.to_path_buf(),
            language: xml::attr(root, "xml:lang").map(str::to_string),
            sentences,
            markables,
            predicates,
        })
    }
}

fn read_sentences(
    root: &Element,
    path: &Path,
) -> Result<(BTreeMap<u32, NafSentence>, HashMap<String, TokenPosition>)> {
    let mut sentences: BTreeMap<u32, NafSentence> = BTreeMap::new();
    let mut positions = HashMap::new();

    for wf in xml::descendants(root, &["text", "wf"]) {
        let sentence: u32 = number(wf, "sent", path)?;
        let token = Token {
            id: required(wf, "id", path)?.to_string(),
            offset: number(wf, "offset", path)?,
            length: number(wf, "length", path)?,
            text: xml::text(wf),
        };

        positions.insert(
            token.id.clone(),
            TokenPosition {
                sentence,
                offset: token.offset,
                length: token.length,
            },
        );
        for subtoken in xml::children(wf, "subtoken") {
            positions.insert(
                required(subtoken, "id", path)?.to_string(),
                TokenPosition {
                    sentence,
                    offset: number(subtoken, "offset", path)?,
                    length: number(subtoken, "length", path)?,
                },
            );
        }

        // the first token seen fixes the sentence start
        let start = token.offset;
        sentences
            .entry(sentence)
            .or_insert_with(|| NafSentence {
                number: sentence,
                start,
                tokens: Vec::new(),
                text: String::new(),
            })
            .tokens
            .push(token);
    }

    for sentence in sentences.values_mut() {
        sentence.text = rebuild_sentence(&sentence.tokens, path)?;
    }
    Ok((sentences, positions))
}

/// Joins tokens with as many spaces as their offsets leave between them.
/// Overlapping tokens are an error.
pub fn rebuild_sentence(tokens: &[Token], path: &Path) -> Result<String> {
    let mut sentence = String::new();
    let mut previous: Option<&Token> = None;

    for token in tokens {
        if let Some(prev) = previous {
            let prev_end = prev.offset + prev.length;
            if token.offset < prev_end {
                return Err(naf_error(
                    path,
                    format!(
                        "please check the offsets of {:?} and {:?} (delta of -{})",
                        prev.text,
                        token.text,
                        prev_end - token.offset
                    ),
                ));
            }
            sentence.push_str(&" ".repeat(token.offset - prev_end));
        }
        sentence.push_str(&token.text);
        previous = Some(token);
    }
    Ok(sentence)
}

fn target_ids<'a>(element: &'a Element, path: &Path) -> Result<Vec<&'a str>> {
    xml::descendants(element, &["span", "target"])
        .into_iter()
        .map(|target| required(target, "id", path))
        .collect()
}

fn read_markables(
    root: &Element,
    path: &Path,
    sentences: &BTreeMap<u32, NafSentence>,
    positions: &HashMap<String, TokenPosition>,
) -> Result<HashMap<String, Markable>> {
    let span_of = |token_id: &str| -> Result<Span> {
        let position = positions
            .get(token_id)
            .ok_or_else(|| naf_error(path, format!("unknown token {}", token_id)))?;
        let sentence = sentences
            .get(&position.sentence)
            .ok_or_else(|| naf_error(path, format!("unknown sentence {}", position.sentence)))?;
        let start = position.offset.checked_sub(sentence.start).ok_or_else(|| {
            naf_error(
                path,
                format!("token {} starts before its sentence", token_id),
            )
        })?;
        Ok(Span {
            sentence: position.sentence,
            start,
            end: (start + position.length).saturating_sub(1),
        })
    };

    let mut term_tokens: HashMap<String, Vec<String>> = HashMap::new();
    let mut markables = HashMap::new();

    let mut add = |element: &Element, markables: &mut HashMap<String, Markable>| -> Result<()> {
        let id = required(element, "id", path)?.to_string();
        let tokens = target_ids(element, path)?;
        let spans = tokens
            .iter()
            .map(|token| span_of(*token))
            .collect::<Result<Vec<_>>>()?;
        term_tokens.insert(id.clone(), tokens.into_iter().map(str::to_string).collect());
        markables.insert(
            id,
            Markable {
                lemma: xml::attr(element, "lemma").map(str::to_string),
                pos: xml::attr(element, "pos").map(str::to_string),
                spans,
            },
        );
        Ok(())
    };

    for term in xml::descendants(root, &["terms", "term"]) {
        add(term, &mut markables)?;
        for component in xml::children(term, "component") {
            add(component, &mut markables)?;
        }
    }

    for mw in xml::descendants(root, &["multiwords", "mw"]) {
        let id = required(mw, "id", path)?;
        let mut tokens: Vec<&str> = Vec::new();
        for term_id in xml::descendants(mw, &["component", "span", "target"])
            .into_iter()
            .map(|target| required(target, "id", path))
        {
            let term_id = term_id?;
            let term = term_tokens
                .get(term_id)
                .ok_or_else(|| naf_error(path, format!("multiword {} refers to unknown term {}", id, term_id)))?;
            for token in term {
                if !tokens.contains(&token.as_str()) {
                    tokens.push(token);
                }
            }
        }

        let spans = tokens
            .iter()
            .map(|token| span_of(*token))
            .collect::<Result<Vec<_>>>()?;
        if spans.windows(2).any(|pair| pair[0].sentence != pair[1].sentence) {
            return Err(naf_error(
                path,
                format!("multiword {} is in 2 or more sentences", id),
            ));
        }
        markables.insert(
            id.to_string(),
            Markable {
                lemma: xml::attr(mw, "lemma").map(str::to_string),
                pos: xml::attr(mw, "pos").map(str::to_string),
                spans,
            },
        );
    }

    Ok(markables)
}

fn read_predicates(root: &Element, path: &Path) -> Result<Vec<Predicate>> {
    let mut predicates = Vec::new();
    for predicate in xml::descendants(root, &["srl", "predicate"]) {
        let id = xml::attr(predicate, "id").unwrap_or_default().to_string();
        let target = target_ids(predicate, path)?
            .first()
            .map(|target| target.to_string())
            .ok_or_else(|| naf_error(path, format!("predicate {} has no span target", id)))?;

        predicates.push(Predicate {
            status: xml::attr(predicate, "status").map(str::to_string),
            target,
            reference: most_recent_reference(predicate, path)?,
            id,
        });
    }
    Ok(predicates)
}

/// The FrameNet 1.7 reference with the latest timestamp; the first one
/// wins a tie.
fn most_recent_reference(predicate: &Element, path: &Path) -> Result<Option<FrameReference>> {
    let mut most_recent: Option<FrameReference> = None;

    for reference in xml::descendants(predicate, &["externalReferences", "externalRef"]) {
        if xml::attr(reference, "resource") != Some(PREMON_FN17) {
            continue;
        }
        let raw = required(reference, "timestamp", path)?;
        let timestamp = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| naf_error(path, format!("bad timestamp {:?}: {}", raw, e)))?;

        if most_recent
            .as_ref()
            .map_or(true, |current| timestamp > current.timestamp)
        {
            most_recent = Some(FrameReference {
                frame_uri: required(reference, "reference", path)?.to_string(),
                source: xml::attr(reference, "source").map(str::to_string),
                timestamp,
                lu_uri: xml::attr(reference, "lu_uri").map(str::to_string),
            });
        }
    }
    Ok(most_recent)
}

/// FrameNet POS of a NAF `pos` value: a FrameNet tag as is, or a
/// Universal Dependencies tag.
pub fn framenet_pos(tag: &str) -> Option<Pos> {
    if let Some(pos) = Pos::from_str(tag) {
        return Some(pos);
    }
    let pos = match tag {
        "NOUN" | "PROPN" => Pos::N,
        "VERB" | "AUX" => Pos::V,
        "ADJ" => Pos::A,
        "ADV" => Pos::Adv,
        "ADP" => Pos::Prep,
        "NUM" => Pos::Num,
        "PRON" => Pos::Pron,
        "CCONJ" => Pos::C,
        "SCONJ" => Pos::Scon,
        "INTJ" => Pos::Intj,
        "DET" => Pos::Art,
        _ => return None,
    };
    Some(pos)
}
