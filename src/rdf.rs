//! Projection of a lexicon onto the Lemon model, as N-Triples.
//!
//! A lexicon gets the URI `{namespace}fn_{lang}-lexicon-{major}.{minor}`.
//! Lexical entries are minted per `lemmaID`, lexical senses per LU id.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::RdfConfig;
use crate::context::LexiconContext;
use crate::error::{LexiconError, Result};
use crate::loader::{LexUnit, Lexicon};
use crate::model::Pos;
use crate::timestamp::parse_cdate;

pub const SUPPORTED_LANGUAGES: &[&str] = &["eng", "nld"];

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const LIME: &str = "http://www.w3.org/ns/lemon/lime#";
const ONTOLEX: &str = "http://www.w3.org/ns/lemon/ontolex#";
const DECOMP: &str = "http://www.w3.org/ns/lemon/decomp#";
const LEXINFO: &str = "http://www.lexinfo.net/ontology/2.0/lexinfo#";
const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
const DCT: &str = "http://purl.org/dc/terms/";
const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// ISO 639-1 tag used on literals.
fn language_tag(language: &str) -> &'static str {
    match language {
        "eng" => "en",
        _ => "nl",
    }
}

fn validate(config: &RdfConfig) -> Result<()> {
    if !SUPPORTED_LANGUAGES.contains(&config.language.as_str()) {
        return Err(LexiconError::InvalidArgument(format!(
            "the provided language ({}) is not supported: {:?}",
            config.language, SUPPORTED_LANGUAGES
        )));
    }
    if !config.namespace.starts_with("http") {
        return Err(LexiconError::InvalidArgument(format!(
            "namespace {} should start with http",
            config.namespace
        )));
    }
    if !config.namespace.ends_with('/') {
        return Err(LexiconError::InvalidArgument(format!(
            "namespace {} should end with a forward slash",
            config.namespace
        )));
    }
    Ok(())
}

pub fn lexicon_uri(config: &RdfConfig) -> Result<String> {
    validate(config)?;
    Ok(format!(
        "{}fn_{}-lexicon-{}.{}",
        config.namespace, config.language, config.major_version, config.minor_version
    ))
}

/// Lexical entry shared by all LUs with lemma id `lemma_id`.
pub fn le_uri(config: &RdfConfig, lemma_id: u64) -> Result<String> {
    Ok(format!("{}-le-{}", lexicon_uri(config)?, lemma_id))
}

pub fn leform_uri(config: &RdfConfig, lemma_id: u64) -> Result<String> {
    Ok(format!("{}-form", le_uri(config, lemma_id)?))
}

/// Lexical sense of LU `lu_id`, which must be part of `lexicon`.
pub fn lu_uri(lexicon: &Lexicon, config: &RdfConfig, lu_id: u64) -> Result<String> {
    if !lexicon.lu_ids_and_names().contains_key(&lu_id) {
        return Err(LexiconError::not_found("lexical unit", lu_id.to_string()));
    }
    Ok(format!("{}-lu-{}", lexicon_uri(config)?, lu_id))
}

pub fn frame_uri(config: &RdfConfig, frame_name: &str) -> String {
    format!("{}fn17-{}", config.frame_namespace, frame_name.to_lowercase())
}

/// Every LU of `lexicon` as Lemon N-Triples, one sorted statement per line.
pub fn export_ntriples(lexicon: &Lexicon, context: &LexiconContext) -> Result<String> {
    let config = &context.config().rdf;
    let lexicon_uri = lexicon_uri(config)?;
    let tag = language_tag(&config.language);

    let mut triples = Triples::default();
    triples.iri(&lexicon_uri, RDF_TYPE, &format!("{LIME}Lexicon"));
    triples.plain(&lexicon_uri, &format!("{LIME}language"), &config.language);

    for lu in lexicon.lus() {
        let Some(lemma_id) = lu.lemma_id else {
            warn!("LU {} has no lemmaID, skipped", lu.id);
            continue;
        };
        let le = le_uri(config, lemma_id)?;
        let form = leform_uri(config, lemma_id)?;
        let sense = lu_uri(lexicon, config, lu.id)?;

        triples.iri(&lexicon_uri, &format!("{LIME}entry"), &le);
        triples.iri(&le, RDF_TYPE, &format!("{ONTOLEX}LexicalEntry"));
        triples.iri(&le, &format!("{ONTOLEX}canonicalForm"), &form);
        triples.iri(&form, RDF_TYPE, &format!("{ONTOLEX}Form"));
        triples.tagged(&form, &format!("{ONTOLEX}writtenRep"), lu.lemma(), tag);

        if let Some(lexinfo) = Pos::from_str(&lu.pos).and_then(|pos| context.lexinfo_pos(pos)) {
            triples.iri(&le, &format!("{LEXINFO}partOfSpeech"), &format!("{LEXINFO}{lexinfo}"));
        }
        triples.iri(&le, &format!("{ONTOLEX}evokes"), &frame_uri(config, &lu.frame_name));

        triples.iri(&le, &format!("{ONTOLEX}sense"), &sense);
        triples.iri(&sense, RDF_TYPE, &format!("{ONTOLEX}LexicalSense"));
        triples.iri(&sense, &format!("{ONTOLEX}isSenseOf"), &le);
        if !lu.definition.is_empty() {
            triples.tagged(&sense, &format!("{SKOS}definition"), &lu.definition, tag);
        }
        if let Some(created) = created(lu) {
            triples.typed(&sense, &format!("{DCT}created"), &created, XSD_DATE_TIME);
        }
        if let Some(creator) = &lu.created_by {
            triples.plain(&sense, &format!("{DCT}creator"), creator);
        }

        for component in lu.lexemes.iter().filter_map(|l| l.lu_id) {
            match lexicon.lu(component).ok().and_then(|c| c.lemma_id) {
                Some(component_lemma) => {
                    triples.iri(&le, &format!("{DECOMP}subterm"), &le_uri(config, component_lemma)?)
                }
                None => warn!("LU {} refers to unknown component LU {}", lu.id, component),
            }
        }
    }

    debug!("Exported {} triples for {}", triples.len(), lexicon_uri);
    Ok(triples.into_string())
}

fn created(lu: &LexUnit) -> Option<String> {
    let cdate = lu.created_date.as_deref()?;
    match parse_cdate(cdate) {
        Ok(ts) => Some(ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        Err(_) => {
            warn!("LU {} has an unreadable cDate {:?}", lu.id, cdate);
            None
        }
    }
}

/// Deduplicated set of N-Triples statements.
#[derive(Debug, Default)]
struct Triples(BTreeSet<String>);

impl Triples {
    fn iri(&mut self, subject: &str, predicate: &str, object: &str) {
        self.0.insert(format!("<{subject}> <{predicate}> <{object}> ."));
    }

    fn plain(&mut self, subject: &str, predicate: &str, value: &str) {
        self.0
            .insert(format!("<{subject}> <{predicate}> \"{}\" .", escape(value)));
    }

    fn tagged(&mut self, subject: &str, predicate: &str, value: &str, tag: &str) {
        self.0.insert(format!(
            "<{subject}> <{predicate}> \"{}\"@{tag} .",
            escape(value)
        ));
    }

    fn typed(&mut self, subject: &str, predicate: &str, value: &str, datatype: &str) {
        self.0.insert(format!(
            "<{subject}> <{predicate}> \"{}\"^^<{datatype}> .",
            escape(value)
        ));
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn into_string(self) -> String {
        let mut out = String::new();
        for line in self.0 {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
