//! Construction of the three XML views of a new lexical unit.

use std::collections::BTreeMap;

use crate::loader::Frame;
use crate::model::Lexeme;
use crate::request::ValidatedLu;
use crate::xml::{self, Document, Element};

/// Child elements of a template LU document that belong to the template's
/// own LU and are dropped from the clone.
const TEMPLATE_ONLY_CHILDREN: &[&str] = &["lexeme", "valences", "subCorpus", "semType"];

/// `<lexeme>` elements sorted by `order`; one element per position.
pub(crate) fn lexeme_elements(lexemes: &[Lexeme]) -> Vec<Element> {
    let by_order: BTreeMap<u32, &Lexeme> = lexemes.iter().map(|l| (l.order, l)).collect();
    by_order
        .values()
        .map(|lexeme| xml::with_attrs(Element::new("lexeme"), lexeme.attributes()))
        .collect()
}

/// Rewrites a clone of a source LU document (`lu/lu{ID}.xml` of the
/// template LU) into the standalone document of the new LU.
pub(crate) fn lu_document(mut document: Document, lu: &ValidatedLu, lu_id: u64) -> Document {
    let template = &mut document.root;
    xml::set_attr(template, "status", lu.status.as_str());
    xml::set_attr(template, "POS", lu.pos.as_str());
    xml::set_attr(template, "name", lu.lu_name());
    xml::set_attr(template, "totalAnnotated", "0");
    xml::set_attr(template, "ID", lu_id.to_string());
    xml::set_attr(template, "lu_type", lu.lu_type.as_str());
    match &lu.incorporated_fe {
        Some(fe) => xml::set_attr(template, "incorporatedFE", fe.as_str()),
        None => xml::remove_attr(template, "incorporatedFE"),
    }
    for (key, value) in lu.extra.iter() {
        xml::set_attr(template, key, value);
    }

    match xml::child_mut(template, "definition") {
        Some(definition) => xml::set_text(definition, &lu.definition),
        None => {
            let mut definition = Element::new("definition");
            xml::set_text(&mut definition, &lu.definition);
            xml::append(template, definition);
        }
    }

    xml::remove_children(template, |el| TEMPLATE_ONLY_CHILDREN.contains(&el.local_name()));
    if let Some(header) = xml::child_mut(template, "header") {
        xml::remove_children(header, |el| el.local_name() == "corpus");
    }

    for lexeme in lexeme_elements(&lu.lexemes) {
        xml::append(template, lexeme);
    }
    document
}

/// The `<lu>` summary row of `luIndex.xml`.
pub(crate) fn lu_index_entry(lu: &ValidatedLu, lu_id: u64, frame: &Frame) -> Element {
    let element = xml::with_attrs(
        Element::new("lu"),
        [
            ("numAnnotInstances", "0".to_string()),
            ("hasAnnotation", "false".to_string()),
            ("frameID", frame.id.to_string()),
            ("frameName", frame.name.clone()),
            ("status", lu.status.as_str().to_string()),
            ("name", lu.lu_name()),
            ("lu_type", lu.lu_type.as_str().to_string()),
            ("ID", lu_id.to_string()),
        ],
    );
    with_extra(element, lu)
}

/// The `<lexUnit>` child of the frame file.
pub(crate) fn frame_lex_unit(lu: &ValidatedLu, lu_id: u64, lemma_id: u64, cdate: &str) -> Element {
    let mut element = xml::with_attrs(
        Element::new("lexUnit"),
        [
            ("status", lu.status.as_str().to_string()),
            ("POS", lu.pos.as_str().to_string()),
            ("name", lu.lu_name()),
            ("ID", lu_id.to_string()),
            ("lemmaID", lemma_id.to_string()),
            ("cBy", lu.provenance.clone()),
            ("cDate", cdate.to_string()),
            ("lu_type", lu.lu_type.as_str().to_string()),
        ],
    );
    if let Some(fe) = &lu.incorporated_fe {
        xml::set_attr(&mut element, "incorporatedFE", fe.as_str());
    }
    let mut element = with_extra(element, lu);

    let mut definition = Element::new("definition");
    xml::set_text(&mut definition, &lu.definition);
    xml::append(&mut element, definition);
    xml::append(
        &mut element,
        xml::with_attrs(
            Element::new("sentenceCount"),
            [("annotated", "0".to_string()), ("total", "0".to_string())],
        ),
    );
    for lexeme in lexeme_elements(&lu.lexemes) {
        xml::append(&mut element, lexeme);
    }
    element
}

fn with_extra(mut element: Element, lu: &ValidatedLu) -> Element {
    for (key, value) in lu.extra.iter() {
        xml::set_attr(&mut element, key, value);
    }
    element
}
