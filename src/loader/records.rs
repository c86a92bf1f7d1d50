use std::collections::BTreeMap;

use crate::model::{split_lu_name, ExtraAttributes, Lexeme, RESERVED_LU_ATTRIBUTES};
use crate::xml::{self, Element};

/// A semantic frame and its frame elements.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: u64,
    pub name: String,
    pub definition: String,
    /// Frame elements keyed by label
    pub fes: BTreeMap<String, FrameElement>,
    /// Ids of the `lexUnit` children of the frame file, in document order
    pub lu_ids: Vec<u64>,
}

impl Frame {
    pub fn has_fe(&self, label: &str) -> bool {
        self.fes.contains_key(label)
    }

    /// A frame is lexical when at least one LU evokes it.
    pub fn is_lexical(&self) -> bool {
        !self.lu_ids.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FrameElement {
    pub id: u64,
    pub name: String,
}

/// A lexical unit as recorded inside its frame file.
#[derive(Debug, Clone)]
pub struct LexUnit {
    pub id: u64,
    /// Composed `lemma.pos` name
    pub name: String,
    pub pos: String,
    pub status: String,
    pub frame_id: u64,
    pub frame_name: String,
    pub lemma_id: Option<u64>,
    pub created_by: Option<String>,
    pub created_date: Option<String>,
    pub lu_type: Option<String>,
    pub incorporated_fe: Option<String>,
    pub definition: String,
    pub lexemes: Vec<Lexeme>,
    pub extra: ExtraAttributes,
}

impl LexUnit {
    pub(crate) fn from_element(element: &Element, frame: &Frame) -> Option<Self> {
        let id = xml::attr(element, "ID")?.trim().parse().ok()?;
        let lexemes = xml::children(element, "lexeme")
            .filter_map(|el| Lexeme::from_attributes(|key| xml::attr(el, key)))
            .collect();
        let extra = element
            .attributes
            .iter()
            .filter(|(key, _)| !RESERVED_LU_ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            id,
            name: xml::attr(element, "name").unwrap_or_default().to_string(),
            pos: xml::attr(element, "POS").unwrap_or_default().to_string(),
            status: xml::attr(element, "status").unwrap_or_default().to_string(),
            frame_id: frame.id,
            frame_name: frame.name.clone(),
            lemma_id: xml::attr(element, "lemmaID").and_then(|v| v.trim().parse().ok()),
            created_by: xml::attr(element, "cBy").map(str::to_string),
            created_date: xml::attr(element, "cDate").map(str::to_string),
            lu_type: xml::attr(element, "lu_type").map(str::to_string),
            incorporated_fe: xml::attr(element, "incorporatedFE").map(str::to_string),
            definition: xml::child(element, "definition")
                .map(xml::text)
                .unwrap_or_default(),
            lexemes,
            extra,
        })
    }

    /// The lemma part of the composed name.
    pub fn lemma(&self) -> &str {
        split_lu_name(&self.name)
            .map(|(lemma, _)| lemma)
            .unwrap_or(&self.name)
    }
}

/// A `<lu>` summary row of `luIndex.xml`.
#[derive(Debug, Clone)]
pub struct LuIndexEntry {
    pub id: u64,
    pub name: String,
    pub frame_id: Option<u64>,
    pub frame_name: String,
    pub status: String,
}

impl LuIndexEntry {
    pub(crate) fn from_element(element: &Element) -> Option<Self> {
        Some(Self {
            id: xml::attr(element, "ID")?.trim().parse().ok()?,
            name: xml::attr(element, "name").unwrap_or_default().to_string(),
            frame_id: xml::attr(element, "frameID").and_then(|v| v.trim().parse().ok()),
            frame_name: xml::attr(element, "frameName").unwrap_or_default().to_string(),
            status: xml::attr(element, "status").unwrap_or_default().to_string(),
        })
    }
}
