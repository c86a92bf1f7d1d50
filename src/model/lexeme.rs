//! Lexemes and lemma reconstruction.

use serde_json::{Map, Value};

use super::vocab::Pos;

/// A lexeme as supplied by a caller: a loosely typed attribute map, checked
/// by the validation engine before it becomes a [`Lexeme`].
pub type RawLexeme = Map<String, Value>;

/// One ordered constituent of a (possibly multi-word) lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// 1-based position within the LU
    pub order: u32,
    pub headword: bool,
    /// Whether another token may intervene before this lexeme in running text
    pub break_before: bool,
    /// Absent for the particle of a phrasal verb
    pub pos: Option<Pos>,
    pub name: String,
    pub incorporated_fe: Option<String>,
    /// Back-reference to the LU this lexeme lexicalizes (compounds only)
    pub lu_id: Option<u64>,
}

impl Lexeme {
    pub fn new(order: u32, name: impl Into<String>) -> Self {
        Self {
            order,
            headword: false,
            break_before: false,
            pos: None,
            name: name.into(),
            incorporated_fe: None,
            lu_id: None,
        }
    }

    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn with_headword(mut self, headword: bool) -> Self {
        self.headword = headword;
        self
    }

    pub fn with_break_before(mut self, break_before: bool) -> Self {
        self.break_before = break_before;
        self
    }

    pub fn with_incorporated_fe(mut self, fe: impl Into<String>) -> Self {
        self.incorporated_fe = Some(fe.into());
        self
    }

    pub fn with_lu_id(mut self, lu_id: u64) -> Self {
        self.lu_id = Some(lu_id);
        self
    }

    /// XML attributes of a `<lexeme>` element, in document order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("order", self.order.to_string()),
            ("headword", self.headword.to_string()),
            ("breakBefore", self.break_before.to_string()),
        ];
        if let Some(pos) = self.pos {
            attrs.push(("POS", pos.as_str().to_string()));
        }
        attrs.push(("name", self.name.clone()));
        if let Some(fe) = &self.incorporated_fe {
            attrs.push(("incorporatedFE", fe.clone()));
        }
        if let Some(lu_id) = self.lu_id {
            attrs.push(("lu_id", lu_id.to_string()));
        }
        attrs
    }

    /// Lenient reconstruction from stored XML attributes. Returns `None`
    /// when `order` or `name` is unusable.
    pub fn from_attributes<'a>(get: impl Fn(&str) -> Option<&'a str>) -> Option<Self> {
        let order = get("order")?.trim().parse().ok()?;
        let name = get("name")?.to_string();
        Some(Self {
            order,
            headword: get("headword") == Some("true"),
            break_before: get("breakBefore") == Some("true"),
            pos: get("POS").and_then(Pos::from_str),
            name,
            incorporated_fe: get("incorporatedFE").map(str::to_string),
            lu_id: get("lu_id").and_then(|v| v.trim().parse().ok()),
        })
    }
}

/// How lexeme names are joined when rebuilding a lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator<'a> {
    /// A single space before every lexeme marked `breakBefore`, nothing otherwise
    BreakBefore,
    /// The same string between every pair of lexemes
    Fixed(&'a str),
}

/// Rebuilds the surface lemma from lexemes in `order` sequence.
///
/// Input order is irrelevant; only the `order` field is. When two lexemes
/// claim the same position the later one wins.
pub fn reconstruct_lemma(lexemes: &[Lexeme], separator: Separator<'_>) -> String {
    let mut by_order: Vec<&Lexeme> = Vec::with_capacity(lexemes.len());
    for lexeme in lexemes {
        match by_order.iter().position(|l| l.order == lexeme.order) {
            Some(index) => by_order[index] = lexeme,
            None => by_order.push(lexeme),
        }
    }
    by_order.sort_by_key(|l| l.order);

    let mut lemma = String::new();
    for (index, lexeme) in by_order.iter().enumerate() {
        if index > 0 {
            match separator {
                Separator::BreakBefore if lexeme.break_before => lemma.push(' '),
                Separator::BreakBefore => {}
                Separator::Fixed(sep) => lemma.push_str(sep),
            }
        }
        lemma.push_str(&lexeme.name);
    }
    lemma
}

/// Splits a dotted LU name at its last dot: `"a.b.c.n"` gives `("a.b.c", "n")`.
pub fn split_lu_name(lu_name: &str) -> Option<(&str, &str)> {
    let (lemma, pos) = lu_name.rsplit_once('.')?;
    if lemma.is_empty() || pos.is_empty() {
        return None;
    }
    Some((lemma, pos))
}

/// The composed `lemma.pos` name stored in every location of the lexicon.
pub fn compose_lu_name(lemma: &str, pos: Pos) -> String {
    format!("{}.{}", lemma, pos.suffix())
}
