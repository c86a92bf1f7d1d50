//! Reverse lookup from a frame and a lemma/POS pair to an LU id.

use std::collections::BTreeSet;
use std::fmt;

use crate::loader::Lexicon;

/// Outcome of [`get_luid`]. Ambiguity is a lexicon anomaly (the same lemma
/// and POS lexicalized twice in one frame) that callers handle themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LuidLookup {
    Found(u64),
    NotFound,
    Ambiguous(BTreeSet<u64>),
}

impl LuidLookup {
    pub fn id(&self) -> Option<u64> {
        match self {
            LuidLookup::Found(id) => Some(*id),
            _ => None,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            LuidLookup::Found(_) => "success".to_string(),
            LuidLookup::NotFound => "not found".to_string(),
            LuidLookup::Ambiguous(ids) => format!("ambiguous: multiple ids {:?}", ids),
        }
    }
}

impl fmt::Display for LuidLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuidLookup::Found(id) => write!(f, "{} ({})", id, self.reason()),
            _ => write!(f, "{}", self.reason()),
        }
    }
}

/// Finds the LU of `frame_label` whose composed name is `lemma.pos`, with
/// the POS lowercased.
pub fn get_luid(lexicon: &Lexicon, frame_label: &str, lemma: &str, pos: &str) -> LuidLookup {
    let lu_name = format!("{}.{}", lemma, pos.to_lowercase());

    let ids: BTreeSet<u64> = lexicon
        .lu_ids_and_names()
        .into_iter()
        .filter(|(_, name)| *name == lu_name)
        .filter(|(id, _)| {
            lexicon
                .lu(*id)
                .map(|lu| lu.frame_name == frame_label)
                .unwrap_or(false)
        })
        .map(|(id, _)| id)
        .collect();

    match ids.len() {
        0 => LuidLookup::NotFound,
        1 => ids
            .into_iter()
            .next()
            .map_or(LuidLookup::NotFound, LuidLookup::Found),
        _ => LuidLookup::Ambiguous(ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons() {
        assert_eq!(LuidLookup::Found(3).reason(), "success");
        assert_eq!(LuidLookup::Found(3).id(), Some(3));
        assert_eq!(LuidLookup::NotFound.reason(), "not found");
        assert_eq!(LuidLookup::NotFound.id(), None);

        let ambiguous = LuidLookup::Ambiguous([4, 9].into_iter().collect());
        assert_eq!(ambiguous.id(), None);
        assert_eq!(ambiguous.reason(), "ambiguous: multiple ids {4, 9}");
    }
}
