//! Identifier allocation for lexical units and lemma/POS pairs.

use chrono::Utc;
use tracing::debug;

use crate::config::IdStrategy;
use crate::loader::Lexicon;
use crate::model::{compose_lu_name, Pos};

/// Largest id plus one, or `1` for an empty sequence.
fn next_after(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().max().map_or(1, |max| max + 1)
}

/// `max(existing LU ids) + 1`, or `1` when the lexicon has no LU.
///
/// Ids from both `luIndex.xml` and the frame files count, so a lexicon that
/// has drifted out of sync still gets a fresh id.
pub fn next_lu_id_by_scan(lexicon: &Lexicon) -> u64 {
    next_after(
        lexicon
            .lu_index_entries()
            .map(|entry| entry.id)
            .chain(lexicon.lus().map(|lu| lu.id)),
    )
}

/// Current epoch time in milliseconds. An id that is already taken (two
/// calls within the same millisecond) is bumped until it is free.
pub fn next_lu_id_by_clock(lexicon: &Lexicon) -> u64 {
    let mut id = Utc::now().timestamp_millis().max(1) as u64;
    while lexicon.contains_lu(id) {
        debug!("Clock id {} already taken", id);
        id += 1;
    }
    id
}

pub fn next_lu_id(lexicon: &Lexicon, strategy: IdStrategy) -> u64 {
    match strategy {
        IdStrategy::Scan => next_lu_id_by_scan(lexicon),
        IdStrategy::Clock => next_lu_id_by_clock(lexicon),
    }
}

/// The `lemmaID` shared by every LU named `lemma.pos`; a new one when the
/// pair is not part of the lexicon yet.
pub fn lemma_id(lexicon: &Lexicon, lemma: &str, pos: Pos) -> u64 {
    let lu_name = compose_lu_name(lemma, pos);
    let existing = lexicon
        .lus()
        .filter(|lu| lu.name == lu_name)
        .find_map(|lu| lu.lemma_id);

    match existing {
        Some(id) => id,
        None => next_after(lexicon.lus().filter_map(|lu| lu.lemma_id)),
    }
}
