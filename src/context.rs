//! Everything a lexicon operation needs besides the target directory.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::config::LexiconConfig;
use crate::error::Result;
use crate::loader::Lexicon;
use crate::model::Pos;

/// FrameNet POS tag to `lexinfo:partOfSpeech` local name.
static LEXINFO_POS: Lazy<BTreeMap<Pos, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        (Pos::A, "adjective"),
        (Pos::Adv, "adverb"),
        (Pos::Art, "article"),
        (Pos::C, "conjunction"),
        (Pos::Idio, "idiom"),
        (Pos::Intj, "interjection"),
        (Pos::N, "noun"),
        (Pos::Num, "numeral"),
        (Pos::Prep, "preposition"),
        (Pos::Pron, "pronoun"),
        (Pos::Scon, "subordinatingConjunction"),
        (Pos::V, "verb"),
    ])
});

/// Configuration plus the loaded source lexicon whose LU files serve as
/// templates. Built once by the caller and passed by reference.
#[derive(Debug, Clone)]
pub struct LexiconContext {
    config: LexiconConfig,
    source: Lexicon,
    pos_to_lexinfo: BTreeMap<Pos, &'static str>,
}

impl LexiconContext {
    pub fn new(config: LexiconConfig, source: Lexicon) -> Self {
        Self {
            config,
            source,
            pos_to_lexinfo: LEXINFO_POS.clone(),
        }
    }

    /// Loads the source lexicon at `source_root`.
    pub fn load(config: LexiconConfig, source_root: &Path) -> Result<Self> {
        Ok(Self::new(config, Lexicon::load(source_root)?))
    }

    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    pub fn source(&self) -> &Lexicon {
        &self.source
    }

    /// The lexinfo part of speech of a FrameNet tag; `I` has none.
    pub fn lexinfo_pos(&self, pos: Pos) -> Option<&'static str> {
        self.pos_to_lexinfo.get(&pos).copied()
    }
}
