//! Closed vocabularies of the lexicon: workflow status, part of speech and
//! morphological LU type.

use std::fmt;

/// Workflow status of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Unknown,
    Fn1Sent,
    Test,
    AddAnnotation,
    New,
    FinishedChecked,
    Fn1NoSent,
    RulesDefined,
    ScDefined,
    InUse,
    FinishedInitial,
    Btdt,
    FinishedXGov,
    InsufficientAttestations,
    Created,
    Problem,
    NeedsScs,
    PreMarked,
}

impl Status {
    pub const ALL: [Status; 18] = [
        Status::Unknown,
        Status::Fn1Sent,
        Status::Test,
        Status::AddAnnotation,
        Status::New,
        Status::FinishedChecked,
        Status::Fn1NoSent,
        Status::RulesDefined,
        Status::ScDefined,
        Status::InUse,
        Status::FinishedInitial,
        Status::Btdt,
        Status::FinishedXGov,
        Status::InsufficientAttestations,
        Status::Created,
        Status::Problem,
        Status::NeedsScs,
        Status::PreMarked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "Unknown",
            Status::Fn1Sent => "FN1_Sent",
            Status::Test => "Test",
            Status::AddAnnotation => "Add_Annotation",
            Status::New => "New",
            Status::FinishedChecked => "Finished_Checked",
            Status::Fn1NoSent => "FN1_NoSent",
            Status::RulesDefined => "Rules_Defined",
            Status::ScDefined => "SC_Defined",
            Status::InUse => "In_Use",
            Status::FinishedInitial => "Finished_Initial",
            Status::Btdt => "BTDT",
            Status::FinishedXGov => "Finished_X-Gov",
            Status::InsufficientAttestations => "Insufficient_Attestations",
            Status::Created => "Created",
            Status::Problem => "Problem",
            Status::NeedsScs => "Needs_SCs",
            Status::PreMarked => "Pre-Marked",
        }
    }

    /// Case-sensitive lookup of a status tag.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FrameNet part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Pron,
    Num,
    A,
    Prep,
    Idio,
    N,
    Intj,
    V,
    Art,
    Scon,
    Adv,
    C,
    I,
}

impl Pos {
    pub const ALL: [Pos; 13] = [
        Pos::Pron,
        Pos::Num,
        Pos::A,
        Pos::Prep,
        Pos::Idio,
        Pos::N,
        Pos::Intj,
        Pos::V,
        Pos::Art,
        Pos::Scon,
        Pos::Adv,
        Pos::C,
        Pos::I,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pos::Pron => "PRON",
            Pos::Num => "NUM",
            Pos::A => "A",
            Pos::Prep => "PREP",
            Pos::Idio => "IDIO",
            Pos::N => "N",
            Pos::Intj => "INTJ",
            Pos::V => "V",
            Pos::Art => "ART",
            Pos::Scon => "SCON",
            Pos::Adv => "ADV",
            Pos::C => "C",
            Pos::I => "I",
        }
    }

    /// Lowercased tag as used in composed LU names (`lemma.pos`).
    pub fn suffix(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// Case-sensitive lookup of a POS tag.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|pos| pos.as_str() == s)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Morphological type of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LuType {
    #[default]
    Singleton,
    Phrasal,
    Idiom,
    EndocentricCompound,
    ExocentricCompound,
}

impl LuType {
    pub const ALL: [LuType; 5] = [
        LuType::Singleton,
        LuType::Phrasal,
        LuType::Idiom,
        LuType::EndocentricCompound,
        LuType::ExocentricCompound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LuType::Singleton => "singleton",
            LuType::Phrasal => "phrasal",
            LuType::Idiom => "idiom",
            LuType::EndocentricCompound => "endocentric compound",
            LuType::ExocentricCompound => "exocentric compound",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for LuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a vocabulary for error messages, e.g. `{A, N, V}`.
pub(crate) fn describe<T: fmt::Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("{{{}}}", items.join(", "))
}
