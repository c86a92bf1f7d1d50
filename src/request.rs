//! Insertion requests, before and after validation.

use chrono::{DateTime, Utc};

use crate::model::{ExtraAttributes, Lexeme, LuType, Pos, RawLexeme, Status};

/// A caller's request to add one lexical unit. Every field is taken as
/// given; [`crate::validation::validate_request`] turns it into a
/// [`ValidatedLu`].
#[derive(Debug, Clone)]
pub struct AddLuRequest {
    /// Dotted `lemma.pos` name, e.g. `president.n`
    pub lu_name: String,
    pub lexemes: Vec<RawLexeme>,
    pub definition: Option<String>,
    pub status: String,
    pub pos: String,
    pub frame: String,
    pub provenance: String,
    pub lu_type: String,
    pub incorporated_fe: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub extra: ExtraAttributes,
}

impl AddLuRequest {
    pub fn new(
        lu_name: impl Into<String>,
        frame: impl Into<String>,
        pos: impl Into<String>,
        lexemes: Vec<RawLexeme>,
    ) -> Self {
        Self {
            lu_name: lu_name.into(),
            lexemes,
            definition: None,
            status: Status::Created.as_str().to_string(),
            pos: pos.into(),
            frame: frame.into(),
            provenance: "manual".to_string(),
            lu_type: LuType::Singleton.as_str().to_string(),
            incorporated_fe: None,
            timestamp: None,
            extra: ExtraAttributes::new(),
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = provenance.into();
        self
    }

    pub fn with_lu_type(mut self, lu_type: impl Into<String>) -> Self {
        self.lu_type = lu_type.into();
        self
    }

    pub fn with_incorporated_fe(mut self, fe: impl Into<String>) -> Self {
        self.incorporated_fe = Some(fe.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_extra(mut self, extra: ExtraAttributes) -> Self {
        self.extra = extra;
        self
    }
}

/// A request that passed every check; all fields are typed.
#[derive(Debug, Clone)]
pub struct ValidatedLu {
    pub lemma: String,
    pub pos: Pos,
    pub status: Status,
    pub lu_type: LuType,
    pub frame: String,
    pub lexemes: Vec<Lexeme>,
    pub definition: String,
    pub provenance: String,
    pub incorporated_fe: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub extra: ExtraAttributes,
}

impl ValidatedLu {
    /// Composed `lemma.pos` name with a lowercased POS.
    pub fn lu_name(&self) -> String {
        crate::model::compose_lu_name(&self.lemma, self.pos)
    }
}
