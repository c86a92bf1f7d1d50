//! Validation engine.
//!
//! Every check here is pure: it looks only at the request and at an
//! already loaded [`Lexicon`]. All of them run before the first file of the
//! lexicon is touched, since the writer has no rollback.

pub mod lexeme;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::loader::{Frame, Lexicon};
use crate::model::vocab::describe;
use crate::model::{
    reconstruct_lemma, split_lu_name, ExtraAttributes, Lexeme, LuType, Pos, Separator, Status,
};
use crate::request::{AddLuRequest, ValidatedLu};

pub use lexeme::{validate_lexeme, validate_order_attr, OPTIONAL_LEXEME_ATTRS, REQUIRED_LEXEME_ATTRS};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} {value:?} is not part of the accepted set {accepted}")]
    EnumMismatch {
        field: &'static str,
        value: String,
        accepted: String,
    },

    #[error("frame {name} is not part of the lexicon{}", .suggestion.as_ref().map(|s| format!(" (did you mean {s}?)")).unwrap_or_default())]
    UnknownFrame {
        name: String,
        suggestion: Option<String>,
    },

    #[error("lexeme {index}: {reason}")]
    LexemeSchemaViolation { index: usize, reason: String },

    #[error("order attributes {found:?} are not exactly 1..={expected}")]
    OrderIntegrityViolation { expected: usize, found: Vec<String> },

    #[error("the optional attribute lu_id is only allowed in multi-lexeme expressions")]
    SingleLexemeBackrefViolation,

    #[error("lu_type {lu_type} requires {requirement} lexeme(s), found {found}")]
    CardinalityViolation {
        lu_type: LuType,
        requirement: &'static str,
        found: usize,
    },

    #[error("incorporated FE {fe} is not a frame element of {frame}")]
    IncorporatedFeNotInFrame { fe: String, frame: String },

    #[error("incorporated FE {lu_level:?} of the LU does not match the lexeme-level labels {lexeme_level:?}")]
    IncorporatedFeMismatch {
        lu_level: Option<String>,
        lexeme_level: BTreeSet<String>,
    },

    #[error("POS {name_pos:?} of the LU name differs from POS {pos:?}")]
    LemmaPosMismatch { name_pos: String, pos: String },

    #[error("lexemes of {lu_type} LU {lemma:?} do not reconstruct it: {detail}")]
    LemmaReconstructionMismatch {
        lu_type: LuType,
        lemma: String,
        detail: String,
    },

    #[error("LU name {0:?} is not of the form lemma.pos")]
    MalformedLuName(String),

    #[error("extra attributes {0:?} collide with core LU attributes")]
    ExtraAttributeConflict(Vec<String>),
}

pub fn validate_status(status: &str) -> Result<Status, ValidationError> {
    Status::from_str(status).ok_or_else(|| ValidationError::EnumMismatch {
        field: "status",
        value: status.to_string(),
        accepted: describe(&Status::ALL),
    })
}

pub fn validate_pos(pos: &str) -> Result<Pos, ValidationError> {
    Pos::from_str(pos).ok_or_else(|| ValidationError::EnumMismatch {
        field: "POS",
        value: pos.to_string(),
        accepted: describe(&Pos::ALL),
    })
}

pub fn validate_lu_type(lu_type: &str) -> Result<LuType, ValidationError> {
    LuType::from_str(lu_type).ok_or_else(|| ValidationError::EnumMismatch {
        field: "lu_type",
        value: lu_type.to_string(),
        accepted: describe(&LuType::ALL),
    })
}

/// Resolves the target frame, reporting a missing frame as its own kind.
pub fn validate_frame<'a>(lexicon: &'a Lexicon, frame_name: &str) -> Result<&'a Frame, ValidationError> {
    lexicon.frame_by_name(frame_name).map_err(|err| match err {
        crate::error::LexiconError::NotFound { suggestion, .. } => ValidationError::UnknownFrame {
            name: frame_name.to_string(),
            suggestion,
        },
        _ => ValidationError::UnknownFrame {
            name: frame_name.to_string(),
            suggestion: None,
        },
    })
}

/// The POS part of a dotted LU name must equal the POS tag, ignoring case.
pub fn validate_lu_pos(name_pos: &str, pos: &str) -> Result<(), ValidationError> {
    if name_pos.eq_ignore_ascii_case(pos) {
        Ok(())
    } else {
        Err(ValidationError::LemmaPosMismatch {
            name_pos: name_pos.to_string(),
            pos: pos.to_string(),
        })
    }
}

/// Back-references are only meaningful inside multi-lexeme LUs.
pub fn validate_lexemes(lexemes: &[Lexeme]) -> Result<(), ValidationError> {
    if let [single] = lexemes {
        if single.lu_id.is_some() {
            return Err(ValidationError::SingleLexemeBackrefViolation);
        }
    }
    Ok(())
}

pub fn validate_num_lexemes(count: usize, lu_type: LuType) -> Result<(), ValidationError> {
    let requirement = match lu_type {
        LuType::Singleton if count != 1 => "exactly 1",
        LuType::Phrasal | LuType::EndocentricCompound if count < 2 => "at least 2",
        _ => return Ok(()),
    };
    Err(ValidationError::CardinalityViolation {
        lu_type,
        requirement,
        found: count,
    })
}

pub fn validate_incorporated_fe(frame: &Frame, fe: &str) -> Result<(), ValidationError> {
    if frame.has_fe(fe) {
        Ok(())
    } else {
        Err(ValidationError::IncorporatedFeNotInFrame {
            fe: fe.to_string(),
            frame: frame.name.clone(),
        })
    }
}

/// For multi-lexeme LUs, the lexeme-level incorporated FE labels must be
/// exactly the LU-level label (or none when the LU declares none).
/// Single-lexeme LUs carry the label at LU level only.
pub fn validate_incorporated_fe_lu_and_lexemes(
    incorporated_fe: Option<&str>,
    lexemes: &[Lexeme],
) -> Result<(), ValidationError> {
    if lexemes.len() == 1 {
        return Ok(());
    }

    let lexeme_level: BTreeSet<String> = lexemes
        .iter()
        .filter_map(|l| l.incorporated_fe.clone())
        .collect();
    let lu_level: BTreeSet<String> = incorporated_fe.map(str::to_string).into_iter().collect();

    if lexeme_level == lu_level {
        Ok(())
    } else {
        Err(ValidationError::IncorporatedFeMismatch {
            lu_level: incorporated_fe.map(str::to_string),
            lexeme_level,
        })
    }
}

/// Checks that the lexemes spell out the lemma of the LU name.
pub fn validate_lexemes_vs_lemma(
    lexemes: &[Lexeme],
    lu_type: LuType,
    lemma: &str,
) -> Result<(), ValidationError> {
    let mismatch = |detail: String| ValidationError::LemmaReconstructionMismatch {
        lu_type,
        lemma: lemma.to_string(),
        detail,
    };

    match lu_type {
        LuType::Singleton => {
            let name = lexemes.first().map(|l| l.name.as_str()).unwrap_or_default();
            if name != lemma {
                return Err(mismatch(format!("lexeme {:?} differs from the lemma", name)));
            }
        }
        LuType::EndocentricCompound => {
            let rebuilt = reconstruct_lemma(lexemes, Separator::Fixed(""));
            if rebuilt != lemma {
                return Err(mismatch(format!(
                    "concatenated lexemes give {:?}",
                    rebuilt
                )));
            }
        }
        LuType::Idiom | LuType::Phrasal | LuType::ExocentricCompound => {
            if let Some(missing) = lexemes.iter().find(|l| !lemma.contains(l.name.as_str())) {
                return Err(mismatch(format!(
                    "lexeme {:?} is not part of the lemma",
                    missing.name
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_extra_attributes(extra: &ExtraAttributes) -> Result<(), ValidationError> {
    let reserved = extra.reserved_keys();
    if reserved.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ExtraAttributeConflict(
            reserved.into_iter().map(str::to_string).collect(),
        ))
    }
}

/// Runs every check on an insertion request against the target lexicon.
///
/// Checks run in three phases (vocabularies and frame, lexeme schema,
/// structure); all violations of the first failing phase are returned
/// together.
pub fn validate_request(
    request: &AddLuRequest,
    lexicon: &Lexicon,
) -> Result<ValidatedLu, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let status = validate_status(&request.status).map_err(|e| errors.push(e)).ok();
    let pos = validate_pos(&request.pos).map_err(|e| errors.push(e)).ok();
    let lu_type = validate_lu_type(&request.lu_type).map_err(|e| errors.push(e)).ok();
    let frame = validate_frame(lexicon, &request.frame).map_err(|e| errors.push(e)).ok();
    let split = split_lu_name(&request.lu_name);
    if split.is_none() {
        errors.push(ValidationError::MalformedLuName(request.lu_name.clone()));
    }
    if let Err(e) = validate_extra_attributes(&request.extra) {
        errors.push(e);
    }

    let (Some(status), Some(pos), Some(lu_type), Some(frame), Some((lemma, name_pos))) =
        (status, pos, lu_type, frame, split)
    else {
        return Err(errors);
    };

    let mut lexemes = Vec::with_capacity(request.lexemes.len());
    for (index, raw) in request.lexemes.iter().enumerate() {
        match validate_lexeme(|id| lexicon.contains_lu(id), raw, index, lu_type) {
            Ok(lexeme) => lexemes.push(lexeme),
            Err(mut lexeme_errors) => errors.append(&mut lexeme_errors),
        }
    }
    if let Err(e) = validate_order_attr(&request.lexemes) {
        errors.push(e);
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let structural = [
        validate_lexemes(&lexemes),
        validate_num_lexemes(lexemes.len(), lu_type),
        request
            .incorporated_fe
            .as_deref()
            .map_or(Ok(()), |fe| validate_incorporated_fe(frame, fe)),
        validate_incorporated_fe_lu_and_lexemes(request.incorporated_fe.as_deref(), &lexemes),
        validate_lu_pos(name_pos, &request.pos),
        validate_lexemes_vs_lemma(&lexemes, lu_type, lemma),
    ];
    errors.extend(structural.into_iter().filter_map(Result::err));
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedLu {
        lemma: lemma.to_string(),
        pos,
        status,
        lu_type,
        frame: frame.name.clone(),
        lexemes,
        definition: request.definition.clone().unwrap_or_default(),
        provenance: request.provenance.clone(),
        incorporated_fe: request.incorporated_fe.clone(),
        timestamp: request.timestamp,
        extra: request.extra.clone(),
    })
}
