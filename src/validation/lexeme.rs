//! Schema checks for caller-supplied lexemes.

use serde_json::Value;

use super::ValidationError;
use crate::model::vocab::describe;
use crate::model::{Lexeme, LuType, Pos, RawLexeme};

pub const REQUIRED_LEXEME_ATTRS: &[&str] = &["order", "headword", "breakBefore", "POS", "name"];
pub const OPTIONAL_LEXEME_ATTRS: &[&str] = &["incorporatedFE", "lu_id"];

/// Checks one raw lexeme and converts it. `index` is the lexeme's position
/// in the request, used in messages only; `lu_exists` resolves `lu_id`
/// back-references against the target lexicon.
///
/// The POS attribute is optional for every lexeme of a `phrasal` LU, since
/// verb particles carry none.
pub fn validate_lexeme(
    lu_exists: impl Fn(u64) -> bool,
    raw: &RawLexeme,
    index: usize,
    lu_type: LuType,
) -> Result<Lexeme, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let violation = |reason: String| ValidationError::LexemeSchemaViolation { index, reason };

    for attr in REQUIRED_LEXEME_ATTRS {
        if *attr == "POS" && lu_type == LuType::Phrasal {
            continue;
        }
        if !raw.contains_key(*attr) {
            errors.push(violation(format!(
                "missing attribute {} (required are {:?})",
                attr, REQUIRED_LEXEME_ATTRS
            )));
        }
    }

    for key in raw.keys() {
        if !REQUIRED_LEXEME_ATTRS.contains(&key.as_str())
            && !OPTIONAL_LEXEME_ATTRS.contains(&key.as_str())
        {
            errors.push(violation(format!("{} is not an allowed attribute", key)));
        }
    }

    let order = match raw.get("order").map(canonical_integer) {
        Some(Some(order)) if order <= u32::MAX as u64 => Some(order as u32),
        Some(_) => {
            errors.push(violation(format!(
                "order must be a decimal integer string without sign or leading zeros, found {}",
                raw["order"]
            )));
            None
        }
        None => None,
    };

    let headword = flag(raw, "headword", &mut errors, &violation);
    let break_before = flag(raw, "breakBefore", &mut errors, &violation);

    let pos = match raw.get("POS") {
        None => None,
        Some(Value::String(tag)) => match Pos::from_str(tag) {
            Some(pos) => Some(pos),
            None => {
                errors.push(ValidationError::EnumMismatch {
                    field: "lexeme POS",
                    value: tag.clone(),
                    accepted: describe(&Pos::ALL),
                });
                None
            }
        },
        Some(other) => {
            errors.push(violation(format!("POS must be a string, found {}", other)));
            None
        }
    };

    let name = match raw.get("name") {
        Some(Value::String(name)) => Some(name.clone()),
        Some(other) => {
            errors.push(violation(format!(
                "the name of a lexeme must be a string, found {}",
                other
            )));
            None
        }
        None => None,
    };

    let incorporated_fe = match raw.get("incorporatedFE") {
        None => None,
        Some(Value::String(fe)) => Some(fe.clone()),
        Some(other) => {
            errors.push(violation(format!(
                "incorporatedFE must be a string, found {}",
                other
            )));
            None
        }
    };

    let lu_id = match raw.get("lu_id") {
        None => None,
        Some(value) => match canonical_integer(value) {
            Some(id) if lu_exists(id) => Some(id),
            Some(id) => {
                errors.push(violation(format!(
                    "lu id {} not found in the target lexicon",
                    id
                )));
                None
            }
            None => {
                errors.push(violation(format!(
                    "lu_id must be a decimal integer string, found {}",
                    value
                )));
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every required field was present and well-formed at this point.
    match (order, headword, break_before, name) {
        (Some(order), Some(headword), Some(break_before), Some(name)) => Ok(Lexeme {
            order,
            headword,
            break_before,
            pos,
            name,
            incorporated_fe,
            lu_id,
        }),
        _ => Err(vec![violation("incomplete lexeme".to_string())]),
    }
}

/// Checks that the `order` values of the lexemes are exactly `{1, ..., n}`.
/// Values are compared as written: `"01"`, `" 1"` or the number `1` do not
/// count as order 1.
pub fn validate_order_attr(lexemes: &[RawLexeme]) -> Result<(), ValidationError> {
    let found: Vec<String> = lexemes
        .iter()
        .map(|lexeme| match lexeme.get("order") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        })
        .collect();

    let mut orders: Vec<u64> = lexemes
        .iter()
        .filter_map(|lexeme| lexeme.get("order").and_then(canonical_integer))
        .collect();
    orders.sort_unstable();
    let expected: Vec<u64> = (1..=lexemes.len() as u64).collect();

    if orders == expected {
        Ok(())
    } else {
        Err(ValidationError::OrderIntegrityViolation {
            expected: lexemes.len(),
            found,
        })
    }
}

fn flag<F>(raw: &RawLexeme, key: &str, errors: &mut Vec<ValidationError>, violation: &F) -> Option<bool>
where
    F: Fn(String) -> ValidationError,
{
    match raw.get(key) {
        None => None,
        Some(Value::String(s)) if s == "true" => Some(true),
        Some(Value::String(s)) if s == "false" => Some(false),
        Some(other) => {
            errors.push(violation(format!(
                "possible values for {} are \"true\" and \"false\", found {}",
                key, other
            )));
            None
        }
    }
}

/// Integers are stored as attribute strings, so only the form that renders
/// back unchanged is accepted.
fn canonical_integer(value: &Value) -> Option<u64> {
    let Value::String(s) = value else {
        return None;
    };
    let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (s.len() > 1 && s.starts_with('0')) {
        return None;
    }
    s.parse().ok()
}
