//! Rule-table validation.
//!
//! Each request type owns a static table of `field -> [constraint]`. A single
//! generic routine evaluates a table against a JSON object, so the rules are
//! plain data that can be inspected and tested on their own.

use serde_json::{Map, Value};

use crate::catalog::{INFLUENCES, JOBS};
use crate::error::{CoreError, FieldError};

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// Present, non-null, and not an empty string.
    Required,
    /// String length in characters, inclusive.
    Length { min: usize, max: usize },
    /// Integer value, inclusive.
    Range { min: i64, max: i64 },
    /// Case-sensitive membership in a fixed list.
    OneOf(&'static [&'static str]),
}

/// Constraints attached to one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

/// Evaluates a rule table. Cheap to construct; handlers build one per request
/// and pass it to whatever needs to validate.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    rules: &'static [FieldRule],
}

impl Validator {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Names of every field the table knows about.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.field)
    }

    /// Collect every violation in `data`. Empty means valid.
    pub fn check(&self, data: &Map<String, Value>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for rule in self.rules {
            let value = data.get(rule.field);
            for constraint in rule.constraints {
                if let Some(message) = evaluate(constraint, value) {
                    errors.push(FieldError::new(rule.field, message));
                    // One message per field is enough for clients.
                    break;
                }
            }
        }
        errors
    }

    /// Validate a JSON object, failing with every violation at once.
    pub fn validate_map(&self, data: &Map<String, Value>) -> Result<(), CoreError> {
        let errors = self.check(data);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }
}

fn evaluate(constraint: &Constraint, value: Option<&Value>) -> Option<String> {
    match constraint {
        Constraint::Required => match value {
            None | Some(Value::Null) => Some("is required".into()),
            Some(Value::String(s)) if s.trim().is_empty() => Some("is required".into()),
            _ => None,
        },
        Constraint::Length { min, max } => match present(value)? {
            Value::String(s) => {
                let len = s.chars().count();
                (len < *min || len > *max)
                    .then(|| format!("must be between {min} and {max} characters"))
            }
            _ => Some("must be a string".into()),
        },
        Constraint::Range { min, max } => match present(value)?.as_i64() {
            Some(n) => (n < *min || n > *max).then(|| format!("must be between {min} and {max}")),
            None => Some("must be an integer".into()),
        },
        Constraint::OneOf(allowed) => match present(value)? {
            Value::String(s) if allowed.contains(&s.as_str()) => None,
            _ => Some(format!("must be one of: {}", allowed.join(", "))),
        },
    }
}

/// Non-required constraints only apply to values that are actually there.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Rules for a character, applied to create payloads and merged updates.
pub const CHARACTER_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        constraints: &[Constraint::Required, Constraint::Length { min: 1, max: 100 }],
    },
    FieldRule {
        field: "job",
        constraints: &[Constraint::Required, Constraint::OneOf(JOBS)],
    },
    FieldRule {
        field: "influence",
        constraints: &[Constraint::Required, Constraint::OneOf(INFLUENCES)],
    },
    FieldRule {
        field: "rarity",
        constraints: &[Constraint::Required, Constraint::Range { min: 3, max: 5 }],
    },
    FieldRule {
        field: "description",
        constraints: &[Constraint::Length { min: 0, max: 2000 }],
    },
];

/// Rules for an accessory, applied to create payloads and merged updates.
pub const ACCESSORY_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        constraints: &[Constraint::Required, Constraint::Length { min: 1, max: 100 }],
    },
    FieldRule {
        field: "owner",
        constraints: &[Constraint::Length { min: 1, max: 100 }],
    },
    FieldRule {
        field: "effect",
        constraints: &[Constraint::Required, Constraint::Length { min: 1, max: 500 }],
    },
];

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_character_passes() {
        let v = Validator::new(CHARACTER_RULES);
        let data = object(json!({
            "name": "Viola",
            "job": "dancer",
            "influence": "fame",
            "rarity": 5,
        }));
        assert!(v.check(&data).is_empty());
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let v = Validator::new(CHARACTER_RULES);
        let errors = v.check(&object(json!({"description": null})));
        assert_eq!(fields(&errors), vec!["name", "job", "influence", "rarity"]);
        assert!(errors.iter().all(|e| e.message == "is required"));
    }

    #[test]
    fn blank_name_is_required_violation() {
        let v = Validator::new(ACCESSORY_RULES);
        let errors = v.check(&object(json!({"name": "  ", "effect": "ATK +10"})));
        assert_eq!(fields(&errors), vec!["name"]);
    }

    #[test]
    fn enum_membership_is_checked() {
        let v = Validator::new(CHARACTER_RULES);
        let errors = v.check(&object(json!({
            "name": "Viola",
            "job": "pirate",
            "influence": "fame",
            "rarity": 5,
        })));
        assert_eq!(fields(&errors), vec!["job"]);
        assert!(errors[0].message.starts_with("must be one of: warrior"));
    }

    #[test]
    fn range_and_type_are_checked() {
        let v = Validator::new(CHARACTER_RULES);
        let errors = v.check(&object(json!({
            "name": "Viola",
            "job": "dancer",
            "influence": "fame",
            "rarity": 6,
        })));
        assert_eq!(errors, vec![FieldError::new("rarity", "must be between 3 and 5")]);

        let errors = v.check(&object(json!({
            "name": "Viola",
            "job": "dancer",
            "influence": "fame",
            "rarity": "five",
        })));
        assert_eq!(errors, vec![FieldError::new("rarity", "must be an integer")]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let v = Validator::new(ACCESSORY_RULES);
        let name: String = "é".repeat(100);
        let data = object(json!({"name": name, "effect": "x"}));
        assert!(v.check(&data).is_empty());
    }

    #[test]
    fn optional_fields_accept_null() {
        let v = Validator::new(ACCESSORY_RULES);
        let data = object(json!({"name": "Ring", "owner": null, "effect": "SP +5"}));
        assert!(v.check(&data).is_empty());
    }

    #[test]
    fn validate_map_returns_validation_error() {
        let v = Validator::new(ACCESSORY_RULES);
        let err = v.validate_map(&object(json!({"name": "Ring"}))).unwrap_err();
        match err {
            CoreError::Validation(errors) => assert_eq!(fields(&errors), vec!["effect"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
