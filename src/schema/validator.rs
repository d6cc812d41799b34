//! Movie validator
//!
//! Validation semantics:
//! - Candidate must be a JSON object
//! - Required fields are present (full validation only)
//! - Field values match their declared type and range
//! - `null` is never accepted, not even for optional fields
//! - Undeclared fields are dropped from the normalized output
//!
//! Every failing field is reported, not just the first.

use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{FieldDef, FieldType, MOVIE_FIELDS};
use crate::store::Record;

/// Absolute `http`/`https` URL with a host.
fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// A candidate that passed full validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMovie {
    /// Id carried by the candidate, if any
    pub id: Option<String>,
    pub title: String,
    /// Remaining declared fields
    pub fields: Map<String, Value>,
}

impl ValidatedMovie {
    /// Turn into a store record with the given id, replacing any carried id.
    pub fn with_id(self, id: impl Into<String>) -> Record {
        Record {
            id: id.into(),
            title: self.title,
            fields: self.fields,
        }
    }
}

/// Validator for movie records. Does not mutate its input.
#[derive(Debug, Clone)]
pub struct MovieValidator {
    fields: &'static [FieldDef],
}

impl MovieValidator {
    pub fn new() -> Self {
        Self {
            fields: MOVIE_FIELDS,
        }
    }

    /// Validates a complete movie.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` listing every missing or invalid field.
    pub fn validate(&self, candidate: &Value) -> SchemaResult<ValidatedMovie> {
        let mut normalized = self.check(candidate, false)?;

        let id = match normalized.remove("id") {
            Some(Value::String(id)) => Some(id),
            _ => None,
        };
        let title = match normalized.remove("title") {
            Some(Value::String(title)) => title,
            _ => {
                return Err(SchemaError::validation_failed(vec![
                    ValidationDetails::missing_field("title"),
                ]))
            }
        };

        Ok(ValidatedMovie {
            id,
            title,
            fields: normalized,
        })
    }

    /// Validates a patch: same rules, every field optional.
    pub fn validate_partial(&self, candidate: &Value) -> SchemaResult<Map<String, Value>> {
        self.check(candidate, true)
    }

    fn check(&self, candidate: &Value, partial: bool) -> SchemaResult<Map<String, Value>> {
        let object = candidate
            .as_object()
            .ok_or_else(|| SchemaError::not_object(json_type_name(candidate)))?;

        let mut failures = Vec::new();
        let mut normalized = Map::new();

        for def in self.fields {
            match object.get(def.name) {
                Some(value) => {
                    let before = failures.len();
                    check_value(def.name, &def.field_type, value, &mut failures);
                    if failures.len() == before {
                        normalized.insert(def.name.to_string(), value.clone());
                    }
                }
                None if def.required && !partial => {
                    failures.push(ValidationDetails::missing_field(def.name));
                }
                None => {}
            }
        }

        if failures.is_empty() {
            Ok(normalized)
        } else {
            Err(SchemaError::validation_failed(failures))
        }
    }
}

impl Default for MovieValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn check_value(
    path: &str,
    field_type: &FieldType,
    value: &Value,
    failures: &mut Vec<ValidationDetails>,
) {
    let expected = || field_type.describe();

    match field_type {
        FieldType::String => {
            if !value.is_string() {
                failures.push(type_error(path, "string", value));
            }
        }
        FieldType::Uuid => match value.as_str() {
            Some(s) if Uuid::parse_str(s).is_ok() => {}
            Some(s) => failures.push(ValidationDetails::new(path, expected(), format!("'{}'", s))),
            None => failures.push(type_error(path, "uuid string", value)),
        },
        FieldType::Url => match value.as_str() {
            Some(s) if is_web_url(s) => {}
            Some(s) => failures.push(ValidationDetails::new(path, expected(), format!("'{}'", s))),
            None => failures.push(type_error(path, "string", value)),
        },
        FieldType::Int { min, max } => match value.as_i64() {
            Some(n) if n >= *min && n <= *max => {}
            Some(n) => failures.push(ValidationDetails::new(path, expected(), n.to_string())),
            None => failures.push(type_error(path, "integer", value)),
        },
        FieldType::Number { min, max } => match value.as_f64() {
            Some(n) if n >= *min && n <= *max => {}
            Some(_) => failures.push(ValidationDetails::new(path, expected(), value.to_string())),
            None => failures.push(type_error(path, "number", value)),
        },
        FieldType::EnumArray { allowed } => {
            let entries = match value.as_array() {
                Some(entries) => entries,
                None => {
                    failures.push(type_error(path, "array", value));
                    return;
                }
            };
            for (i, entry) in entries.iter().enumerate() {
                let entry_path = format!("{}[{}]", path, i);
                match entry.as_str() {
                    Some(s) if allowed.contains(&s) => {}
                    Some(s) => failures.push(ValidationDetails::new(
                        entry_path,
                        format!("one of {}", allowed.join("|")),
                        format!("'{}'", s),
                    )),
                    None => failures.push(type_error(&entry_path, "string", entry)),
                }
            }
        }
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, actual: &Value) -> ValidationDetails {
    ValidationDetails::type_mismatch(path, expected, json_type_name(actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;

    fn alien() -> Value {
        json!({
            "title": "Alien",
            "year": 1979,
            "director": "Ridley Scott",
            "duration": 117,
            "rate": 8.5,
            "poster": "https://example.com/alien.jpg",
            "genre": ["Sci-Fi"]
        })
    }

    #[test]
    fn test_valid_movie_passes() {
        let movie = MovieValidator::new().validate(&alien()).unwrap();
        assert_eq!(movie.title, "Alien");
        assert_eq!(movie.id, None);
        assert_eq!(movie.fields["year"], 1979);
        assert!(!movie.fields.contains_key("title"));
    }

    #[test]
    fn test_with_id_builds_record() {
        let record = MovieValidator::new()
            .validate(&alien())
            .unwrap()
            .with_id("2c5ea4c0-4067-11e9-8bad-9b1deb4d3b7d");
        assert_eq!(record.id, "2c5ea4c0-4067-11e9-8bad-9b1deb4d3b7d");
        assert_eq!(record.fields["genre"], json!(["Sci-Fi"]));
    }

    #[test]
    fn test_undeclared_fields_are_dropped() {
        let mut candidate = alien();
        candidate["budget"] = json!(11_000_000);

        let movie = MovieValidator::new().validate(&candidate).unwrap();
        assert!(!movie.fields.contains_key("budget"));
    }

    #[test]
    fn test_reports_every_failure() {
        let err = MovieValidator::new()
            .validate(&json!({ "title": 42, "year": 1900, "genre": ["Action", "Horror"] }))
            .unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::ValidationFailed);
        for field in ["title", "year", "director", "duration", "poster", "genre[1]"] {
            assert!(err.has_field(field), "expected failure for {}", field);
        }
        assert!(!err.has_field("genre[0]"));
        assert!(!err.has_field("rate"));
    }

    #[test]
    fn test_bounds() {
        let validator = MovieValidator::new();
        for (field, bad) in [
            ("year", json!(2023)),
            ("year", json!(1999.5)),
            ("duration", json!(0)),
            ("rate", json!(10.5)),
            ("rate", json!(null)),
            ("poster", json!("not a url")),
            ("id", json!("1234")),
        ] {
            let mut candidate = alien();
            candidate[field] = bad;
            let err = validator.validate(&candidate).unwrap_err();
            assert!(err.has_field(field), "{} should fail", field);
        }
    }

    #[test]
    fn test_poster_accepts_any_web_url() {
        let validator = MovieValidator::new();
        for poster in [
            "https://example.com?x=1",
            "https://example.com#a",
            "http://user@example.com/p.jpg",
            "http://[::1]/p.jpg",
            "http://localhost:8080/posters/alien.jpg",
        ] {
            let mut candidate = alien();
            candidate["poster"] = json!(poster);
            assert!(validator.validate(&candidate).is_ok(), "{} should pass", poster);
        }
    }

    #[test]
    fn test_poster_rejects_non_web_urls() {
        let validator = MovieValidator::new();
        for poster in [
            "ftp://example.com/p.jpg",
            "/posters/alien.jpg",
            "https://",
            "mailto:a@b.c",
        ] {
            let mut candidate = alien();
            candidate["poster"] = json!(poster);
            let err = validator.validate(&candidate).unwrap_err();
            assert!(err.has_field("poster"), "{} should fail", poster);
        }
    }

    #[test]
    fn test_genre_is_case_sensitive() {
        let mut candidate = alien();
        candidate["genre"] = json!(["sci-fi"]);
        assert!(MovieValidator::new().validate(&candidate).is_err());
    }

    #[test]
    fn test_not_object() {
        let err = MovieValidator::new().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::NotObject);
    }

    #[test]
    fn test_partial_accepts_subset() {
        let patch = MovieValidator::new()
            .validate_partial(&json!({ "rate": 9, "extra": true }))
            .unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["rate"], 9);
    }

    #[test]
    fn test_partial_still_checks_types() {
        let err = MovieValidator::new()
            .validate_partial(&json!({ "year": "1979" }))
            .unwrap_err();
        assert!(err.has_field("year"));
    }
}
