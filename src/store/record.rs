//! Record and collection types
//!
//! On disk a record is a flat JSON object:
//!
//! ```text
//! { "id": "<uuid>", "title": "Alien", "year": 1979, "genre": ["Sci-Fi"], ... }
//! ```
//!
//! `id` and `title` are typed because the store enforces contracts on them.
//! Every other member is carried in an open map the store never interprets,
//! so shape rules stay with the schema validator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The ordered sequence of all records, i.e. the full backing file content.
pub type Collection = Vec<Record>;

/// One entry of the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Globally unique identifier, assigned by the caller before insert
    pub id: String,
    /// Secondary uniqueness key (exact, case-sensitive)
    pub title: String,
    /// All remaining members, opaque to the store
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record with no extra fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style setter for an extra field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Convert the record back into a JSON object
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 2);
        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.insert("title".to_string(), Value::String(self.title.clone()));
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }

    /// Exact equality of a named scalar member against `value`.
    ///
    /// `id` and `title` resolve to the typed members, anything else to the
    /// open field map. A missing member never matches.
    pub fn field_equals(&self, name: &str, value: &Value) -> bool {
        match name {
            "id" => value.as_str() == Some(self.id.as_str()),
            "title" => value.as_str() == Some(self.title.as_str()),
            other => self.fields.get(other) == Some(value),
        }
    }

    /// Whether the list-valued member `name` holds a string entry equal to
    /// `needle` ignoring case. Missing or non-list members never match.
    pub fn list_contains_ignore_case(&self, name: &str, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match self.fields.get(name) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(Value::as_str)
                .any(|entry| entry.to_lowercase() == needle),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alien() -> Record {
        Record::new("1", "Alien")
            .with_field("year", 1979)
            .with_field("genre", json!(["Sci-Fi", "Horror"]))
    }

    #[test]
    fn test_flattened_serialization() {
        let value = serde_json::to_value(alien()).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["title"], "Alien");
        assert_eq!(value["year"], 1979);
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn test_unknown_members_survive_parse() {
        let record = serde_json::from_value::<Record>(json!({
            "id": "x",
            "title": "Heat",
            "director": "Michael Mann",
            "rate": 8.3
        }))
        .unwrap();

        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.to_value()["director"], "Michael Mann");
    }

    #[test]
    fn test_missing_title_is_rejected() {
        assert!(serde_json::from_value::<Record>(json!({ "id": "x" })).is_err());
        assert!(serde_json::from_value::<Record>(json!({ "id": 1, "title": "t" })).is_err());
    }

    #[test]
    fn test_field_equals() {
        let record = alien();
        assert!(record.field_equals("id", &json!("1")));
        assert!(record.field_equals("title", &json!("Alien")));
        assert!(!record.field_equals("title", &json!("alien")));
        assert!(record.field_equals("year", &json!(1979)));
        assert!(!record.field_equals("director", &json!("Ridley Scott")));
    }

    #[test]
    fn test_list_contains_ignore_case() {
        let record = alien();
        assert!(record.list_contains_ignore_case("genre", "sci-fi"));
        assert!(record.list_contains_ignore_case("genre", "HORROR"));
        assert!(!record.list_contains_ignore_case("genre", "Drama"));
        assert!(!record.list_contains_ignore_case("year", "1979"));
        assert!(!record.list_contains_ignore_case("cast", "anyone"));
    }
}
