//! Movie schema definition
//!
//! | field    | type                  | required |
//! |----------|-----------------------|----------|
//! | id       | uuid string           | no       |
//! | title    | string                | yes      |
//! | year     | int, 1920..=2022      | yes      |
//! | director | string                | yes      |
//! | duration | int, >= 1             | yes      |
//! | rate     | number, 0..=10        | no       |
//! | poster   | http(s) url           | yes      |
//! | genre    | array of [`GENRES`]   | yes      |

/// Accepted genre labels (exact spelling)
pub const GENRES: &[&str] = &["Action", "Drama", "Sci-Fi", "Crime"];

/// Supported field types
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// String that parses as a UUID
    Uuid,
    /// String that is an absolute http(s) URL
    Url,
    /// Integer within an inclusive range
    Int { min: i64, max: i64 },
    /// Any number within an inclusive range
    Number { min: f64, max: f64 },
    /// Array whose entries are each one of `allowed`
    EnumArray { allowed: &'static [&'static str] },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn describe(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Uuid => "uuid string".to_string(),
            FieldType::Url => "http(s) url".to_string(),
            FieldType::Int { min, max } if *max == i64::MAX => format!("integer >= {}", min),
            FieldType::Int { min, max } => format!("integer in {}..={}", min, max),
            FieldType::Number { min, max } => format!("number in {}..={}", min, max),
            FieldType::EnumArray { allowed } => format!("array of {}", allowed.join("|")),
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Whether field must be present (ignored by partial validation)
    pub required: bool,
}

impl FieldDef {
    const fn new(name: &'static str, field_type: FieldType, required: bool) -> Self {
        Self {
            name,
            field_type,
            required,
        }
    }
}

pub const MOVIE_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldType::Uuid, false),
    FieldDef::new("title", FieldType::String, true),
    FieldDef::new("year", FieldType::Int { min: 1920, max: 2022 }, true),
    FieldDef::new("director", FieldType::String, true),
    FieldDef::new("duration", FieldType::Int { min: 1, max: i64::MAX }, true),
    FieldDef::new("rate", FieldType::Number { min: 0.0, max: 10.0 }, false),
    FieldDef::new("poster", FieldType::Url, true),
    FieldDef::new("genre", FieldType::EnumArray { allowed: GENRES }, true),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_unique() {
        let mut names: Vec<_> = MOVIE_FIELDS.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MOVIE_FIELDS.len());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            FieldType::Int { min: 1920, max: 2022 }.describe(),
            "integer in 1920..=2022"
        );
        assert_eq!(FieldType::Int { min: 1, max: i64::MAX }.describe(), "integer >= 1");
        assert_eq!(
            FieldType::EnumArray { allowed: GENRES }.describe(),
            "array of Action|Drama|Sci-Fi|Crime"
        );
    }
}
