//! Movie schema validation
//!
//! The routing layer validates every candidate before handing it to the
//! store; the store itself trusts what it receives.
//!
//! - Full validation for inserts and for merged updates
//! - Partial validation (all fields optional) for patch bodies
//! - Unknown fields are stripped, never rejected
//! - No coercion: `"1979"` is not a year

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{FieldDef, FieldType, GENRES, MOVIE_FIELDS};
pub use validator::{MovieValidator, ValidatedMovie};
