//! Document store for moviestore
//!
//! Owns all access to the backing file: one JSON array of records, read in
//! full on every call and rewritten in full on every mutation.
//!
//! # Contracts
//!
//! - `id` is unique; the caller assigns it before insert
//! - `title` is unique; `insert_new` rejects an existing title (exact match)
//! - After every successful write the file holds one complete collection
//! - Empty membership queries are `NotFound`, not an empty list
//!
//! The store never validates record shape and never logs.

mod document_store;
mod errors;
mod file;
mod record;

pub use document_store::DocumentStore;
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use record::{Collection, Record};
