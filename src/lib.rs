//! moviestore - a movie catalogue HTTP API backed by one JSON file
//!
//! The document store is the core: it loads the whole collection on every
//! call and rewrites the whole file on every mutation. Validation, routing
//! and the CLI sit around it.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod store;
