//! # moviestore HTTP Server Module
//!
//! Routing layer over the document store. Validates input, assigns ids,
//! calls the store and translates its outcomes into status codes.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/` - Greeting
//! - `/movies`, `/movies/:id` - Movie collection

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod movie_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use movie_routes::MovieState;
pub use server::HttpServer;
