//! # HTTP Server
//!
//! Combines the movie and health routers behind a CORS layer and serves them.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::movie_routes::{movie_routes, MovieState};
use crate::observability::{log_event_with_fields, Event, Logger};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// HTTP Server for the movie API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given state
    pub fn new(config: HttpServerConfig, state: Arc<MovieState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods(ALLOWED_METHODS)
            .allow_headers([header::CONTENT_TYPE]);

        if config.cors_origins.is_empty() {
            return cors.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    Logger::warn("CORS_ORIGIN_IGNORED", &[("origin", origin.as_str())]);
                    None
                }
            })
            .collect();

        cors.allow_origin(AllowOrigin::list(origins))
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<MovieState>) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(movie_routes(state))
            .layer(Self::cors_layer(config))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let url = format!("http://{}", listener.local_addr()?);
        log_event_with_fields(Event::Serving, &[("url", url.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<MovieState> {
        Arc::new(MovieState::new("./data/movies.json"))
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), state());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_bad_origin() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://ok.example".to_string(), "bad\norigin".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, state()).router();
    }

    #[test]
    fn test_router_builds_with_any_origin() {
        let config = HttpServerConfig {
            cors_origins: vec![],
            ..Default::default()
        };
        let _router = HttpServer::new(config, state()).router();
    }
}
