//! Movie HTTP Routes
//!
//! - `GET    /`              greeting
//! - `GET    /movies`        all movies, or `?genre=X` membership query
//! - `POST   /movies`        validate, assign id, insert
//! - `GET    /movies/:id`    one movie
//! - `PATCH  /movies/:id`    merge body over stored movie, validate, replace,
//!                           all under the store's writer lock
//! - `DELETE /movies/:id`    remove

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{ApiError, ApiResult};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::MovieValidator;
use crate::store::{DocumentStore, Record, StoreErrorCode};

// ==================
// Shared State
// ==================

/// Movie state shared across handlers
pub struct MovieState {
    pub store: DocumentStore,
    pub validator: MovieValidator,
}

impl MovieState {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            store: DocumentStore::new(data_file),
            validator: MovieValidator::new(),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct ListMoviesQuery {
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub greetings: String,
}

// ==================
// Movie Routes
// ==================

/// Create movie routes
pub fn movie_routes(state: Arc<MovieState>) -> Router {
    Router::new()
        .route("/", get(greeting_handler))
        .route("/movies", get(list_movies_handler).post(create_movie_handler))
        .route(
            "/movies/:id",
            get(get_movie_handler)
                .patch(update_movie_handler)
                .delete(delete_movie_handler),
        )
        .with_state(state)
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

// ==================
// Handlers
// ==================

async fn greeting_handler() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        greetings: "Hello World!".to_string(),
    })
}

async fn list_movies_handler(
    State(state): State<Arc<MovieState>>,
    Query(query): Query<ListMoviesQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    match query.genre.filter(|genre| !genre.is_empty()) {
        Some(genre) => state
            .store
            .find_by_collection_field("genre", &genre)
            .await
            .map(Json)
            .map_err(ApiError::store(format!("Movies not found for genre({})", genre))),
        None => state
            .store
            .find_all()
            .await
            .map(Json)
            .map_err(ApiError::store("Failed to list movies")),
    }
}

async fn get_movie_handler(
    State(state): State<Arc<MovieState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    state
        .store
        .find_by_id(&id)
        .await
        .map(Json)
        .map_err(ApiError::store(format!("Movie not found for ID({})", id)))
}

async fn create_movie_handler(
    State(state): State<Arc<MovieState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let candidate = json_body(body)?;
    let movie = state.validator.validate(&candidate)?;
    let record = movie.with_id(Uuid::new_v4().to_string());
    let title = record.title.clone();

    let created = state.store.insert_new(record).await.map_err(|e| {
        let context = match e.code() {
            StoreErrorCode::DuplicateEntry => {
                format!("Movie already exists ({}), cannot be added.", title)
            }
            _ => format!("Movie ({}) could not be added.", title),
        };
        ApiError::store(context)(e)
    })?;

    log_event_with_fields(
        Event::MovieCreated,
        &[("id", created.id.as_str()), ("title", created.title.as_str())],
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_movie_handler(
    State(state): State<Arc<MovieState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    // The path id wins over any id in the body
    let mut body = json_body(body)?;
    if let Value::Object(object) = &mut body {
        object.remove("id");
    }
    let patch = state.validator.validate_partial(&body)?;

    let persisted = state
        .store
        .update_entry(&id, |existing| {
            let mut merged = existing.to_value();
            if let Value::Object(object) = &mut merged {
                object.extend(patch);
                object.remove("id");
            }
            Ok::<_, ApiError>(state.validator.validate(&merged)?.with_id(id.clone()))
        })
        .await
        .map_err(|e| match e.is_not_found() {
            true => e.with_store_context(format!(
                "Movie not found for ID({}). Cannot UPDATE.",
                id
            )),
            false => e,
        })?;

    log_event_with_fields(Event::MovieUpdated, &[("id", persisted.id.as_str())]);
    Ok((StatusCode::ACCEPTED, Json(persisted)))
}

async fn delete_movie_handler(
    State(state): State<Arc<MovieState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_entry_by_id(&id)
        .await
        .map_err(ApiError::store(format!(
            "Movie not found for ID({}). Cannot DELETE.",
            id
        )))?;

    log_event_with_fields(Event::MovieDeleted, &[("id", id.as_str())]);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_genre_optional() {
        let query: ListMoviesQuery = serde_json::from_str("{}").unwrap();
        assert!(query.genre.is_none());
    }
}
