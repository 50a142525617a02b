//! HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST`   | `/strings` | Analyze and store a string |
//! | `GET`    | `/strings` | List stored strings with structured filters |
//! | `GET`    | `/strings/filter-by-natural-language` | List strings matching a known phrase |
//! | `DELETE` | `/strings/filter-by-natural-language` | Delete the string with that literal value |
//! | `GET`    | `/strings/{string_value}` | Fetch a string by its exact value |
//! | `DELETE` | `/strings/{string_value}` | Delete a string by its exact value |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "String not found" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//! A duplicate string is reported as `bad_request`.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use string_analyzer_core::models::StringRecord;
use string_analyzer_core::query::{interpret, InterpretedQuery, StringFilter};
use string_analyzer_core::store::{StoreError, StringStore};

use crate::config::Config;
use crate::db;
use crate::migrate::run_migrations;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StringStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn StringStore>) -> Self {
        Self { store }
    }
}

/// Build the router over any [`StringStore`].
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/strings", get(handle_list).post(handle_create))
        .route(
            "/strings/filter-by-natural-language",
            get(handle_natural_language).delete(handle_delete_shadowed),
        )
        .route(
            "/strings/{string_value}",
            get(handle_get).delete(handle_delete),
        )
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Opens the pool once, runs migrations, and serves on `[server].bind`
/// until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(Arc::new(SqliteStore::new(pool)));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => {
                bad_request("String already exists in the DB, Try another String")
            }
            StoreError::Backend(e) => {
                tracing::error!(error = %e, "store failure");
                internal(e.to_string())
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /strings ============

#[derive(Deserialize)]
pub struct CreateStringRequest {
    pub value: String,
}

/// Handler for `POST /strings`.
///
/// Returns `200` with the stored record, or `400` if the same value (by
/// content hash) is already stored.
async fn handle_create(
    State(state): State<AppState>,
    body: Result<Json<CreateStringRequest>, JsonRejection>,
) -> Result<Json<StringRecord>, AppError> {
    let Json(req) = body.map_err(|e| bad_request(e.body_text()))?;

    let record = StringRecord::new(req.value);
    state.store.insert(&record).await?;

    tracing::info!(id = %record.id, length = record.properties.length, "analyzed string");
    Ok(Json(record))
}

// ============ GET/DELETE /strings/{string_value} ============

async fn handle_get(
    State(state): State<AppState>,
    Path(string_value): Path<String>,
) -> Result<Json<StringRecord>, AppError> {
    state
        .store
        .find_by_value(&string_value)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("String not found"))
}

async fn delete_value(state: &AppState, value: &str) -> Result<StatusCode, AppError> {
    if state.store.delete_by_value(value).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("String not found"))
    }
}

/// Handler for `DELETE /strings/{string_value}`. `204` on success.
async fn handle_delete(
    State(state): State<AppState>,
    Path(string_value): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_value(&state, &string_value).await
}

/// `DELETE /strings/filter-by-natural-language`: the static GET route
/// shadows `{string_value}` for this literal, so deletes of a string with
/// that exact value are routed here.
async fn handle_delete_shadowed(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    delete_value(&state, "filter-by-natural-language").await
}

// ============ GET /strings ============

#[derive(Serialize)]
pub struct ListResponse {
    pub data: Vec<StringRecord>,
    pub count: usize,
    pub filters_applied: StringFilter,
}

/// Handler for `GET /strings`.
///
/// All query parameters are optional and combined with AND. Malformed
/// values (negative lengths, `word_count=0`, multi-character
/// `contains_character`) are rejected with `400`.
async fn handle_list(
    State(state): State<AppState>,
    params: Result<Query<StringFilter>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(filter) = params.map_err(|e| bad_request(e.body_text()))?;
    filter.validate().map_err(bad_request)?;

    let data = state.store.list(&filter).await?;
    Ok(Json(ListResponse {
        count: data.len(),
        data,
        filters_applied: filter,
    }))
}

// ============ GET /strings/filter-by-natural-language ============

#[derive(Deserialize)]
pub struct NaturalLanguageParams {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct NaturalLanguageResponse {
    pub data: Vec<StringRecord>,
    pub count: usize,
    pub interpreted_query: InterpretedQuery,
}

async fn handle_natural_language(
    State(state): State<AppState>,
    Query(params): Query<NaturalLanguageParams>,
) -> Result<Json<NaturalLanguageResponse>, AppError> {
    let (filter, interpreted_query) = interpret(params.query.as_deref());

    let data = state.store.list(&filter).await?;
    Ok(Json(NaturalLanguageResponse {
        count: data.len(),
        data,
        interpreted_query,
    }))
}
