//! Note and page endpoints
//!
//! # Endpoints
//!
//! - `GET /` and `GET /index.html` - editor page
//! - `GET /about` - about page
//! - `GET /api/health` - health check
//! - `POST /api/create` - create a note (JSON in/out)
//! - `GET /raw/{id}` - note text as `text/plain`
//! - `GET /{id}` - note view page
//!
//! Any other method or path answers 404 `Not found`.
//!
//! Note ids are taken from the raw request path, without percent-decoding,
//! so `/%61bc` does not resolve to note `abc`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::{AppState, ApiError, PageError};
use crate::models::CreatedNote;
use crate::render;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home).fallback(not_found))
        .route("/index.html", get(home).fallback(not_found))
        .route("/about", get(about).fallback(not_found))
        .route("/api/health", get(health_check).fallback(not_found))
        .route("/api/create", post(create_note).fallback(not_found))
        .route("/raw/*id", get(raw_note).fallback(not_found))
        .route("/:id", get(view_note).fallback(not_found))
}

pub async fn not_found() -> Response {
    PageError::NotFound.into_response()
}

async fn home(State(state): State<AppState>) -> Html<String> {
    Html(render::home_page(state.notes.config().max_bytes))
}

async fn about() -> Html<String> {
    Html(render::about_page())
}

/// ```bash
/// curl http://localhost:8787/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create a note
///
/// # Request Body
///
/// `{"text": string, "id"?: string}`. Fields of any other JSON type are
/// treated as absent.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8787/api/create \
///   -H "Content-Type: application/json" \
///   -d '{"text": "Hello World", "id": "greeting"}'
/// ```
async fn create_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreatedNote>), ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge {
                limit: state.notes.config().max_bytes,
            }
        } else {
            ApiError::MalformedRequest
        }
    })?;

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejecting malformed create request: {}", e);
        ApiError::MalformedRequest
    })?;

    let text = payload.get("text").and_then(Value::as_str).unwrap_or("");
    let custom_id = payload.get("id").and_then(Value::as_str);

    let origin = state.origin(&headers);
    let created = state.notes.create(text, custom_id, &origin).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn raw_note(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let id = note_id(&uri, "/raw/").ok_or(PageError::NotFound)?;

    let text = state.notes.read_raw(id).await?.ok_or(PageError::NotFound)?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}

async fn view_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Html<String>, PageError> {
    let id = note_id(&uri, "/").ok_or(PageError::NotFound)?;

    let text = state.notes.read(id).await?.ok_or(PageError::NotFound)?;

    Ok(Html(render::view_page(id, &text, &state.origin(&headers))))
}

/// Id segment after `prefix`, exactly as it appears on the wire
fn note_id<'a>(uri: &'a Uri, prefix: &str) -> Option<&'a str> {
    uri.path()
        .strip_prefix(prefix)
        .filter(|id| !id.is_empty())
}
