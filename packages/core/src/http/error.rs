//! HTTP error handling
//!
//! Two response shapes exist: the JSON API answers `{"error": "..."}`, while
//! pages and raw text answer with a plain-text body.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::services::NoteServiceError;

/// JSON body of every API error
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned by `POST /api/create`
#[derive(Debug)]
pub enum ApiError {
    EmptyText,
    TooLarge { limit: usize },
    InvalidId,
    IdTaken,
    MalformedRequest,
    AllocationExhausted,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyText | ApiError::InvalidId | ApiError::MalformedRequest => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::IdTaken => StatusCode::CONFLICT,
            ApiError::AllocationExhausted | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::EmptyText => "Text is required".to_string(),
            ApiError::TooLarge { limit } => format!("Too large. Limit {} bytes", limit),
            ApiError::InvalidId => "Invalid id".to_string(),
            ApiError::IdTaken => "ID already exists".to_string(),
            ApiError::MalformedRequest => "Bad Request".to_string(),
            ApiError::AllocationExhausted => "Could not generate unique id".to_string(),
            ApiError::Internal => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::EmptyText => ApiError::EmptyText,
            NoteServiceError::TooLarge { limit } => ApiError::TooLarge { limit },
            NoteServiceError::InvalidId => ApiError::InvalidId,
            NoteServiceError::IdTaken { .. } => ApiError::IdTaken,
            NoteServiceError::AllocationExhausted { attempts } => {
                tracing::error!("❌ No free note id after {} attempts", attempts);
                ApiError::AllocationExhausted
            }
            NoteServiceError::Store(e) => {
                tracing::error!("❌ Store failure while creating note: {}", e);
                ApiError::Internal
            }
        }
    }
}

/// Errors returned by the page and raw routes
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PageError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            PageError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

impl From<NoteServiceError> for PageError {
    fn from(err: NoteServiceError) -> Self {
        tracing::error!("❌ Failed to read note: {}", err);
        PageError::Internal
    }
}
