//! Error types for the fleet API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{"error": <message>, "status": <code>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fleet_core::{AuthError, CommandError};
use fleet_db::DbError;

/// Errors that can occur in the fleet API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was well-formed JSON but semantically invalid.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller is not authenticated.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// A downstream robot transport failed.
    #[error("upstream error: {0}")]
    BadGateway(String),

    /// The job store failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::UnsupportedDirection(_) => {
                Self::BadRequest(String::from("Unsupported direction"))
            }
            CommandError::Transport(e) => Self::BadGateway(e.message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) | Self::InvalidUuid(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::Database(e) => {
                tracing::error!(error = %e, "Job store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("database error"),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
