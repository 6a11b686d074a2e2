//! JSON body extractor with fleet-style rejections.
//!
//! Axum's own [`axum::Json`] rejects bad bodies with a plain-text 4xx.
//! This wrapper routes the rejection through [`ApiError`] so clients get
//! the usual `{"error", "status"}` body. It also works as a response type.

use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// JSON request body or response payload.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
