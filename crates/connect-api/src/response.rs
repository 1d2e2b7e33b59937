//! # Response Writer
//!
//! JSON and plain-text response helpers shared by the handlers.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use connect_core::ConnectError;
use serde::Serialize;
use tracing::error;

/// `{"error": {"message": "..."}}`, the only structured error shape
/// sent to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponseMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorResponseMessage {
                message: message.into(),
            },
        }
    }
}

/// Serialize `value` as a 200 JSON response. `None` and `()` become `null`.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> Response {
    write_json_error(value, StatusCode::OK)
}

/// Serialize `value` as a JSON response with an explicit status.
///
/// A value that fails to serialize turns into a plain-text 500 carrying
/// the serializer's message.
pub fn write_json_error<T: Serialize + ?Sized>(value: &T, code: StatusCode) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (code, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!("serde_json::to_vec: {}", e);
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Wrap `message` in an [`ErrorResponse`] and write it with `code`
pub fn write_json_error_message(message: impl Into<String>, code: StatusCode) -> Response {
    write_json_error(&ErrorResponse::new(message), code)
}

/// Write a [`ConnectError`] as an [`ErrorResponse`] with its status code
pub fn write_connect_error(err: &ConnectError) -> Response {
    let code =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    write_json_error_message(err.to_string(), code)
}

/// Plain-text response
pub fn plain_text(code: StatusCode, message: impl Into<String>) -> Response {
    (code, message.into()).into_response()
}
