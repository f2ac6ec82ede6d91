//! Turns handler panics into logged 500 responses.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::web::error::ApiError;

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = detail, "Request handler panicked");

    ApiError::internal("Error: Server error").into_response()
}
