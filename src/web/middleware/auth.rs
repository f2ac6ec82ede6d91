//! HTTP Basic authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Decode a `Basic <base64(user:pass)>` header value. The scheme is case-insensitive.
pub fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }
    let encoded = encoded.trim();
    let decoded = BASE64.decode(encoded).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, password) = credentials.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Check a header value against the configured credentials.
pub fn check_credentials(header: &str, auth: &AuthConfig) -> bool {
    match parse_basic(header) {
        Some((username, password)) => username == auth.username && password == auth.password,
        None => false,
    }
}

/// Reject requests without valid admin credentials.
pub async fn basic_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(h) => h,
        None => return Err(ApiError::unauthorized("Authentication required")),
    };

    if !check_credentials(header, &state.auth) {
        tracing::debug!("Rejected Basic credentials");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Ok(next.run(request).await)
}
