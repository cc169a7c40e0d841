//! Shared passcode check.

use crate::server::{error::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::HeaderValue;
use secrecy::ExposeSecret;
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const PASSCODE_HEADER: &str = "x-passcode";

/// Reject the request unless `x-passcode` matches the configured passcode.
/// Without a configured passcode every request passes.
pub async fn require_passcode(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.host().passcode() {
        let provided = request
            .headers()
            .get(PASSCODE_HEADER)
            .map(HeaderValue::as_bytes)
            .unwrap_or_default();

        if !passcode_matches(provided, expected.expose_secret().as_bytes()) {
            return ApiError::Unauthorized.into_response();
        }
    }

    next.run(request).await
}

fn passcode_matches(provided: &[u8], expected: &[u8]) -> bool {
    bool::from(provided.ct_eq(expected))
}
