//! Routes of the signing service.

use crate::{
    server::{auth, error::ApiError, state::AppState},
    store::{Method, PresignRequest, PresignedUrl, SignError, signature::DEFAULT_EXPIRES},
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware,
    routing::{get, post},
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub key: Option<String>,
    pub method: Option<String>,
    pub expires: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub url: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub configured: BTreeMap<String, bool>,
    pub account_id: Option<String>,
    pub bucket: Option<String>,
    pub region: String,
    pub passcode_required: bool,
}

impl From<PresignedUrl> for SignResponse {
    fn from(presigned: PresignedUrl) -> Self {
        Self {
            expires_at: presigned
                .expires_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            url: presigned.into_url(),
        }
    }
}

/// Builds the router for the signing service
pub fn build_router(state: Arc<AppState>) -> Router {
    let signing = Router::new()
        .route("/api/sign", post(sign))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_passcode,
        ));

    Router::new()
        .route("/api/health", get(health))
        .merge(signing)
        .with_state(state)
}

impl SignRequest {
    /// Apply defaults (PUT, 300 seconds) and validate
    ///
    /// # Errors
    ///
    /// Will return `Err` if the method, key or expiry is not acceptable
    pub fn into_presign_request(self) -> Result<PresignRequest, SignError> {
        let method = match self.method.as_deref() {
            Some(method) => method.parse::<Method>()?,
            None => Method::default(),
        };

        let expires = match self.expires {
            Some(expires) => u64::try_from(expires)
                .map_err(|_| SignError::validation("expires must be a positive number"))?,
            None => DEFAULT_EXPIRES,
        };

        PresignRequest::new(method, self.key.as_deref().unwrap_or_default(), expires)
    }
}

async fn sign(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<SignResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let request = payload.into_presign_request()?;

    let presigned = state.sign(&request)?;

    log::info!(
        "signed {} {} for {}s",
        request.method(),
        request.key(),
        request.expires()
    );

    Ok(Json(presigned.into()))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let host = state.host();

    let status = match host.store() {
        Ok(_) => "ok",
        Err(err) => {
            log::warn!("health: {err}");
            "misconfigured"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        configured: host
            .configured()
            .into_iter()
            .map(|(name, present)| (name.to_string(), present))
            .collect(),
        account_id: host.masked_account_id(),
        bucket: host.bucket.clone(),
        region: host
            .region()
            .map_or_else(|_| "invalid".to_string(), |r| r.to_string()),
        passcode_required: host.passcode().is_some(),
    })
}
