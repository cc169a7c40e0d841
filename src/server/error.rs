use crate::store::SignError;
use axum::{Json, response::IntoResponse};
use http::{StatusCode, header};
use serde::Serialize;
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum ApiError {
    Sign(SignError),
    BadRequest(String),
    Unauthorized,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<&'static str>>,
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Sign(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Sign(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // short, non-secret message for the response body
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        match self {
            Self::Sign(SignError::Config { missing }) => ErrorResponse {
                error: format!("server is missing configuration: {}", missing.join(", ")),
                missing: Some(missing),
            },
            Self::Sign(SignError::InvalidConfig { name, .. }) => ErrorResponse {
                error: format!("server has an invalid {name} setting"),
                missing: None,
            },
            Self::Sign(SignError::Crypto) => ErrorResponse {
                error: "internal error".to_string(),
                missing: None,
            },
            Self::Sign(err) => ErrorResponse {
                error: err.to_string(),
                missing: None,
            },
            Self::BadRequest(message) => ErrorResponse {
                error: message,
                missing: None,
            },
            Self::Unauthorized => ErrorResponse {
                error: "invalid passcode".to_string(),
                missing: None,
            },
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sign(err) => write!(f, "{err}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SignError> for ApiError {
    fn from(err: SignError) -> Self {
        Self::Sign(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();

        // full detail stays in the server log
        if status_code.is_server_error() {
            log::error!("{status_code}: {self}");
        } else {
            log::warn!("{status_code}: {self}");
        }

        (
            status_code,
            [(
                header::CONTENT_TYPE.as_str(),
                "application/json; charset=utf-8",
            )],
            Json(self.into_error_response()),
        )
            .into_response()
    }
}
