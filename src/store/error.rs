use thiserror::Error;

/// Errors produced while presigning or verifying a URL.
///
/// None of the variants carry secret material: configuration errors name
/// the missing settings, crypto errors are deliberately opaque.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    #[error("missing configuration: {}", .missing.join(", "))]
    Config { missing: Vec<&'static str> },

    #[error("invalid configuration value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("{0}")]
    Validation(String),

    #[error("cryptographic failure while signing")]
    Crypto,

    #[error("signature verification failed: {0}")]
    Verification(String),
}

impl SignError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification(message.into())
    }

    /// Errors caused by the caller's input rather than the server setup.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Verification(_))
    }

    /// Names of the missing configuration values, if any.
    #[must_use]
    pub fn missing(&self) -> Option<&[&'static str]> {
        match self {
            Self::Config { missing } => Some(missing.as_slice()),
            _ => None,
        }
    }
}
