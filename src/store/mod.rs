pub mod credentials;
pub mod error;
pub mod region;
pub mod signature;
pub mod tools;
pub mod verify;
pub use self::{
    credentials::Credentials,
    error::SignError,
    region::Region,
    signature::{Method, PresignRequest, PresignedUrl, presign, presign_at},
};

use std::fmt;
use url::Url;

/// R2 serves every account from `<account_id>.r2.cloudflarestorage.com`
pub const DEFAULT_DOMAIN: &str = "r2.cloudflarestorage.com";

/// Scheme and authority the presigned URL points to. The authority doubles
/// as the only signed header (`host`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
}

impl Endpoint {
    #[must_use]
    pub fn account(account_id: &str, domain: &str) -> Self {
        Self {
            scheme: "https".to_string(),
            host: format!("{account_id}.{domain}"),
        }
    }

    /// Parse an explicit endpoint like `http://127.0.0.1:9000`
    ///
    /// # Errors
    ///
    /// Will return `Err` if the endpoint is not an http(s) URL without a path
    pub fn parse(endpoint: &str) -> Result<Self, SignError> {
        let invalid = |reason: String| SignError::InvalidConfig {
            name: "endpoint",
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        if url.path() != "/" || url.query().is_some() {
            return Err(invalid("endpoint must not contain a path or query".into()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| invalid("endpoint has no host".into()))?;

        // the default port is implied and never part of the Host header
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

/// Everything needed to sign for one bucket, resolved per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    credentials: Credentials,
    region: Region,
    bucket: String,
    endpoint: Endpoint,
}

impl Store {
    #[must_use]
    pub fn new<B: ToString>(
        credentials: &Credentials,
        region: &Region,
        bucket: &B,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            credentials: credentials.clone(),
            region: region.clone(),
            bucket: bucket.to_string(),
            endpoint,
        }
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "endpoint: {}", self.endpoint.base_url())?;
        writeln!(f, "bucket: {}", self.bucket)?;
        writeln!(f, "region: {}", self.region)?;
        write!(
            f,
            "access key: {}",
            tools::mask(self.credentials.access_key_id())
        )
    }
}
