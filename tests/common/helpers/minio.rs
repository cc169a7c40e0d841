//! `MinIO` test helper for integration tests
//!
//! Provides utilities to spin up a `MinIO` container to exercise presigned
//! URLs against a real S3 implementation.
//! Supports both Docker and Podman container runtimes.
//!
//! ## Usage with Podman
//!
//! Set the following environment variables before running tests:
//! ```bash
//! export DOCKER_HOST=unix:///run/user/$(id -u)/podman/podman.sock
//! export TESTCONTAINERS_DOCKER_SOCKET_OVERRIDE=/run/user/$(id -u)/podman/podman.sock
//! cargo test --test e2e_minio -- --ignored
//! ```

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use chrono::Utc;
use pastesign::store::{
    Endpoint, Store,
    signature::{
        ALGORITHM, DATE_FORMAT, DATETIME_FORMAT, QueryParams, SIGNED_HEADERS, X_AMZ_ALGORITHM,
        X_AMZ_CREDENTIAL, X_AMZ_DATE, X_AMZ_EXPIRES, X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
        calculate_signature, canonical_request, credential_scope, encode_path, string_to_sign,
    },
    tools::sha256_hex,
};
use secrecy::ExposeSecret;
use testcontainers::{
    ContainerAsync, GenericImage, ImageExt,
    core::{ContainerPort, WaitFor},
    runners::AsyncRunner,
};

/// Default `MinIO` credentials for testing
pub const MINIO_ROOT_USER: &str = "minioadmin";
pub const MINIO_ROOT_PASSWORD: &str = "minioadmin";

/// `MinIO` test fixture that manages container lifecycle
pub struct MinioContainer {
    #[allow(dead_code)]
    container: ContainerAsync<GenericImage>,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
}

impl MinioContainer {
    /// Start a new `MinIO` container and wait for the S3 port
    pub async fn start() -> Self {
        let image = GenericImage::new("minio/minio", "latest")
            .with_wait_for(WaitFor::message_on_stderr("MinIO Object Storage Server"))
            .with_env_var("MINIO_ROOT_USER", MINIO_ROOT_USER)
            .with_env_var("MINIO_ROOT_PASSWORD", MINIO_ROOT_PASSWORD)
            .with_cmd(vec!["server", "/data", "--console-address", ":9001"]);

        let container = image
            .start()
            .await
            .expect("Failed to start MinIO container");

        let port = container
            .get_host_port_ipv4(ContainerPort::Tcp(9000))
            .await
            .expect("Failed to get MinIO port");

        let endpoint = format!("http://127.0.0.1:{port}");

        Self {
            container,
            endpoint,
            access_key: MINIO_ROOT_USER.to_string(),
            secret_key: MINIO_ROOT_PASSWORD.to_string(),
        }
    }

    /// Get the `MinIO` endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wait for `MinIO` to be ready to accept connections
    pub async fn wait_for_ready(&self) -> anyhow::Result<()> {
        wait_for_ready(&self.endpoint).await
    }
}

pub async fn wait_for_ready(endpoint: &str) -> anyhow::Result<()> {
    use std::time::Duration;
    use tokio::time::sleep;

    let max_attempts = 30;
    let url = format!("{endpoint}/minio/health/live");

    for _ in 0..max_attempts {
        match reqwest::Client::new().get(&url).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            _ => sleep(Duration::from_millis(500)).await,
        }
    }

    Err(anyhow::anyhow!(
        "MinIO did not become ready after {max_attempts} attempts"
    ))
}

/// Create the store's bucket with a presigned bucket-level PUT. Object keys
/// can never be empty, so this composes the signing steps directly.
pub async fn create_bucket(store: &Store) -> anyhow::Result<()> {
    let now = Utc::now();
    let date = now.format(DATE_FORMAT).to_string();
    let datetime = now.format(DATETIME_FORMAT).to_string();
    let region = store.region().name();
    let scope = credential_scope(&date, region);

    let mut params = QueryParams::new();
    params.push(X_AMZ_ALGORITHM, ALGORITHM);
    params.push(
        X_AMZ_CREDENTIAL,
        &format!("{}/{scope}", store.credentials().access_key_id()),
    );
    params.push(X_AMZ_DATE, &datetime);
    params.push(X_AMZ_EXPIRES, "60");
    params.push(X_AMZ_SIGNED_HEADERS, SIGNED_HEADERS);

    let uri = format!("/{}", encode_path(store.bucket()));
    let query = params.canonical();
    let endpoint: &Endpoint = store.endpoint();

    let canonical = canonical_request("PUT", &uri, &query, endpoint.host());
    let sts = string_to_sign(&datetime, &scope, &sha256_hex(canonical.as_bytes())?);
    let signature = calculate_signature(
        store.credentials().secret_access_key().expose_secret(),
        &date,
        region,
        &sts,
    )?;

    let url = format!(
        "{}{uri}?{query}&{X_AMZ_SIGNATURE}={signature}",
        endpoint.base_url()
    );

    let response = reqwest::Client::new().put(&url).send().await?;

    // 409 means the bucket already exists, which is fine
    if response.status().is_success() || response.status().as_u16() == 409 {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Failed to create bucket: {} - {}",
            response.status(),
            response.text().await?
        ))
    }
}
