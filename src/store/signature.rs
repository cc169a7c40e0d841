//! S3 signature v4, query string (presigned URL) flavour
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html>

use crate::store::{
    SignError, Store,
    tools::{sha256_hex, sha256_hmac, write_hex_bytes},
};
use chrono::prelude::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ring::hmac;
use secrecy::ExposeSecret;
use std::fmt;
use std::str::FromStr;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE: &str = "s3";
pub const TERMINATOR: &str = "aws4_request";
pub const SIGNED_HEADERS: &str = "host";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

pub const X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";
pub const X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";
pub const X_AMZ_DATE: &str = "X-Amz-Date";
pub const X_AMZ_EXPIRES: &str = "X-Amz-Expires";
pub const X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";
pub const X_AMZ_SIGNATURE: &str = "X-Amz-Signature";
pub const RESPONSE_CONTENT_DISPOSITION: &str = "response-content-disposition";

/// Seven days, the longest validity SigV4 accepts for a presigned URL
pub const MAX_EXPIRES: u64 = 604_800;
pub const DEFAULT_EXPIRES: u64 = 300;

pub const DATE_FORMAT: &str = "%Y%m%d";
pub const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

// Unreserved characters per RFC 3986: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~'.
// Everything else is escaped, including "/" and the sub-delims ! ' ( ) *
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// Same as QUERY but "/" stays literal so keys keep their path segments
const PATH: &AsciiSet = &QUERY.remove(b'/');

/// Methods a presigned URL may authorize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    Get,
    #[default]
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(SignError::validation(format!(
                "method not allowed: {s}, expected GET, PUT or DELETE"
            ))),
        }
    }
}

/// A validated request to presign: one method, one key, one expiry window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    method: Method,
    key: String,
    expires: u64,
}

impl PresignRequest {
    /// # Errors
    ///
    /// Will return `Err` if the key is empty or expires is not in `1..=604800`
    pub fn new(method: Method, key: &str, expires: u64) -> Result<Self, SignError> {
        if key.trim().is_empty() {
            return Err(SignError::validation("object key is required"));
        }

        if expires == 0 || expires > MAX_EXPIRES {
            return Err(SignError::validation(format!(
                "expires must be between 1 and {MAX_EXPIRES} seconds"
            )));
        }

        Ok(Self {
            method,
            key: key.to_string(),
            expires,
        })
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn expires(&self) -> u64 {
        self.expires
    }
}

/// A presigned url with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    url: String,
    signed_at: DateTime<Utc>,
    expires: u64,
}

impl PresignedUrl {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn into_url(self) -> String {
        self.url
    }

    #[must_use]
    pub const fn signed_at(&self) -> DateTime<Utc> {
        self.signed_at
    }

    /// Get the time the presigned url expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        // expires is bounded by MAX_EXPIRES so it always fits
        self.signed_at + chrono::Duration::seconds(i64::try_from(self.expires).unwrap_or(0))
    }
}

impl fmt::Display for PresignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Ordered list of query parameters, sorted only when canonicalized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.0.push((name.to_string(), value.to_string()));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    // CanonicalQueryString: names and values are URI-encoded individually and
    // the pairs sorted by encoded name (byte order), then by value.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut pairs = self
            .0
            .iter()
            .map(|(name, value)| (encode_query(name), encode_query(value)))
            .collect::<Vec<(String, String)>>();
        pairs.sort();
        pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<String>>()
            .join("&")
    }
}

/// Strict RFC 3986 encoding for query names and values
#[must_use]
pub fn encode_query(input: &str) -> String {
    utf8_percent_encode(input, QUERY).to_string()
}

/// Path encoding, keeps "/" literal
#[must_use]
pub fn encode_path(input: &str) -> String {
    utf8_percent_encode(input, PATH).to_string()
}

// CanonicalURI, path style: /<bucket>/<key>
#[must_use]
pub fn canonical_uri(bucket: &str, key: &str) -> String {
    format!("/{}/{}", encode_path(bucket), encode_path(key))
}

/// Last "/" segment of the key, "download" when it is empty
#[must_use]
pub fn filename(key: &str) -> &str {
    match key.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => "download",
    }
}

#[must_use]
pub fn content_disposition(key: &str) -> String {
    format!("attachment; filename=\"{}\"", filename(key))
}

#[must_use]
pub fn credential_scope(date: &str, region: &str) -> String {
    format!("{date}/{region}/{SERVICE}/{TERMINATOR}")
}

//     CanonicalRequest =
//         HTTPRequestMethod + '\n' +
//         CanonicalURI + '\n' +
//         CanonicalQueryString + '\n' +
//         CanonicalHeaders + '\n' +
//         SignedHeaders + '\n' +
//         UNSIGNED-PAYLOAD
//
// Only host is signed, so CanonicalHeaders is the single line "host:<host>\n"
#[must_use]
pub fn canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query_string: &str,
    host: &str,
) -> String {
    format!(
        "{method}\n{canonical_uri}\n{canonical_query_string}\nhost:{host}\n\n{SIGNED_HEADERS}\n{UNSIGNED_PAYLOAD}"
    )
}

// Create a string to sign for Signature Version 4
// https://docs.aws.amazon.com/general/latest/gr/sigv4-create-string-to-sign.html
#[must_use]
pub fn string_to_sign(timestamp: &str, scope: &str, hashed_canonical_request: &str) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{scope}\n{hashed_canonical_request}")
}

// kSecret -> kDate -> kRegion -> kService -> kSigning, every step keyed with
// the raw bytes of the previous one
#[must_use]
pub fn signature_key(secret_access_key: &str, date: &str, region: &str, service: &str) -> hmac::Tag {
    let k_date = sha256_hmac(
        format!("AWS4{secret_access_key}").as_bytes(),
        date.as_bytes(),
    );
    let k_region = sha256_hmac(k_date.as_ref(), region.as_bytes());
    let k_service = sha256_hmac(k_region.as_ref(), service.as_bytes());
    sha256_hmac(k_service.as_ref(), TERMINATOR.as_bytes())
}

/// Hex signature of `string_to_sign` for the given day and region
///
/// # Errors
///
/// Will return `Err` if the signature can not be hex encoded
pub fn calculate_signature(
    secret_access_key: &str,
    date: &str,
    region: &str,
    string_to_sign: &str,
) -> Result<String, SignError> {
    let signing_key = signature_key(secret_access_key, date, region, SERVICE);
    write_hex_bytes(sha256_hmac(signing_key.as_ref(), string_to_sign.as_bytes()).as_ref())
}

/// The presign query parameters, in insertion order, without the signature
#[must_use]
pub fn presign_params(
    access_key_id: &str,
    scope: &str,
    datetime: &str,
    request: &PresignRequest,
) -> QueryParams {
    let mut params = QueryParams::new();
    params.push(X_AMZ_ALGORITHM, ALGORITHM);
    params.push(X_AMZ_CREDENTIAL, &format!("{access_key_id}/{scope}"));
    params.push(X_AMZ_DATE, datetime);
    params.push(X_AMZ_EXPIRES, &request.expires().to_string());
    params.push(X_AMZ_SIGNED_HEADERS, SIGNED_HEADERS);

    // force browsers to download instead of rendering inline
    if request.method() == Method::Get {
        params.push(
            RESPONSE_CONTENT_DISPOSITION,
            &content_disposition(request.key()),
        );
    }

    params
}

/// Presign `request` against `store` using the current time
///
/// # Errors
///
/// Will return `Err` if the signature can not be computed
pub fn presign(store: &Store, request: &PresignRequest) -> Result<PresignedUrl, SignError> {
    presign_at(store, request, Utc::now())
}

/// Presign `request` against `store` as of `now`
///
/// # Errors
///
/// Will return `Err` if the signature can not be computed
pub fn presign_at(
    store: &Store,
    request: &PresignRequest,
    now: DateTime<Utc>,
) -> Result<PresignedUrl, SignError> {
    let current_date = now.format(DATE_FORMAT).to_string();
    let current_datetime = now.format(DATETIME_FORMAT).to_string();
    let region = store.region().name();
    let scope = credential_scope(&current_date, region);

    let params = presign_params(
        store.credentials().access_key_id(),
        &scope,
        &current_datetime,
        request,
    );

    let canonical_uri = canonical_uri(store.bucket(), request.key());
    let canonical_query_string = params.canonical();

    let canonical_request = canonical_request(
        request.method().as_str(),
        &canonical_uri,
        &canonical_query_string,
        store.endpoint().host(),
    );

    log::debug!("canonical request:\n{canonical_request}");

    let string_to_sign = string_to_sign(
        &current_datetime,
        &scope,
        &sha256_hex(canonical_request.as_bytes())?,
    );

    let signature = calculate_signature(
        store.credentials().secret_access_key().expose_secret(),
        &current_date,
        region,
        &string_to_sign,
    )?;

    let url = format!(
        "{}{canonical_uri}?{canonical_query_string}&{X_AMZ_SIGNATURE}={signature}",
        store.endpoint().base_url()
    );

    Ok(PresignedUrl {
        url,
        signed_at: now,
        expires: request.expires(),
    })
}
