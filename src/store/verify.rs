//! Inverse of [`presign`](crate::store::presign): recompute the canonical
//! request from a captured URL and check its signature.

use crate::store::{
    Method, SignError, Store,
    signature::{
        ALGORITHM, DATE_FORMAT, DATETIME_FORMAT, MAX_EXPIRES, QueryParams, SERVICE,
        SIGNED_HEADERS, TERMINATOR, X_AMZ_ALGORITHM, X_AMZ_CREDENTIAL, X_AMZ_DATE,
        X_AMZ_EXPIRES, X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS, canonical_request, encode_path,
        signature_key, string_to_sign,
    },
    tools::sha256_hex,
};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;
use ring::hmac;
use secrecy::ExposeSecret;

/// How far in the future `X-Amz-Date` may be before the URL is rejected
pub const MAX_CLOCK_SKEW: i64 = 900;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUrl {
    pub method: Method,
    pub key: String,
    pub signed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Check that `url` is a valid presigned URL for `method` on `store` at `now`
///
/// # Errors
///
/// Will return `Err` if the URL was not produced for this store, has expired,
/// or its signature does not match
pub fn verify(
    store: &Store,
    url: &str,
    method: Method,
    now: DateTime<Utc>,
) -> Result<VerifiedUrl, SignError> {
    let (base, query) = url
        .split_once('?')
        .ok_or_else(|| SignError::verification("url has no query string"))?;

    let base_url = store.endpoint().base_url();
    let path = base
        .strip_prefix(base_url.as_str())
        .filter(|path| path.starts_with('/'))
        .ok_or_else(|| SignError::verification(format!("url is not served by {base_url}")))?;

    let key = object_key(path, store.bucket())?;
    let (params, signature) = parse_query(query)?;

    let algorithm = required(&params, X_AMZ_ALGORITHM)?;
    if algorithm != ALGORITHM {
        return Err(SignError::verification(format!(
            "unsupported algorithm {algorithm}"
        )));
    }

    let signed_headers = required(&params, X_AMZ_SIGNED_HEADERS)?;
    if signed_headers != SIGNED_HEADERS {
        return Err(SignError::verification(format!(
            "unexpected signed headers {signed_headers}"
        )));
    }

    let datetime = required(&params, X_AMZ_DATE)?;
    let signed_at = NaiveDateTime::parse_from_str(datetime, DATETIME_FORMAT)
        .map_err(|e| SignError::verification(format!("invalid {X_AMZ_DATE}: {e}")))?
        .and_utc();
    let date = signed_at.format(DATE_FORMAT).to_string();

    let region = store.region().name();
    let scope = check_credential(
        required(&params, X_AMZ_CREDENTIAL)?,
        store.credentials().access_key_id(),
        &date,
        region,
    )?;

    let expires = required(&params, X_AMZ_EXPIRES)?
        .parse::<u64>()
        .ok()
        .filter(|e| (1..=MAX_EXPIRES).contains(e))
        .ok_or_else(|| SignError::verification(format!("invalid {X_AMZ_EXPIRES}")))?;
    let expires_at = signed_at + Duration::seconds(i64::try_from(expires).unwrap_or(0));

    if signed_at > now + Duration::seconds(MAX_CLOCK_SKEW) {
        return Err(SignError::verification("request date is in the future"));
    }

    if now > expires_at {
        return Err(SignError::verification(format!(
            "url expired at {}",
            expires_at.format(DATETIME_FORMAT)
        )));
    }

    let canonical_request = canonical_request(
        method.as_str(),
        path,
        &params.canonical(),
        store.endpoint().host(),
    );

    log::debug!("canonical request:\n{canonical_request}");

    let string_to_sign = string_to_sign(datetime, &scope, &sha256_hex(canonical_request)?);

    let signing_key = signature_key(
        store.credentials().secret_access_key().expose_secret(),
        &date,
        region,
        SERVICE,
    );

    let signature = hex::decode(signature)
        .map_err(|_| SignError::verification(format!("malformed {X_AMZ_SIGNATURE}")))?;

    hmac::verify(
        &hmac::Key::new(hmac::HMAC_SHA256, signing_key.as_ref()),
        string_to_sign.as_bytes(),
        &signature,
    )
    .map_err(|_| SignError::verification("signature does not match"))?;

    Ok(VerifiedUrl {
        method,
        key,
        signed_at,
        expires_at,
    })
}

// path must be /<bucket>/<key> in canonical (path-preserving) encoding
fn object_key(path: &str, bucket: &str) -> Result<String, SignError> {
    let encoded = path
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(encode_path(bucket).as_str()))
        .and_then(|p| p.strip_prefix('/'))
        .filter(|k| !k.is_empty())
        .ok_or_else(|| SignError::verification(format!("url is not in bucket {bucket}")))?;

    let key = percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|_| SignError::verification("object key is not valid UTF-8"))?
        .to_string();

    if encode_path(&key) != encoded {
        return Err(SignError::verification("object key is not canonically encoded"));
    }

    Ok(key)
}

// split the raw query into decoded params and the signature
fn parse_query(query: &str) -> Result<(QueryParams, String), SignError> {
    let mut params = QueryParams::new();
    let mut signature = None;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode(name)?;
        let value = decode(value)?;

        if name == X_AMZ_SIGNATURE {
            if signature.replace(value).is_some() {
                return Err(SignError::verification(format!(
                    "duplicate {X_AMZ_SIGNATURE}"
                )));
            }
        } else {
            params.push(&name, &value);
        }
    }

    let signature =
        signature.ok_or_else(|| SignError::verification(format!("missing {X_AMZ_SIGNATURE}")))?;

    Ok((params, signature))
}

fn decode(input: &str) -> Result<String, SignError> {
    percent_decode_str(input)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|_| SignError::verification("query string is not valid UTF-8"))
}

fn required<'a>(params: &'a QueryParams, name: &str) -> Result<&'a str, SignError> {
    params
        .get(name)
        .ok_or_else(|| SignError::verification(format!("missing {name}")))
}

// <access key>/<date>/<region>/s3/aws4_request, returns the scope part
fn check_credential(
    credential: &str,
    access_key_id: &str,
    date: &str,
    region: &str,
) -> Result<String, SignError> {
    let (access_key, scope) = credential
        .split_once('/')
        .ok_or_else(|| SignError::verification(format!("malformed {X_AMZ_CREDENTIAL}")))?;

    if access_key != access_key_id {
        return Err(SignError::verification("unknown access key"));
    }

    let expected = format!("{date}/{region}/{SERVICE}/{TERMINATOR}");
    if scope != expected {
        return Err(SignError::verification(format!(
            "credential scope {scope} does not match {expected}"
        )));
    }

    Ok(expected)
}
