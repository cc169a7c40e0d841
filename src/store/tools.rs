use crate::store::SignError;
use ring::{digest, hmac};
use std::fmt::Write;

#[must_use]
pub fn sha256_digest(input: impl AsRef<[u8]>) -> digest::Digest {
    digest::digest(&digest::SHA256, input.as_ref())
}

/// Lowercase hex of the SHA-256 of `input`
///
/// # Errors
///
/// Will return `Err` if the digest can not be hex encoded
pub fn sha256_hex(input: impl AsRef<[u8]>) -> Result<String, SignError> {
    write_hex_bytes(sha256_digest(input).as_ref())
}

#[must_use]
pub fn sha256_hmac(key: &[u8], msg: &[u8]) -> hmac::Tag {
    let s_key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&s_key, msg)
}

/// # Errors
///
/// Will return `Err` if writing to the output buffer fails
pub fn write_hex_bytes(bytes: &[u8]) -> Result<String, SignError> {
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut s, "{byte:02x}").map_err(|_| SignError::Crypto)?;
    }
    Ok(s)
}

/// Keep the first four characters, hide the rest
#[must_use]
pub fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    if visible.chars().count() == value.chars().count() {
        return "****".to_string();
    }
    format!("{visible}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_digest() {
        let digest = sha256_digest(b"hello world");
        assert_eq!(
            write_hex_bytes(digest.as_ref()).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha256_hex_empty() {
        assert_eq!(
            sha256_hex("").unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hmac() {
        let key = b"key";
        let msg = b"The quick brown fox jumps over the lazy dog";
        let tag = sha256_hmac(key, msg);
        assert_eq!(
            write_hex_bytes(tag.as_ref()).unwrap(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_write_hex_bytes() {
        let bytes = b"hello world";
        assert_eq!(write_hex_bytes(bytes).unwrap(), "68656c6c6f20776f726c64");
        assert_eq!(write_hex_bytes(&[0x00, 0x0f, 0xff]).unwrap(), "000fff");
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("0123456789abcdef"), "0123****");
        assert_eq!(mask("abcd"), "****");
        assert_eq!(mask("ab"), "****");
        assert_eq!(mask(""), "****");
    }
}
