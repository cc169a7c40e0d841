use secrecy::{ExposeSecret, SecretString};
use std::fmt;

pub struct Credentials {
    // access key id, travels inside X-Amz-Credential
    key: String,
    // secret access key, only ever used as HMAC input
    secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(access: &str, secret: &SecretString) -> Self {
        Self {
            key: access.to_string(),
            secret: copy_secret(secret),
        }
    }

    /// Get a reference to the access key ID.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.key
    }

    /// Get a reference to the secret access key.
    #[must_use]
    pub const fn secret_access_key(&self) -> &SecretString {
        &self.secret
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().into())
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self::new(&self.key, &self.secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.secret.expose_secret() == other.secret.expose_secret()
    }
}
