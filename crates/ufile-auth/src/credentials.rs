//! UFile key pair.

use std::fmt;

/// Public/private key pair used to sign every request.
///
/// The private key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    public_key: String,
    private_key: String,
}

impl Credentials {
    /// Create a key pair.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// The public key, sent in clear inside the authorization token.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The private key used as the HMAC secret.
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Whether either half of the key pair is empty.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.public_key.is_empty() || self.private_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
