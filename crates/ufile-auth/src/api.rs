//! UCloud management API signatures.
//!
//! Management API calls are plain `GET` requests whose query string carries a
//! `PublicKey` and a `Signature` parameter:
//!
//! ```text
//! Signature = hex(SHA1(k1 + v1 + k2 + v2 + ... + PrivateKey))
//! ```
//!
//! with the pairs sorted by key (byte order).

use std::collections::BTreeMap;

use sha1::{Digest, Sha1};

/// Compute the management API signature over `params`.
///
/// `params` must already contain `PublicKey`; the sort order comes from the
/// map itself.
#[must_use]
pub fn sign_api_params(params: &BTreeMap<String, String>, private_key: &str) -> String {
    let mut hasher = Sha1::new();
    for (key, value) in params {
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }
    hasher.update(private_key.as_bytes());
    hex::encode(hasher.finalize())
}
