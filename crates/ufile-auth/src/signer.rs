//! UFile request signatures.
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! UCloud <PublicKey>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(PrivateKey, StringToSign))` and:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                CanonicalizedUCloudHeaders +
//!                CanonicalizedResource
//! ```
//!
//! `CanonicalizedUCloudHeaders` is not followed by its own newline: when it is
//! non-empty the remote API expects it to end with `\n` already.
//! `CanonicalizedResource` is `/<bucket>/<key>` with neither segment escaped.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Scheme tag that prefixes every authorization token.
pub const TOKEN_SCHEME: &str = "UCloud";

/// The object operations the protocol signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    /// Existence and size probe.
    Head,
    /// Object download.
    Get,
    /// Object upload.
    Put,
}

impl HttpVerb {
    /// The verb as it appears on the wire and in the string to sign.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every field that feeds the string to sign.
///
/// Built once per request and never mutated afterwards; the `with_*` methods
/// consume and return the value so a parameter is complete before it is
/// signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignParam {
    verb: HttpVerb,
    content_md5: Option<String>,
    content_type: Option<String>,
    date: Option<String>,
    canonicalized_headers: String,
    canonicalized_resource: String,
}

impl SignParam {
    /// Start a parameter set for `verb` on `/<bucket>/<key>`.
    #[must_use]
    pub fn new(verb: HttpVerb, bucket: &str, key: &str) -> Self {
        Self {
            verb,
            content_md5: None,
            content_type: None,
            date: None,
            canonicalized_headers: String::new(),
            canonicalized_resource: canonicalized_resource(bucket, key),
        }
    }

    /// Set the `Content-MD5` field.
    #[must_use]
    pub fn with_content_md5(mut self, content_md5: impl Into<String>) -> Self {
        self.content_md5 = Some(content_md5.into());
        self
    }

    /// Set the `Content-Type` field.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the `Date` field.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the canonicalized UCloud headers block, used verbatim.
    #[must_use]
    pub fn with_canonicalized_headers(mut self, headers: impl Into<String>) -> Self {
        self.canonicalized_headers = headers.into();
        self
    }

    /// The signed verb.
    #[must_use]
    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    /// The signed content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The `/<bucket>/<key>` resource.
    #[must_use]
    pub fn canonicalized_resource(&self) -> &str {
        &self.canonicalized_resource
    }

    /// Build the string to sign.
    #[must_use]
    pub fn string_to_sign(&self) -> String {
        let verb = self.verb.as_str();
        let content_md5 = self.content_md5.as_deref().unwrap_or("");
        let content_type = self.content_type.as_deref().unwrap_or("");
        let date = self.date.as_deref().unwrap_or("");
        let headers = &self.canonicalized_headers;
        let resource = &self.canonicalized_resource;

        format!("{verb}\n{content_md5}\n{content_type}\n{date}\n{headers}{resource}")
    }
}

/// Value of the `Authorization` header for a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationToken(String);

impl AuthorizationToken {
    /// The full header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the header value.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthorizationToken").field(&self.0).finish()
    }
}

/// Build `/<bucket>/<key>` without escaping either segment.
#[must_use]
pub fn canonicalized_resource(bucket: &str, key: &str) -> String {
    format!("/{bucket}/{key}")
}

/// Sign `param` with `credentials`, producing the `Authorization` value.
#[must_use]
pub fn sign(param: &SignParam, credentials: &Credentials) -> AuthorizationToken {
    let string_to_sign = param.string_to_sign();

    debug!(string_to_sign = ?string_to_sign, "Built UFile string to sign");

    let signature = compute_signature(credentials.private_key(), &string_to_sign);
    AuthorizationToken(format!(
        "{TOKEN_SCHEME} {}:{signature}",
        credentials.public_key()
    ))
}

/// Parse an `Authorization` value: `UCloud PublicKey:Signature`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the scheme is wrong, the
/// separator is missing, or either half is empty.
pub fn parse_token(header: &str) -> Result<(String, String), AuthError> {
    let rest = header
        .strip_prefix(TOKEN_SCHEME)
        .and_then(|r| r.strip_prefix(' '))
        .ok_or(AuthError::InvalidAuthHeader)?;

    let (public_key, signature) = rest.split_once(':').ok_or(AuthError::InvalidAuthHeader)?;

    if public_key.is_empty() || signature.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok((public_key.to_owned(), signature.to_owned()))
}

/// Check that `header` is the token `credentials` would produce for `param`.
///
/// # Errors
///
/// Returns an [`AuthError`] if the header is malformed, names another public
/// key, or carries a different signature.
pub fn verify_token(
    header: &str,
    param: &SignParam,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    let (public_key, provided_signature) = parse_token(header)?;

    if public_key != credentials.public_key() {
        return Err(AuthError::UnknownPublicKey(public_key));
    }

    let expected_signature =
        compute_signature(credentials.private_key(), &param.string_to_sign());

    if provided_signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        Ok(())
    } else {
        debug!(
            expected = %expected_signature,
            provided = %provided_signature,
            "UFile signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Compute `Base64(HMAC-SHA1(private_key, string_to_sign))`.
fn compute_signature(private_key: &str, string_to_sign: &str) -> String {
    let mut mac = <HmacSha1 as KeyInit>::new_from_slice(private_key.as_bytes())
        .expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    let result = mac.finalize().into_bytes();
    BASE64.encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials::new("public", "private")
    }

    #[test]
    fn test_should_build_string_to_sign_with_empty_slots() {
        let param = SignParam::new(HttpVerb::Get, "photos", "cat.jpg");
        assert_eq!(param.string_to_sign(), "GET\n\n\n\n/photos/cat.jpg");
    }

    #[test]
    fn test_should_place_fields_in_fixed_order() {
        let param = SignParam::new(HttpVerb::Put, "b", "k")
            .with_content_md5("md5")
            .with_content_type("image/jpeg")
            .with_date("Thu, 01 Jan 2026 00:00:00 GMT")
            .with_canonicalized_headers("x-ucloud-a:1\n");
        assert_eq!(
            param.string_to_sign(),
            "PUT\nmd5\nimage/jpeg\nThu, 01 Jan 2026 00:00:00 GMT\nx-ucloud-a:1\n/b/k"
        );
    }

    #[test]
    fn test_should_not_escape_resource_segments() {
        let param = SignParam::new(HttpVerb::Head, "my bucket", "a/b c?.txt");
        assert_eq!(param.canonicalized_resource(), "/my bucket/a/b c?.txt");
    }

    #[test]
    fn test_should_sign_known_vector() {
        let token = sign(
            &SignParam::new(HttpVerb::Get, "photos", "cat.jpg"),
            &test_credentials(),
        );
        assert_eq!(token.as_str(), "UCloud public:vtP+50TNcNPAHw6GjovfjdJN3C8=");

        let token = sign(
            &SignParam::new(HttpVerb::Put, "photos", "cat.jpg").with_content_type("image/jpeg"),
            &test_credentials(),
        );
        assert_eq!(token.as_str(), "UCloud public:SuPNfululIi2YINFWma+7LV8LXE=");
    }

    #[test]
    fn test_should_sign_deterministically() {
        let param = SignParam::new(HttpVerb::Head, "bucket", "key");
        let a = sign(&param, &test_credentials());
        let b = sign(&param.clone(), &test_credentials());
        assert_eq!(a, b);
    }

    #[test]
    fn test_should_change_signature_when_date_changes() {
        let base = SignParam::new(HttpVerb::Get, "bucket", "key");
        let dated = base.clone().with_date("Fri, 02 Jan 2026 00:00:00 GMT");
        assert_ne!(
            sign(&base, &test_credentials()),
            sign(&dated, &test_credentials())
        );
    }

    #[test]
    fn test_should_change_signature_when_headers_change() {
        let base = SignParam::new(HttpVerb::Get, "bucket", "key");
        let with_headers = base.clone().with_canonicalized_headers("x-ucloud-meta:1\n");
        assert_ne!(
            sign(&base, &test_credentials()),
            sign(&with_headers, &test_credentials())
        );
    }

    #[test]
    fn test_should_parse_token() {
        let (public_key, signature) = parse_token("UCloud mykey:mysignature").unwrap();
        assert_eq!(public_key, "mykey");
        assert_eq!(signature, "mysignature");
    }

    #[test]
    fn test_should_reject_invalid_token() {
        assert!(parse_token("UCloud :sig").is_err());
        assert!(parse_token("UCloud key:").is_err());
        assert!(parse_token("UCloud noseparator").is_err());
        assert!(parse_token("AWS key:sig").is_err());
        assert!(parse_token("UCloudkey:sig").is_err());
    }

    #[test]
    fn test_should_verify_token_roundtrip() {
        let param = SignParam::new(HttpVerb::Put, "bucket", "key").with_content_type("text/plain");
        let token = sign(&param, &test_credentials());
        assert!(verify_token(token.as_str(), &param, &test_credentials()).is_ok());
    }

    #[test]
    fn test_should_reject_token_for_other_resource() {
        let param = SignParam::new(HttpVerb::Get, "bucket", "key");
        let token = sign(&param, &test_credentials());
        let other = SignParam::new(HttpVerb::Get, "bucket", "other");
        assert!(matches!(
            verify_token(token.as_str(), &other, &test_credentials()),
            Err(AuthError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_should_reject_token_for_unknown_public_key() {
        let param = SignParam::new(HttpVerb::Get, "bucket", "key");
        let token = sign(&param, &Credentials::new("someone-else", "private"));
        assert!(matches!(
            verify_token(token.as_str(), &param, &test_credentials()),
            Err(AuthError::UnknownPublicKey(_))
        ));
    }
}
