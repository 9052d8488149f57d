//! Authentication error types.

/// Errors produced while parsing or verifying an authorization token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` value does not match `UCloud <PublicKey>:<Signature>`.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The token was issued for a different public key.
    #[error("Public key not recognized: {0}")]
    UnknownPublicKey(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
