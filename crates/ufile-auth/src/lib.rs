//! UFile request signing.
//!
//! Every UFile object request carries an `Authorization` header of the form
//!
//! ```text
//! UCloud <PublicKey>:<Signature>
//! ```
//!
//! where `Signature = Base64(HMAC-SHA1(PrivateKey, StringToSign))`. This crate
//! builds the string to sign from a [`SignParam`], produces the token, and can
//! verify a token against the same inputs. It also implements the query
//! parameter signature used by the UCloud management API.
//!
//! # Usage
//!
//! ```rust
//! use ufile_auth::{Credentials, HttpVerb, SignParam, sign};
//!
//! let credentials = Credentials::new("public", "private");
//! let param = SignParam::new(HttpVerb::Get, "photos", "cat.jpg");
//! let token = sign(&param, &credentials);
//! assert!(token.as_str().starts_with("UCloud public:"));
//! ```
//!
//! # Modules
//!
//! - [`api`] - Management API query parameter signatures (SHA-1, hex)
//! - [`credentials`] - Public/private key pair
//! - [`error`] - Authentication error types
//! - [`signer`] - String-to-sign construction and token signing

pub mod api;
pub mod credentials;
pub mod error;
pub mod signer;

pub use api::sign_api_params;
pub use credentials::Credentials;
pub use error::AuthError;
pub use signer::{
    AuthorizationToken, HttpVerb, SignParam, TOKEN_SCHEME, parse_token, sign, verify_token,
};
