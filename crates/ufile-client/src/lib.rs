//! Client for the UFile object storage API.
//!
//! This crate sends signed `HEAD`, `GET` and `PUT` requests for objects in
//! UFile buckets and normalizes the answers: object bytes on success, a JSON
//! error envelope or an opaque body on failure, and header-only answers for
//! existence checks. Signing lives in `ufile-auth`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ufile_client::UfileClient;
//!
//! # async fn demo() -> ufile_client::UfileResult<()> {
//! let client = UfileClient::new("public-key", "private-key", Some("http://www.proxy.example"))?;
//!
//! client.put("photos", "cat.jpg", "image/jpeg", b"...".to_vec(), 1).await?;
//! let (exists, size) = client.head("photos", "cat.jpg").await?;
//! let bytes = client.get("photos", "cat.jpg").await?;
//! # let _ = (exists, size, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`api`] - UCloud management API client
//! - [`client`] - Object operations and retry handling
//! - [`config`] - Environment-driven configuration
//! - [`endpoint`] - Host derivation strategies
//! - [`error`] - Error types
//! - [`response`] - Response normalization
//! - [`transport`] - HTTP transport seam and the pooled hyper implementation

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod response;
mod retry;
pub mod transport;

pub use api::{ApiClient, BasicResponse};
pub use client::{ObjectContent, ObjectHead, UfileClient};
pub use config::UfileConfig;
pub use endpoint::{Endpoint, RequestTarget};
pub use error::{TransportError, UfileError, UfileResult};
pub use response::{ErrorEnvelope, NormalizedResponse, ResponsePayload};
pub use retry::DEFAULT_PUT_BACKOFF;
pub use transport::{HyperTransport, Transport};
pub use ufile_auth::{Credentials, HttpVerb};
