//! UCloud management API client.
//!
//! Management calls are `GET {base_url}{path}?{query}` where the query holds
//! the caller's parameters plus `PublicKey` and `Signature`, sorted by key and
//! form-urlencoded. The answer is a JSON [`BasicResponse`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response};
use serde::Deserialize;
use tracing::debug;
use ufile_auth::{Credentials, sign_api_params};

use crate::client::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{UfileError, UfileResult};
use crate::transport::{HyperTransport, Transport};

/// Query parameter carrying the public key.
const PUBLIC_KEY_PARAM: &str = "PublicKey";

/// Query parameter carrying the signature.
const SIGNATURE_PARAM: &str = "Signature";

/// Common envelope of management API answers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BasicResponse {
    /// `0` on success.
    #[serde(rename = "RetCode")]
    pub ret_code: i64,
    /// Echo of the requested action.
    #[serde(rename = "Action", default)]
    pub action: Option<String>,
    /// Error description on failure.
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl BasicResponse {
    /// Whether the call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.ret_code == 0
    }
}

/// Client for the UCloud management API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    credentials: Arc<Credentials>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://api.ucloud.cn`).
    pub fn new(
        base_url: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self::with_transport(
            base_url,
            Credentials::new(public_key, private_key),
            Arc::new(HyperTransport::new(DEFAULT_REQUEST_TIMEOUT)),
        )
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        base_url: impl Into<String>,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials: Arc::new(credentials),
            transport,
        }
    }

    /// Build the signed, encoded query string for `params`.
    ///
    /// `PublicKey` is added (overriding any caller value) before signing.
    #[must_use]
    pub fn signed_query(&self, params: &BTreeMap<String, String>) -> String {
        let mut params = params.clone();
        params.insert(
            PUBLIC_KEY_PARAM.to_owned(),
            self.credentials.public_key().to_owned(),
        );
        let signature = sign_api_params(&params, self.credentials.private_key());
        params.insert(SIGNATURE_PARAM.to_owned(), signature);

        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish()
    }

    /// Send a signed `GET` to `path` and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::InvalidArgument`] if the URL cannot be built, or a
    /// transport error.
    pub async fn raw_get(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> UfileResult<Response<Bytes>> {
        let uri = format!("{}{path}?{}", self.base_url, self.signed_query(params));

        debug!(
            base_url = %self.base_url,
            path,
            action = params.get("Action").map(String::as_str),
            "sending UCloud API request"
        );

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_str())
            .body(Bytes::new())
            .map_err(|e| UfileError::InvalidArgument(format!("cannot build API request: {e}")))?;

        Ok(self.transport.send(request).await?)
    }

    /// Call the API root with `params` and decode the [`BasicResponse`].
    ///
    /// A non-zero `RetCode` is returned as data, not as an error.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or [`UfileError::Parse`] if the body is not
    /// a JSON envelope.
    pub async fn get(&self, params: &BTreeMap<String, String>) -> UfileResult<BasicResponse> {
        let response = self.raw_get("/", params).await?;
        Ok(serde_json::from_slice(response.body())?)
    }
}
