//! UFile object client.
//!
//! [`UfileClient`] signs and sends `HEAD`, `GET` and `PUT` requests and maps
//! the normalized responses onto typed results. Only uploads are retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST, HeaderValue};
use http::{Method, Request, StatusCode};
use tracing::debug;
use ufile_auth::{Credentials, HttpVerb, SignParam, sign};

use crate::config::UfileConfig;
use crate::endpoint::Endpoint;
use crate::error::{UfileError, UfileResult};
use crate::response::{NormalizedResponse, normalize};
use crate::retry::{DEFAULT_PUT_BACKOFF, retry_with_backoff};
use crate::transport::{HyperTransport, Transport};

/// Default upper bound for one HTTP exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a `HEAD` probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHead {
    /// Whether the object exists.
    pub exists: bool,
    /// Object size in bytes; `0` when missing.
    pub size: u64,
    /// Remote ETag, when reported.
    pub etag: Option<String>,
}

impl ObjectHead {
    fn missing() -> Self {
        Self {
            exists: false,
            size: 0,
            etag: None,
        }
    }
}

/// Result of a `GET` download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectContent {
    /// Object bytes.
    pub data: Bytes,
    /// Content type the object was stored with, when reported.
    pub content_type: Option<String>,
    /// Remote ETag, when reported.
    pub etag: Option<String>,
}

/// Body and content type of an upload.
struct Upload {
    content_type: String,
    data: Bytes,
}

/// Client for the UFile object API.
///
/// Clone is cheap: clones share the credentials and the pooled transport, so
/// one instance can serve concurrent callers.
#[derive(Clone)]
pub struct UfileClient {
    credentials: Arc<Credentials>,
    endpoint: Arc<Endpoint>,
    transport: Arc<dyn Transport>,
    put_backoff: Duration,
}

impl fmt::Debug for UfileClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UfileClient")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .field("put_backoff", &self.put_backoff)
            .finish_non_exhaustive()
    }
}

impl UfileClient {
    /// Create a client over the pooled hyper transport.
    ///
    /// `base_host_or_proxy_url` selects the [`Endpoint`]: a proxy URL, a base
    /// host, or `None` for the regional upload/download domains.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::Config`] if a key is empty or the proxy URL is
    /// malformed.
    pub fn new(
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        base_host_or_proxy_url: Option<&str>,
    ) -> UfileResult<Self> {
        Self::connect(
            Credentials::new(public_key, private_key),
            base_host_or_proxy_url,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }

    /// Create a client from a [`UfileConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`UfileClient::new`].
    pub fn from_config(config: &UfileConfig) -> UfileResult<Self> {
        let client = Self::connect(
            Credentials::new(config.public_key.clone(), config.private_key.clone()),
            config.proxy_url.as_deref(),
            config.request_timeout(),
        )?;
        Ok(client.with_put_backoff(config.put_backoff()))
    }

    fn connect(
        credentials: Credentials,
        base_host_or_proxy_url: Option<&str>,
        timeout: Duration,
    ) -> UfileResult<Self> {
        if credentials.is_incomplete() {
            return Err(UfileError::Config(
                "public and private keys must both be set".to_owned(),
            ));
        }
        let endpoint = Endpoint::parse(base_host_or_proxy_url)?;
        let transport = Arc::new(HyperTransport::new(timeout));
        Ok(Self::with_transport(credentials, endpoint, transport))
    }

    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(
        credentials: Credentials,
        endpoint: Endpoint,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            endpoint: Arc::new(endpoint),
            transport,
            put_backoff: DEFAULT_PUT_BACKOFF,
        }
    }

    /// Override the pause between upload attempts.
    #[must_use]
    pub fn with_put_backoff(mut self, backoff: Duration) -> Self {
        self.put_backoff = backoff;
        self
    }

    /// The host strategy in use.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Check whether `key` exists in `bucket`, returning `(exists, size)`.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::Remote`]/[`UfileError::RemoteRaw`] for any status
    /// other than `200` or `404`, or a transport error. Never retried.
    pub async fn head(&self, bucket: &str, key: &str) -> UfileResult<(bool, u64)> {
        let head = self.head_with_etag(bucket, key).await?;
        Ok((head.exists, head.size))
    }

    /// Like [`UfileClient::head`], also returning the remote ETag.
    ///
    /// # Errors
    ///
    /// Same as [`UfileClient::head`].
    pub async fn head_with_etag(&self, bucket: &str, key: &str) -> UfileResult<ObjectHead> {
        let response = self.execute(HttpVerb::Head, bucket, key, None).await?;
        match response.status {
            StatusCode::OK => Ok(ObjectHead {
                exists: true,
                size: response.content_length.unwrap_or(0),
                etag: response.etag,
            }),
            StatusCode::NOT_FOUND => Ok(ObjectHead::missing()),
            _ => Err(response.into_remote_error()),
        }
    }

    /// Download `key` from `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::NotFound`] on `404`, a remote error for any other
    /// non-`200` status, or a transport error. Never retried.
    pub async fn get(&self, bucket: &str, key: &str) -> UfileResult<Bytes> {
        Ok(self.get_object(bucket, key).await?.data)
    }

    /// Like [`UfileClient::get`], also returning the content type and ETag.
    ///
    /// # Errors
    ///
    /// Same as [`UfileClient::get`].
    pub async fn get_object(&self, bucket: &str, key: &str) -> UfileResult<ObjectContent> {
        let response = self.execute(HttpVerb::Get, bucket, key, None).await?;
        match response.status {
            StatusCode::OK => {
                let content_type = response.content_type.clone();
                let etag = response.etag.clone();
                Ok(ObjectContent {
                    data: response.into_content(),
                    content_type,
                    etag,
                })
            }
            StatusCode::NOT_FOUND => Err(UfileError::NotFound {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            }),
            _ => Err(response.into_remote_error()),
        }
    }

    /// Upload `data` as `key` in `bucket`.
    ///
    /// A non-`200` answer or a transport failure is retried up to
    /// `max_retries` times, each retry preceded by the fixed backoff.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::InvalidArgument`] before sending anything if the
    /// bucket, key, or content type is unusable. Otherwise returns the error of
    /// the last attempt once the retry budget is spent.
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        data: impl Into<Bytes>,
        max_retries: u32,
    ) -> UfileResult<()> {
        validate_object(bucket, key)?;
        if HeaderValue::from_str(content_type).is_err() {
            return Err(UfileError::InvalidArgument(format!(
                "invalid content type {content_type:?}"
            )));
        }
        let upload = Upload {
            content_type: content_type.to_owned(),
            data: data.into(),
        };
        let upload = &upload;

        retry_with_backoff("put", max_retries, self.put_backoff, || async move {
            let response = self.execute(HttpVerb::Put, bucket, key, Some(upload)).await?;
            if response.is_success() {
                Ok(())
            } else {
                Err(response.into_remote_error())
            }
        })
        .await
    }

    /// Sign, send, and normalize one request.
    async fn execute(
        &self,
        verb: HttpVerb,
        bucket: &str,
        key: &str,
        upload: Option<&Upload>,
    ) -> UfileResult<NormalizedResponse> {
        let request = self.build_request(verb, bucket, key, upload)?;

        debug!(
            verb = %verb,
            bucket,
            key,
            uri = %request.uri(),
            "sending UFile request"
        );

        let response = self.transport.send(request).await?;

        debug!(verb = %verb, bucket, key, status = %response.status(), "received UFile response");

        normalize(verb, response)
    }

    /// Assemble the signed request for `verb` on `/<bucket>/<key>`.
    fn build_request(
        &self,
        verb: HttpVerb,
        bucket: &str,
        key: &str,
        upload: Option<&Upload>,
    ) -> UfileResult<Request<Bytes>> {
        validate_object(bucket, key)?;

        let target = self.endpoint.target(verb, bucket, key);
        let mut param = SignParam::new(verb, bucket, key);
        let mut builder = Request::builder()
            .method(method(verb))
            .uri(target.uri.as_str())
            .header(HOST, target.host.as_str());

        let body = match upload {
            Some(upload) => {
                param = param.with_content_type(upload.content_type.as_str());
                builder = builder.header(CONTENT_TYPE, upload.content_type.as_str());
                upload.data.clone()
            }
            None => Bytes::new(),
        };

        let token = sign(&param, &self.credentials);

        builder
            .header(AUTHORIZATION, token.as_str())
            .body(body)
            .map_err(|e| {
                UfileError::InvalidArgument(format!(
                    "cannot build {verb} request for {}: {e}",
                    target.uri
                ))
            })
    }
}

/// Map a signed verb onto its HTTP method.
fn method(verb: HttpVerb) -> Method {
    match verb {
        HttpVerb::Head => Method::HEAD,
        HttpVerb::Get => Method::GET,
        HttpVerb::Put => Method::PUT,
    }
}

/// Reject empty bucket names and keys before anything is signed.
fn validate_object(bucket: &str, key: &str) -> UfileResult<()> {
    if bucket.is_empty() {
        return Err(UfileError::InvalidArgument(
            "bucket name must not be empty".to_owned(),
        ));
    }
    if key.is_empty() {
        return Err(UfileError::InvalidArgument(
            "object key must not be empty".to_owned(),
        ));
    }
    Ok(())
}
