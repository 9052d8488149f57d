//! HTTP transport used by the clients.
//!
//! [`Transport`] is the seam between request assembly and the network. The
//! production implementation, [`HyperTransport`], wraps a pooled hyper client;
//! tests substitute an in-process double.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::TransportError;

/// Connect timeout for new sockets.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP keepalive interval for pooled sockets.
const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

/// How long an idle pooled connection is kept.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Upper bound on idle connections kept per host.
const POOL_MAX_IDLE_PER_HOST: usize = 100;

/// Sends one fully buffered request and returns the fully buffered response.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single HTTP exchange.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained. HTTP
    /// error statuses are not errors at this layer.
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;
}

/// Pooled HTTP/1.1 transport built on hyper.
///
/// Clone is cheap; clones share the connection pool. A `Host` header already
/// present on the request is sent as-is, which is how proxied requests keep
/// the bucket-qualified host.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient<HttpConnector, Full<Bytes>>,
    timeout: Duration,
}

impl HyperTransport {
    /// Create a transport whose exchanges are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let mut http = HttpConnector::new();
        http.set_nodelay(true);
        http.set_connect_timeout(Some(CONNECT_TIMEOUT));
        http.set_keepalive(Some(TCP_KEEPALIVE));

        let client = HyperClient::builder(TokioExecutor::new())
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .set_host(true)
            .build(http);

        Self { client, timeout }
    }

    /// The per-exchange timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let exchange = async {
            let response = self.client.request(request.map(Full::new)).await?;
            let (parts, body) = response.into_parts();
            let body = body.collect().await?.to_bytes();
            Ok::<_, TransportError>(Response::from_parts(parts, body))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}
