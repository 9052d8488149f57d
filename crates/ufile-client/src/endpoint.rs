//! Host derivation for object requests.
//!
//! Where a request is physically sent and which `Host` it claims are decided
//! here, independently of signing: the signature only covers `/<bucket>/<key>`.
//!
//! | Strategy | Request target | `Host` header |
//! |----------|----------------|---------------|
//! | [`Endpoint::Proxy`] | `{proxy_url}/{key}` | `{bucket}.{base_host}` |
//! | [`Endpoint::BaseHost`] | `http://{bucket}.{host}/{key}` | `{bucket}.{host}` |
//! | [`Endpoint::Regional`] | `http://{bucket}{suffix}/{key}` | `{bucket}{suffix}` |

use http::Uri;
use ufile_auth::HttpVerb;

use crate::error::{UfileError, UfileResult};

/// Domain suffix serving downloads (`HEAD`/`GET`) when no host is configured.
pub const DEFAULT_DOWNLOAD_SUFFIX: &str = ".ufile.ucloud.com.cn";

/// Domain suffix accepting uploads (`PUT`) when no host is configured.
pub const DEFAULT_UPLOAD_SUFFIX: &str = ".ufile.ucloud.cn";

/// Prefix removed from a proxy host to obtain the bucket base host.
const WWW_PREFIX: &str = "www.";

/// Strategy for addressing a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Route every request through a proxy while claiming the bucket host.
    Proxy {
        /// Scheme and authority the requests are sent to.
        proxy_url: String,
        /// Host the bucket name is prefixed onto.
        base_host: String,
    },
    /// Address `{bucket}.{host}` directly for every verb.
    BaseHost(String),
    /// Separate download and upload domains.
    Regional {
        /// Suffix appended to the bucket for `HEAD` and `GET`.
        download_suffix: String,
        /// Suffix appended to the bucket for `PUT`.
        upload_suffix: String,
    },
}

/// Where one request goes and which host it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Absolute request URI.
    pub uri: String,
    /// Value of the `Host` header.
    pub host: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::Regional {
            download_suffix: DEFAULT_DOWNLOAD_SUFFIX.to_owned(),
            upload_suffix: DEFAULT_UPLOAD_SUFFIX.to_owned(),
        }
    }
}

impl Endpoint {
    /// Pick a strategy from an optional base host or proxy URL.
    ///
    /// Values containing `://` are proxy URLs, other non-empty values are base
    /// hosts, and `None` (or an empty value) selects the regional defaults.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::Config`] if a proxy URL cannot be parsed.
    pub fn parse(base_host_or_proxy_url: Option<&str>) -> UfileResult<Self> {
        match base_host_or_proxy_url.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) if value.contains("://") => Self::proxy(value),
            Some(host) => Ok(Self::BaseHost(host.trim_end_matches('/').to_owned())),
        }
    }

    /// Build a proxy strategy, deriving the base host from the URL's host.
    ///
    /// # Errors
    ///
    /// Returns [`UfileError::Config`] if the URL has no scheme or host.
    pub fn proxy(proxy_url: &str) -> UfileResult<Self> {
        let uri: Uri = proxy_url
            .parse()
            .map_err(|e| UfileError::Config(format!("invalid proxy URL {proxy_url:?}: {e}")))?;

        if uri.scheme().is_none() {
            return Err(UfileError::Config(format!(
                "proxy URL {proxy_url:?} has no scheme"
            )));
        }
        let host = uri
            .host()
            .ok_or_else(|| UfileError::Config(format!("proxy URL {proxy_url:?} has no host")))?;

        Ok(Self::Proxy {
            proxy_url: proxy_url.trim_end_matches('/').to_owned(),
            base_host: bucket_base_host(host).to_owned(),
        })
    }

    /// Resolve the target of a `verb` request on `/<bucket>/<key>`.
    #[must_use]
    pub fn target(&self, verb: HttpVerb, bucket: &str, key: &str) -> RequestTarget {
        match self {
            Self::Proxy {
                proxy_url,
                base_host,
            } => RequestTarget {
                uri: format!("{proxy_url}/{key}"),
                host: format!("{bucket}.{base_host}"),
            },
            Self::BaseHost(base_host) => {
                let host = format!("{bucket}.{base_host}");
                RequestTarget {
                    uri: format!("http://{host}/{key}"),
                    host,
                }
            }
            Self::Regional {
                download_suffix,
                upload_suffix,
            } => {
                let suffix = match verb {
                    HttpVerb::Put => upload_suffix,
                    HttpVerb::Head | HttpVerb::Get => download_suffix,
                };
                let host = format!("{bucket}{suffix}");
                RequestTarget {
                    uri: format!("http://{host}/{key}"),
                    host,
                }
            }
        }
    }
}

/// Strip a leading `www.` from a proxy host.
fn bucket_base_host(host: &str) -> &str {
    host.strip_prefix(WWW_PREFIX).unwrap_or(host)
}
