//! Client configuration.
//!
//! Provides [`UfileConfig`] for constructing a [`UfileClient`](crate::UfileClient).
//! Values can be set with the typed builder or loaded from environment
//! variables.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// UFile client configuration.
///
/// # Examples
///
/// ```
/// use ufile_client::config::UfileConfig;
///
/// let config = UfileConfig::builder()
///     .public_key("pub".into())
///     .private_key("secret".into())
///     .build();
/// assert_eq!(config.request_timeout_secs, 60);
/// assert!(config.proxy_url.is_none());
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct UfileConfig {
    /// Public key, sent in every authorization token.
    pub public_key: String,

    /// Private key used to sign requests. Never serialized.
    #[serde(skip_serializing, default)]
    pub private_key: String,

    /// Base host (`cn-bj.ufileos.com`) or proxy URL (`http://proxy:8080`).
    /// When unset the regional upload/download domains are used.
    #[builder(default)]
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Upper bound for one HTTP exchange, in seconds.
    #[builder(default = 60)]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause between two upload attempts, in milliseconds.
    #[builder(default = 1000)]
    #[serde(default = "default_put_backoff_millis")]
    pub put_backoff_millis: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_put_backoff_millis() -> u64 {
    1000
}

impl Default for UfileConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            private_key: String::new(),
            proxy_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            put_backoff_millis: default_put_backoff_millis(),
        }
    }
}

impl fmt::Debug for UfileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UfileConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("proxy_url", &self.proxy_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("put_backoff_millis", &self.put_backoff_millis)
            .finish()
    }
}

impl UfileConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `UFILE_PUBLIC_KEY` | *(empty)* |
    /// | `UFILE_PRIVATE_KEY` | *(empty)* |
    /// | `UFILE_PROXY_URL` | *(unset)* |
    /// | `UFILE_REQUEST_TIMEOUT_SECS` | `60` |
    /// | `UFILE_PUT_BACKOFF_MILLIS` | `1000` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable numbers keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("UFILE_PUBLIC_KEY") {
            config.public_key = v;
        }
        if let Some(v) = lookup("UFILE_PRIVATE_KEY") {
            config.private_key = v;
        }
        if let Some(v) = lookup("UFILE_PROXY_URL") {
            if !v.trim().is_empty() {
                config.proxy_url = Some(v);
            }
        }
        if let Some(v) = lookup("UFILE_REQUEST_TIMEOUT_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                config.request_timeout_secs = n;
            }
        }
        if let Some(v) = lookup("UFILE_PUT_BACKOFF_MILLIS") {
            if let Ok(n) = v.parse::<u64>() {
                config.put_backoff_millis = n;
            }
        }

        config
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The upload backoff as a [`Duration`].
    #[must_use]
    pub fn put_backoff(&self) -> Duration {
        Duration::from_millis(self.put_backoff_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = UfileConfig::default();
        assert!(config.public_key.is_empty());
        assert!(config.proxy_url.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.put_backoff(), Duration::from_secs(1));
    }

    #[test]
    fn test_should_load_from_lookup() {
        let config = UfileConfig::from_lookup(lookup_from(&[
            ("UFILE_PUBLIC_KEY", "pub"),
            ("UFILE_PRIVATE_KEY", "secret"),
            ("UFILE_PROXY_URL", "http://proxy.internal:8080"),
            ("UFILE_REQUEST_TIMEOUT_SECS", "15"),
            ("UFILE_PUT_BACKOFF_MILLIS", "250"),
        ]));
        assert_eq!(config.public_key, "pub");
        assert_eq!(config.private_key, "secret");
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy.internal:8080"));
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.put_backoff_millis, 250);
    }

    #[test]
    fn test_should_keep_defaults_for_bad_numbers() {
        let config = UfileConfig::from_lookup(lookup_from(&[
            ("UFILE_REQUEST_TIMEOUT_SECS", "soon"),
            ("UFILE_PUT_BACKOFF_MILLIS", "-1"),
            ("UFILE_PROXY_URL", ""),
        ]));
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.put_backoff_millis, 1000);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = UfileConfig::builder()
            .public_key("pub".into())
            .private_key("secret".into())
            .proxy_url(Some("cn-bj.ufileos.com".into()))
            .request_timeout_secs(5)
            .put_backoff_millis(10)
            .build();

        assert_eq!(config.proxy_url.as_deref(), Some("cn-bj.ufileos.com"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.put_backoff(), Duration::from_millis(10));
    }

    #[test]
    fn test_should_never_expose_private_key() {
        let config = UfileConfig::builder()
            .public_key("pub".into())
            .private_key("very-secret".into())
            .build();

        let json = serde_json::to_string(&config).expect("test serialization");
        assert!(json.contains("publicKey"));
        assert!(!json.contains("very-secret"));
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
