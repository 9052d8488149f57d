//! Integration tests against a live UFile endpoint.
//!
//! Credentials and the endpoint come from the `UFILE_*` environment variables
//! read by [`UfileConfig::from_env`]; the bucket from `UFILE_TEST_BUCKET`.
//! The tests are marked `#[ignore]` so they don't run during normal
//! `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p ufile-integration -- --ignored
//! ```

use std::sync::Once;

use ufile_client::{UfileClient, UfileConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Bucket the tests write into.
#[must_use]
pub fn test_bucket() -> String {
    std::env::var("UFILE_TEST_BUCKET").unwrap_or_else(|_| "ufile-integration".to_owned())
}

/// Create a client from the environment.
#[must_use]
pub fn live_client() -> UfileClient {
    init_tracing();

    let config = UfileConfig::from_env();
    UfileClient::from_config(&config)
        .unwrap_or_else(|e| panic!("failed to create client from {config:?}: {e}"))
}

/// Generate a unique object key for a test.
#[must_use]
pub fn test_key(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

mod test_error;
mod test_object;
