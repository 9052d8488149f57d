//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use ufile_client::{UfileClient, UfileConfig, UfileError};

    use crate::{live_client, test_bucket, test_key};

    #[tokio::test]
    #[ignore = "requires UFile credentials"]
    async fn test_should_report_missing_object_on_head() {
        let client = live_client();
        let key = test_key("ghost");

        let (exists, size) = client.head(&test_bucket(), &key).await.expect("head");
        assert!(!exists);
        assert_eq!(size, 0);
    }

    #[tokio::test]
    #[ignore = "requires UFile credentials"]
    async fn test_should_return_not_found_on_get() {
        let client = live_client();
        let key = test_key("nokey");

        let result = client.get(&test_bucket(), &key).await;
        assert!(
            matches!(result, Err(UfileError::NotFound { .. })),
            "get nonexistent key should be NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires UFile credentials"]
    async fn test_should_reject_bad_signature() {
        let config = UfileConfig::from_env();
        let client = UfileClient::new(
            config.public_key.clone(),
            "definitely-not-the-key",
            config.proxy_url.as_deref(),
        )
        .expect("client");

        let result = client.get(&test_bucket(), &test_key("badsig")).await;
        let err = result.expect_err("a forged signature must be rejected");
        assert!(
            matches!(
                err,
                UfileError::Remote { .. } | UfileError::RemoteRaw { .. }
            ),
            "expected a remote error, got {err:?}"
        );
    }
}
