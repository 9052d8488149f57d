//! Object upload, download and probe integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::{live_client, test_bucket, test_key};

    #[tokio::test]
    #[ignore = "requires UFile credentials"]
    async fn test_should_put_and_get_object() {
        let client = live_client();
        let bucket = test_bucket();
        let key = test_key("putget");

        let body = b"hello, ufile!";
        client
            .put(&bucket, &key, "text/plain", body.to_vec(), 1)
            .await
            .expect("put");

        let object = client.get_object(&bucket, &key).await.expect("get");
        assert_eq!(object.data, Bytes::from_static(body));
        assert_eq!(object.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    #[ignore = "requires UFile credentials"]
    async fn test_should_head_object() {
        let client = live_client();
        let bucket = test_bucket();
        let key = test_key("head");

        client
            .put(&bucket, &key, "application/octet-stream", vec![7u8; 2048], 1)
            .await
            .expect("put");

        let head = client.head_with_etag(&bucket, &key).await.expect("head");
        assert!(head.exists);
        assert_eq!(head.size, 2048);
        assert!(head.etag.is_some(), "etag should be reported");
    }

    #[tokio::test]
    #[ignore = "requires UFile credentials"]
    async fn test_should_overwrite_object() {
        let client = live_client();
        let bucket = test_bucket();
        let key = test_key("overwrite");

        client
            .put(&bucket, &key, "text/plain", "first", 1)
            .await
            .expect("first put");
        client
            .put(&bucket, &key, "text/plain", "second", 1)
            .await
            .expect("second put");

        let data = client.get(&bucket, &key).await.expect("get");
        assert_eq!(data, Bytes::from_static(b"second"));
    }
}
