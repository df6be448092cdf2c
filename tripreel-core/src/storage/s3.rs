//! S3-backed object store.
//!
//! The AWS SDK is async; this store owns a current-thread tokio runtime and
//! blocks on each request so it can sit behind the synchronous
//! `ObjectStore` trait. Credentials and region come from the standard AWS
//! environment/profile chain.

use super::ObjectStore;
use crate::error::{CoreError, CoreResult};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tokio::runtime::Runtime;

/// Object store backed by an S3 bucket.
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    runtime: Runtime,
}

impl S3ObjectStore {
    /// Connects to `bucket` using the default AWS configuration chain.
    pub fn new(bucket: &str) -> CoreResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CoreError::Storage(format!("Failed to start S3 runtime: {e}")))?;

        let aws_config = runtime
            .block_on(aws_config::defaults(aws_config::BehaviorVersion::latest()).load());
        let client = S3Client::new(&aws_config);

        log::debug!("S3 object store ready for bucket {bucket}");
        Ok(Self {
            client,
            bucket: bucket.to_string(),
            runtime,
        })
    }
}

impl ObjectStore for S3ObjectStore {
    fn upload(&self, local_path: &Path, key: &str) -> CoreResult<String> {
        let body = std::fs::read(local_path)?;
        self.runtime
            .block_on(
                self.client
                    .put_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .body(ByteStream::from(body))
                    .content_type("video/mp4")
                    .send(),
            )
            .map_err(|e| {
                CoreError::Storage(format!("Upload of {key} to {} failed: {e}", self.bucket))
            })?;
        log::info!("Uploaded {} to s3://{}/{key}", local_path.display(), self.bucket);
        Ok(key.to_string())
    }

    fn download(&self, key: &str, local_path: &Path) -> CoreResult<()> {
        let bytes = self.runtime.block_on(async {
            let response = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    let missing = e
                        .as_service_error()
                        .is_some_and(|service| service.is_no_such_key());
                    if missing {
                        CoreError::ObjectNotFound(key.to_string())
                    } else {
                        CoreError::Storage(format!("Download of {key} failed: {e}"))
                    }
                })?;
            response
                .body
                .collect()
                .await
                .map(|data| data.into_bytes())
                .map_err(|e| CoreError::Storage(format!("Reading {key} failed: {e}")))
        })?;

        if let Some(parent) = local_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(local_path, &bytes)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> CoreResult<Vec<String>> {
        collect_pages(|continuation| {
            let response = self
                .runtime
                .block_on(
                    self.client
                        .list_objects_v2()
                        .bucket(&self.bucket)
                        .prefix(prefix)
                        .set_continuation_token(continuation)
                        .send(),
                )
                .map_err(|e| CoreError::Storage(format!("Listing {prefix} failed: {e}")))?;

            let truncated = response.is_truncated.unwrap_or(false);
            let keys = response
                .contents
                .unwrap_or_default()
                .into_iter()
                .filter_map(|object| object.key)
                .collect();
            let next = response
                .next_continuation_token
                .filter(|_| truncated);
            Ok(ListPage { keys, next })
        })
    }
}

/// One page of a prefix listing.
#[derive(Debug, Default)]
struct ListPage {
    keys: Vec<String>,
    /// Continuation token when more pages follow.
    next: Option<String>,
}

/// Follows continuation tokens until the last page and returns the keys sorted.
fn collect_pages<F>(mut fetch: F) -> CoreResult<Vec<String>>
where
    F: FnMut(Option<String>) -> CoreResult<ListPage>,
{
    let mut keys = Vec::new();
    let mut continuation = None;
    loop {
        let page = fetch(continuation.take())?;
        keys.extend(page.keys);
        match page.next {
            Some(token) => continuation = Some(token),
            None => break,
        }
    }
    keys.sort();
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(keys: &[&str], next: Option<&str>) -> ListPage {
        ListPage {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            next: next.map(str::to_string),
        }
    }

    #[test]
    fn test_pages_are_followed_and_sorted() {
        let mut tokens_seen = Vec::new();
        let keys = collect_pages(|token| {
            tokens_seen.push(token.clone());
            Ok(match token.as_deref() {
                None => page(&["uploaded/c.mp4", "uploaded/a.mp4"], Some("t1")),
                Some("t1") => page(&["uploaded/b.mp4"], Some("t2")),
                _ => page(&[], None),
            })
        })
        .unwrap();

        assert_eq!(keys, ["uploaded/a.mp4", "uploaded/b.mp4", "uploaded/c.mp4"]);
        assert_eq!(
            tokens_seen,
            [None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[test]
    fn test_page_error_stops_listing() {
        let mut calls = 0;
        let result = collect_pages(|_| {
            calls += 1;
            if calls == 1 {
                Ok(page(&["uploaded/a.mp4"], Some("t1")))
            } else {
                Err(CoreError::Storage("throttled".into()))
            }
        });

        assert!(matches!(result, Err(CoreError::Storage(_))));
        assert_eq!(calls, 2);
    }
}
