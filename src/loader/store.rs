//! Object store references consumed by the loader.

use object_store::{ObjectStore, aws::AmazonS3Builder, local::LocalFileSystem, path::Path};
use std::fmt;
use std::sync::Arc;

/// A named handle to an object store.
///
/// The identifier is only used for diagnostics; retrieval goes through `store`.
#[derive(Clone)]
pub struct ObjectStoreRef {
    id: String,
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreRef {
    /// Wrap an existing store implementation under `id`.
    pub fn new(id: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            id: id.into(),
            store,
        }
    }

    /// S3 (or S3-compatible) bucket, with credentials and region resolved from the environment.
    pub fn s3(
        bucket: &str,
        endpoint: Option<&str>,
        allow_http: bool,
    ) -> Result<Self, object_store::Error> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_allow_http(allow_http);
        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        let store = builder.build()?;
        tracing::debug!(bucket, endpoint = ?endpoint, allow_http, "Initialized S3 object store");
        Ok(Self::new(format!("s3://{bucket}"), Arc::new(store)))
    }

    /// Local directory exposed as an object store rooted at `root`.
    pub fn local(root: impl AsRef<std::path::Path>) -> Result<Self, object_store::Error> {
        let root = root.as_ref();
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(format!("file://{}", root.display()), Arc::new(store)))
    }

    /// Identifier used when reporting retrieval failures.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fetch the full object stored under `key`.
    pub(crate) async fn fetch(&self, key: &str) -> Result<Vec<u8>, object_store::Error> {
        let location =
            Path::parse(key).map_err(|source| object_store::Error::InvalidPath { source })?;
        let bytes = self.store.get(&location).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

impl fmt::Debug for ObjectStoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreRef")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ObjectStoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
