//! Loader coordinating object retrieval and partitioning.

use crate::{
    loader::{store::ObjectStoreRef, types::LoadError},
    partition::{Document, PartitionConfig, Partitioner, UnstructuredClient},
};
use std::sync::Arc;

/// Fetches objects from a store and hands their bytes to a [`Partitioner`].
///
/// Retrieval always completes before partitioning starts, and each stage fails with its own
/// [`LoadError`] variant. The loader holds no per-call state, so one instance can serve
/// concurrent loads through an `Arc`.
#[derive(Clone)]
pub struct DocumentLoader {
    partitioner: Arc<dyn Partitioner>,
}

impl DocumentLoader {
    /// Build a loader around any partitioner implementation.
    pub fn new(partitioner: Arc<dyn Partitioner>) -> Self {
        Self { partitioner }
    }

    /// Build a loader backed by an [`UnstructuredClient`] with default transport settings.
    pub fn with_unstructured() -> Result<Self, crate::partition::PartitionError> {
        Ok(Self::new(Arc::new(UnstructuredClient::new()?)))
    }

    /// Fetch `key` from `store` and partition its contents.
    ///
    /// The key doubles as the logical file name for partitioning.
    pub async fn load(
        &self,
        store: &ObjectStoreRef,
        key: &str,
        config: &PartitionConfig,
    ) -> Result<Vec<Document>, LoadError> {
        tracing::debug!(store = %store, key, "Fetching object");
        let bytes = store.fetch(key).await.map_err(|source| {
            let error = LoadError::Retrieval {
                key: key.to_string(),
                store: store.id().to_string(),
                source,
            };
            tracing::error!(error = %error, "Object retrieval failed");
            error
        })?;
        tracing::debug!(store = %store, key, size = bytes.len(), "Object fetched");

        let documents = self
            .partitioner
            .partition(bytes, key, config)
            .await
            .map_err(|source| {
                let error = LoadError::Partitioning {
                    file_name: key.to_string(),
                    source,
                };
                tracing::error!(error = %error, "Partitioning stage failed");
                error
            })?;

        tracing::info!(
            store = %store,
            key,
            documents = documents.len(),
            "Document loaded"
        );
        Ok(documents)
    }
}
