//! Stage-level errors raised by the document loader.

use crate::partition::PartitionError;
use thiserror::Error;

/// Errors emitted while loading a document from object storage.
///
/// The variants separate the two stages of a load: fetching the object and partitioning it.
/// Finer detail from either stage stays reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The object could not be fetched from the store.
    #[error("Failed to retrieve object {key} from store {store}: {source}")]
    Retrieval {
        /// Key requested from the store.
        key: String,
        /// Identifier of the store that was queried.
        store: String,
        /// Underlying store failure.
        #[source]
        source: object_store::Error,
    },
    /// The object was fetched but the partitioning stage failed.
    #[error("Failed to partition file {file_name} during the partitioning stage: {source}")]
    Partitioning {
        /// Key of the object submitted for partitioning.
        file_name: String,
        /// Underlying partition failure.
        #[source]
        source: PartitionError,
    },
}

impl LoadError {
    /// Whether the failure happened while fetching the object.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Retrieval { .. })
    }

    /// Whether the failure happened while partitioning the fetched bytes.
    pub fn is_partitioning(&self) -> bool {
        matches!(self, Self::Partitioning { .. })
    }
}
