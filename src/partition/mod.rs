//! Unstructured partition API client: multipart request construction, response validation,
//! and element normalization.

pub mod client;
mod form;
mod mappers;
pub mod types;

pub use client::{API_KEY_HEADER, Partitioner, UnstructuredClient};
pub use mappers::CATEGORY_KEY;
pub use types::{DEFAULT_PARTITION_URL, Document, PartitionConfig, PartitionError, Strategy};
