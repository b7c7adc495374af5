#![deny(missing_docs)]

//! Core library for fetching documents from object storage and partitioning them into
//! normalized text records through the Unstructured partition API.

/// Environment-driven configuration management.
pub mod config;
/// Object retrieval and partitioning orchestration.
pub mod loader;
/// Structured logging and tracing setup.
pub mod logging;
/// Unstructured partition API client.
pub mod partition;
