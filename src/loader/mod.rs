//! Document loading: object retrieval followed by partitioning.

mod service;
pub mod store;
pub mod types;

pub use service::DocumentLoader;
pub use store::ObjectStoreRef;
pub use types::LoadError;
