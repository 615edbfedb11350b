//! S3-compatible object store access for the image services.

pub mod config;
pub mod store;

pub use config::ObjectStoreConfig;
pub use store::{ObjectStore, ObjectStoreError, StoredObject};
