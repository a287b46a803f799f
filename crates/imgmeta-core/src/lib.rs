//! imgmeta core library
//!
//! Configuration, error metadata, and the storage backend selector shared by
//! the storage, processing and worker crates.

pub mod config;
pub mod error;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
