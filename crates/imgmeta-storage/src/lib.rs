//! imgmeta Storage Library
//!
//! This crate provides the blob store abstraction used by the worker: the
//! `Storage` trait and implementations for S3 (and S3-compatible providers)
//! and the local filesystem.
//!
//! # Addressing
//!
//! Every operation names both the bucket and the key. A notification may
//! reference any bucket, so backends are not bound to a single bucket.
//! Keys must not contain `..` or a leading `/`.
//!
//! # Sidecar keys
//!
//! Metadata sidecars live at `processed/exif/{stem}.json`, where `stem` is the
//! source key without its directory prefix and final extension. See [`keys`].

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgmeta_core::StorageBackend;
pub use keys::{sidecar_key, SIDECAR_CONTENT_TYPE, SIDECAR_PREFIX};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
