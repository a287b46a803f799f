//! Sidecar key derivation.
//!
//! Key format: `processed/exif/{stem}.json`, written to the bucket of the
//! source object. Directory prefix and extension of the source key are dropped,
//! so `photos/a.jpg` and `scans/a.png` map to the same sidecar.

use std::path::Path;

use crate::traits::{StorageError, StorageResult};

/// Prefix under which sidecars are written.
pub const SIDECAR_PREFIX: &str = "processed/exif";

/// Content type of the stored sidecar documents.
pub const SIDECAR_CONTENT_TYPE: &str = "application/json";

/// Derive the sidecar key for a source object key.
pub fn sidecar_key(object_key: &str) -> StorageResult<String> {
    let stem = Path::new(object_key)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            StorageError::InvalidKey(format!("no file name in object key '{}'", object_key))
        })?;

    Ok(format!("{}/{}.json", SIDECAR_PREFIX, stem))
}
