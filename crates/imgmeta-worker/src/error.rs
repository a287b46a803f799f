//! Worker error types
//!
//! Two scopes fail independently: a whole notification entry
//! ([`EnvelopeDecodeError`]) and a single change record
//! ([`RecordProcessingError`]). Tag-level failures stay inside
//! `imgmeta-processing`.

use imgmeta_core::{ErrorMetadata, LogLevel};
use imgmeta_processing::ImageDecodeError;
use imgmeta_storage::StorageError;
use thiserror::Error;

/// A notification entry whose payload could not be turned into change records
#[derive(Debug, Error)]
pub enum EnvelopeDecodeError {
    #[error("notification entry has no transport message: {0}")]
    MissingMessage(#[source] serde_json::Error),

    #[error("notification message is not a valid change payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Failure while processing one change record
#[derive(Debug, Error)]
pub enum RecordProcessingError {
    #[error("malformed change record: {0}")]
    MalformedRecord(String),

    #[error("failed to fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("{bucket}/{key} is not a readable image: {source}")]
    Decode {
        bucket: String,
        key: String,
        #[source]
        source: ImageDecodeError,
    },

    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to store {bucket}/{key}: {source}")]
    Store {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },
}

impl ErrorMetadata for EnvelopeDecodeError {
    fn error_code(&self) -> &'static str {
        match self {
            EnvelopeDecodeError::MissingMessage(_) => "ENVELOPE_MISSING_MESSAGE",
            EnvelopeDecodeError::InvalidPayload(_) => "ENVELOPE_INVALID_PAYLOAD",
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Warn
    }
}

impl ErrorMetadata for RecordProcessingError {
    fn error_code(&self) -> &'static str {
        match self {
            RecordProcessingError::MalformedRecord(_) => "MALFORMED_RECORD",
            RecordProcessingError::Fetch {
                source: StorageError::NotFound(_),
                ..
            } => "OBJECT_NOT_FOUND",
            RecordProcessingError::Fetch { .. } => "FETCH_FAILED",
            RecordProcessingError::Decode { .. } => "IMAGE_DECODE_FAILED",
            RecordProcessingError::Serialize(_) => "SERIALIZE_FAILED",
            RecordProcessingError::Store { .. } => "STORE_FAILED",
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            RecordProcessingError::MalformedRecord(_)
            | RecordProcessingError::Decode { .. }
            | RecordProcessingError::Fetch {
                source: StorageError::NotFound(_),
                ..
            } => LogLevel::Warn,
            RecordProcessingError::Fetch { .. }
            | RecordProcessingError::Serialize(_)
            | RecordProcessingError::Store { .. } => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_object_is_a_warning() {
        let err = RecordProcessingError::Fetch {
            bucket: "photos".to_string(),
            key: "a.jpg".to_string(),
            source: StorageError::NotFound("photos/a.jpg".to_string()),
        };
        assert_eq!(err.error_code(), "OBJECT_NOT_FOUND");
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(err.to_string().contains("photos/a.jpg"));
    }

    #[test]
    fn test_store_failure_is_an_error() {
        let err = RecordProcessingError::Store {
            bucket: "photos".to_string(),
            key: "processed/exif/a.json".to_string(),
            source: StorageError::UploadFailed("access denied".to_string()),
        };
        assert_eq!(err.error_code(), "STORE_FAILED");
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_envelope_error_codes() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = EnvelopeDecodeError::InvalidPayload(json_err);
        assert_eq!(err.error_code(), "ENVELOPE_INVALID_PAYLOAD");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }
}
