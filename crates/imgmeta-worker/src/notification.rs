//! Notification envelope and change records
//!
//! Invocation input is a pub/sub envelope whose entries carry a JSON-encoded
//! storage notification:
//!
//! ```json
//! { "Records": [ { "Sns": { "Message": "{\"Records\":[{\"s3\":{...}}]}" } } ] }
//! ```
//!
//! Entries and records are kept as raw JSON until they are decoded so that one
//! malformed item fails alone.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EnvelopeDecodeError, RecordProcessingError};

/// Outer invocation envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<Value>,
}

impl NotificationEnvelope {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Deserialize)]
struct NotificationEntry {
    #[serde(rename = "Sns")]
    sns: TransportMessage,
}

#[derive(Debug, Deserialize)]
struct TransportMessage {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChangePayload {
    #[serde(rename = "Records", default)]
    records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct S3EventRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

/// Decode one envelope entry into its raw change records.
pub fn decode_entry(entry: &Value) -> Result<Vec<Value>, EnvelopeDecodeError> {
    let entry =
        NotificationEntry::deserialize(entry).map_err(EnvelopeDecodeError::MissingMessage)?;
    let payload: ChangePayload = serde_json::from_str(&entry.sns.message)
        .map_err(EnvelopeDecodeError::InvalidPayload)?;
    Ok(payload.records)
}

/// One object-change event: which object in which bucket was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub bucket: String,
    pub object_key: String,
}

impl ChangeRecord {
    /// Extract bucket and object key from a raw change record.
    ///
    /// Object keys arrive form-encoded (`+` for spaces, `%XX` escapes) and are
    /// decoded here.
    pub fn from_value(value: &Value) -> Result<Self, RecordProcessingError> {
        let event = S3EventRecord::deserialize(value)
            .map_err(|e| RecordProcessingError::MalformedRecord(e.to_string()))?;

        let object_key = decode_object_key(&event.s3.object.key)?;

        Ok(ChangeRecord {
            bucket: event.s3.bucket.name,
            object_key,
        })
    }
}

fn decode_object_key(raw: &str) -> Result<String, RecordProcessingError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| {
            RecordProcessingError::MalformedRecord(format!("object key '{}': {}", raw, e))
        })
}
