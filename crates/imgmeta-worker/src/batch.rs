//! Batch metadata processor
//!
//! Entries and their records are handled one at a time, in order. Every
//! failure is absorbed at the narrowest scope and turned into a counter
//! increment plus a log line; nothing escapes [`BatchProcessor::process`].

use std::sync::Arc;
use std::time::Instant;

use imgmeta_core::{ErrorMetadata, LogLevel};
use imgmeta_processing::ImageProcessor;
use imgmeta_storage::{sidecar_key, Storage, SIDECAR_CONTENT_TYPE};
use serde_json::Value;

use crate::error::{EnvelopeDecodeError, RecordProcessingError};
use crate::notification::{decode_entry, ChangeRecord, NotificationEnvelope};
use crate::summary::ProcessingSummary;

const UNKNOWN: &str = "<unknown>";

/// Success and failure counts of one invocation
#[derive(Debug, Default)]
struct BatchCounters {
    processed: u64,
    failed: u64,
}

pub struct BatchProcessor {
    storage: Arc<dyn Storage>,
    images: ImageProcessor,
}

impl BatchProcessor {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            images: ImageProcessor,
        }
    }

    /// Process every change record of every entry in `envelope`.
    ///
    /// An entry whose payload cannot be decoded counts as a single failure,
    /// however many records it carried. Each record that fails at any step
    /// counts as one failure; the rest of the batch still runs.
    pub async fn process(&self, envelope: &NotificationEnvelope) -> ProcessingSummary {
        let start = Instant::now();
        let mut counters = BatchCounters::default();

        tracing::info!(
            entries = envelope.records.len(),
            backend = %self.storage.backend_type(),
            "Processing notification batch"
        );

        for (index, entry) in envelope.records.iter().enumerate() {
            let records = match decode_entry(entry) {
                Ok(records) => records,
                Err(e) => {
                    log_entry_failure(index, &e);
                    counters.failed += 1;
                    continue;
                }
            };

            tracing::info!(
                entry = index,
                records = records.len(),
                "Processing notification entry"
            );

            for raw in &records {
                if self.process_raw_record(raw).await {
                    counters.processed += 1;
                } else {
                    counters.failed += 1;
                }
            }
        }

        let summary = ProcessingSummary::from_counts(counters.processed, counters.failed);

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        if summary.is_complete_success() {
            tracing::info!(
                processed = summary.processed,
                status_code = summary.status_code,
                duration_ms,
                "Processing complete"
            );
        } else {
            tracing::warn!(
                processed = summary.processed,
                failed = summary.failed,
                status_code = summary.status_code,
                duration_ms,
                "Processing complete with failures"
            );
        }

        summary
    }

    /// Returns whether the record produced a sidecar.
    async fn process_raw_record(&self, raw: &Value) -> bool {
        let record = match ChangeRecord::from_value(raw) {
            Ok(record) => record,
            Err(e) => {
                log_record_failure(None, &e);
                return false;
            }
        };

        match self.process_record(&record).await {
            Ok(_) => true,
            Err(e) => {
                log_record_failure(Some(&record), &e);
                false
            }
        }
    }

    /// Fetch, extract, serialize and store the sidecar for one object.
    ///
    /// Returns the key the sidecar was written to.
    pub async fn process_record(
        &self,
        record: &ChangeRecord,
    ) -> Result<String, RecordProcessingError> {
        let bucket = record.bucket.as_str();
        let key = record.object_key.as_str();

        tracing::info!(bucket = %bucket, key = %key, "Processing object");

        let data = self
            .storage
            .download(bucket, key)
            .await
            .map_err(|source| RecordProcessingError::Fetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })?;

        let metadata =
            self.images
                .extract_metadata(&data)
                .map_err(|source| RecordProcessingError::Decode {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    source,
                })?;

        let output_key = sidecar_key(key)
            .map_err(|e| RecordProcessingError::MalformedRecord(e.to_string()))?;
        let json = metadata.to_json_pretty()?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            width = metadata.width,
            height = metadata.height,
            format = %metadata.format,
            mode = %metadata.mode,
            exif_tags = metadata.exif.len(),
            "Extracted image metadata"
        );
        tracing::debug!(key = %key, metadata = %json, "Extracted metadata document");

        let url = self
            .storage
            .upload_with_key(bucket, &output_key, json.into_bytes(), SIDECAR_CONTENT_TYPE)
            .await
            .map_err(|source| RecordProcessingError::Store {
                bucket: bucket.to_string(),
                key: output_key.clone(),
                source,
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            output_key = %output_key,
            url = %url,
            "Uploaded metadata sidecar"
        );

        Ok(output_key)
    }
}

fn log_entry_failure(index: usize, err: &EnvelopeDecodeError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(entry = index, error_code = code, error = %err, "Failed to decode notification entry")
        }
        LogLevel::Warn => {
            tracing::warn!(entry = index, error_code = code, error = %err, "Failed to decode notification entry")
        }
        LogLevel::Error => {
            tracing::error!(entry = index, error_code = code, error = %err, "Failed to decode notification entry")
        }
    }
}

fn log_record_failure(record: Option<&ChangeRecord>, err: &RecordProcessingError) {
    let bucket = record.map_or(UNKNOWN, |r| r.bucket.as_str());
    let key = record.map_or(UNKNOWN, |r| r.object_key.as_str());
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(bucket = %bucket, key = %key, error_code = code, error = %err, "Failed to process object")
        }
        LogLevel::Warn => {
            tracing::warn!(bucket = %bucket, key = %key, error_code = code, error = %err, "Failed to process object")
        }
        LogLevel::Error => {
            tracing::error!(bucket = %bucket, key = %key, error_code = code, error = %err, "Failed to process object")
        }
    }
}
