//! imgmeta worker
//!
//! Consumes storage notifications delivered through a pub/sub envelope and
//! writes a JSON metadata sidecar for every referenced image. See
//! [`BatchProcessor::process`] for the failure accounting rules.

pub mod batch;
pub mod error;
pub mod notification;
pub mod summary;

pub use batch::BatchProcessor;
pub use error::{EnvelopeDecodeError, RecordProcessingError};
pub use notification::{ChangeRecord, NotificationEnvelope};
pub use summary::ProcessingSummary;

use imgmeta_core::LogFormat;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the worker binary.
///
/// Events go to stderr so stdout only carries the summary document.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,imgmeta=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().with_target(false).without_time().init(),
    }
}
