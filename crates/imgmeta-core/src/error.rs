//! Error metadata shared across crates
//!
//! Each crate owns its error enum. The worker classifies failures through
//! [`ErrorMetadata`] so that log lines carry a stable code and a level chosen
//! by kind instead of by call site.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like absent optional data
    Debug,
    /// Warning level - for bad input that only affects one item
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be reported
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "OBJECT_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
