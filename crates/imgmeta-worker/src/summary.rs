use serde::{Deserialize, Serialize};

/// Every record succeeded.
pub const STATUS_OK: u16 = 200;

/// At least one entry or record failed.
pub const STATUS_MULTI_STATUS: u16 = 207;

/// Outcome of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub processed: u64,
    pub failed: u64,
}

impl ProcessingSummary {
    pub fn from_counts(processed: u64, failed: u64) -> Self {
        let status_code = if failed == 0 {
            STATUS_OK
        } else {
            STATUS_MULTI_STATUS
        };

        Self {
            status_code,
            processed,
            failed,
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}
