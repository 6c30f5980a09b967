//! Outcomes of write operations

use serde::{Deserialize, Serialize};

use super::Fields;
use super::execution::ExecutionStatus;

/// Result of an abort request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortResult {
    /// Abort state: `pending`, `failed` or `aborted`
    pub status: String,
    pub reason: Option<String>,
    pub execution_id: Option<u64>,
    pub execution_status: Option<ExecutionStatus>,
}

/// Per-job outcome of a job definition import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatus {
    pub succeeded: Vec<Fields>,
    pub failed: Vec<Fields>,
    pub skipped: Vec<Fields>,
}

impl ImportStatus {
    /// Total number of job definitions the server reported on
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }
}

/// Result of a bulk job delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteJobsResult {
    pub request_count: u32,
    pub all_successful: bool,
    pub succeeded: Option<DeleteOutcome>,
    pub failed: Option<DeleteOutcome>,
}

/// One outcome group of a bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub count: u32,
    pub jobs: Vec<Fields>,
}

/// Bare success flag and message of an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: String,
}
