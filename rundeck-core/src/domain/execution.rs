//! Execution domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Fields;
use super::job::Job;

/// One run of a job, adhoc command, or script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub id: u64,
    pub href: Option<String>,
    pub status: ExecutionStatus,
    pub project: Option<String>,
    pub user: Option<String>,
    pub date_started: Option<DateTime<Utc>>,
    /// Absent while the execution has not reached a terminal status
    pub date_ended: Option<DateTime<Utc>>,
    /// The job this execution belongs to; absent for adhoc executions
    pub job: Option<Job>,
    pub description: Option<String>,
    pub argstring: Option<String>,
    /// Remaining attributes and child fields, e.g. `successfulNodes`
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub extra: Fields,
}

/// Execution status as reported by the server
///
/// Statuses this client does not know about are kept verbatim in `Other`
/// and are never terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
    Aborted,
    Skipped,
    Pending,
    Other(String),
}

impl ExecutionStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Running => "running",
            ExecutionStatus::Succeeded => "succeeded",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Aborted => "aborted",
            ExecutionStatus::Skipped => "skipped",
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Other(status) => status,
        }
    }

    /// Whether the scheduler will no longer change an execution in this status
    ///
    /// `Skipped` is deliberately not included; callers that want to stop on it
    /// pass their own terminal set to the blocking run helper.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded | ExecutionStatus::Failed | ExecutionStatus::Aborted
        )
    }

    /// The statuses for which [`ExecutionStatus::is_terminal`] holds
    pub fn terminal() -> Vec<ExecutionStatus> {
        vec![
            ExecutionStatus::Succeeded,
            ExecutionStatus::Failed,
            ExecutionStatus::Aborted,
        ]
    }
}

impl From<&str> for ExecutionStatus {
    fn from(value: &str) -> Self {
        match value {
            "running" => ExecutionStatus::Running,
            "succeeded" => ExecutionStatus::Succeeded,
            "failed" => ExecutionStatus::Failed,
            "aborted" => ExecutionStatus::Aborted,
            "skipped" => ExecutionStatus::Skipped,
            "pending" => ExecutionStatus::Pending,
            other => ExecutionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        ExecutionStatus::from(value.as_str())
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
