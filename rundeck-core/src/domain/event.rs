//! History event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attributes, Fields};

/// A project history event (a finished execution report)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub user: Option<String>,
    pub project: Option<String>,
    pub date_started: DateTime<Utc>,
    pub date_ended: DateTime<Utc>,
    /// Attributes of the `job` reference, when the event belongs to a job
    pub job: Option<Attributes>,
    /// Attributes of the `execution` reference
    pub execution: Option<Attributes>,
    /// Per-node outcome counts
    pub node_summary: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub extra: Fields,
}
