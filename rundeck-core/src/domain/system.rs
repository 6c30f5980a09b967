//! Server system information

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attributes, Fields};

/// Snapshot of the server's build, host and runtime statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub timestamp: DateTime<Utc>,
    pub rundeck: Fields,
    pub os: Fields,
    pub jvm: Fields,
    pub stats: SystemStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub uptime: Attributes,
    pub cpu: Fields,
    pub memory: Fields,
    pub scheduler: Fields,
    pub threads: Fields,
}
