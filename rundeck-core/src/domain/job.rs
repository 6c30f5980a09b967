//! Job domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Fields;

/// A job definition as listed by the server
///
/// Identifiers are either server-generated UUIDs or arbitrary custom strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: Option<String>,
    pub group: Option<String>,
    pub project: Option<String>,
    pub description: Option<String>,
    /// Remaining attributes and child fields, e.g. `href` or `averageDuration`
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub extra: Fields,
}

/// Check whether a job ID looks like a server-generated UUID
///
/// This is a shape check only. It says nothing about whether the job exists,
/// and custom job IDs are legal, so expect false negatives for those.
pub fn is_job_id(job_id: &str) -> bool {
    job_id.len() == 36 && Uuid::parse_str(job_id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_job_id_accepts_hyphenated_uuid() {
        assert!(is_job_id(&Uuid::new_v4().to_string()));
        assert!(is_job_id("f114ab12-7c4e-4a3d-9d7e-3f5b2a1c0d9e"));
    }

    #[test]
    fn test_is_job_id_rejects_other_shapes() {
        assert!(!is_job_id(""));
        assert!(!is_job_id("nightly-backup"));
        // simple (unhyphenated) form is valid for uuid but not what the server emits
        assert!(!is_job_id("f114ab127c4e4a3d9d7e3f5b2a1c0d9e"));
        assert!(!is_job_id("f114ab12-7c4e-4a3d-9d7e-3f5b2a1c0d9z"));
    }
}
