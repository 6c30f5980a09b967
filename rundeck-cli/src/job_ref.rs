//! Job reference resolution
//!
//! Jobs can be referenced on the command line either by their UUID or by
//! `group/path/name`, which is looked up within a project.

use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use rundeck_client::RundeckClient;
use rundeck_core::domain::job::is_job_id;
use rundeck_core::dto::job::JobQuery;

/// A job given either by ID or by its group path and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRef {
    Id(String),
    Path { group: Option<String>, name: String },
}

impl JobRef {
    /// Parse a job reference
    ///
    /// Anything shaped like a server UUID is an ID; otherwise the last `/`
    /// separates the group path from the job name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if is_job_id(input) {
            return JobRef::Id(input.to_string());
        }

        match input.trim_matches('/').rsplit_once('/') {
            Some((group, name)) => JobRef::Path {
                group: Some(group.to_string()),
                name: name.to_string(),
            },
            None => JobRef::Path {
                group: None,
                name: input.trim_matches('/').to_string(),
            },
        }
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRef::Id(id) => f.write_str(id),
            JobRef::Path { group: Some(group), name } => write!(f, "{}/{}", group, name),
            JobRef::Path { group: None, name } => f.write_str(name),
        }
    }
}

/// Resolve a job reference to a job ID
///
/// Name lookups need a project and must match exactly one job.
pub async fn resolve_job_id(
    client: &RundeckClient,
    project: Option<&str>,
    job: &JobRef,
) -> Result<String> {
    let (group, name) = match job {
        JobRef::Id(id) => return Ok(id.clone()),
        JobRef::Path { group, name } => (group, name),
    };

    let project =
        project.ok_or_else(|| anyhow!("--project is required to find job '{}' by name", job))?;

    let query = JobQuery {
        group_path_exact: group.clone(),
        ..JobQuery::exact_name(name.clone())
    };
    let jobs = client
        .list_jobs(project, &query)
        .await
        .with_context(|| format!("Failed to look up job '{}' in project {}", job, project))?;

    match jobs.as_slice() {
        [] => bail!("No job named '{}' found in project {}", job, project),
        [found] => Ok(found.id.clone()),
        _ => {
            let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
            bail!(
                "Ambiguous job name '{}': matches {} jobs: {}",
                job,
                jobs.len(),
                ids.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid() {
        let id = "f114ab12-7c4e-4a3d-9d7e-3f5b2a1c0d9e";
        assert_eq!(JobRef::parse(id), JobRef::Id(id.to_string()));
    }

    #[test]
    fn test_parse_plain_name() {
        assert_eq!(
            JobRef::parse("nightly-backup"),
            JobRef::Path { group: None, name: "nightly-backup".to_string() }
        );
    }

    #[test]
    fn test_parse_group_path() {
        let job = JobRef::parse("ops/db/nightly-backup");
        assert_eq!(
            job,
            JobRef::Path {
                group: Some("ops/db".to_string()),
                name: "nightly-backup".to_string()
            }
        );
        assert_eq!(job.to_string(), "ops/db/nightly-backup");
    }

    #[test]
    fn test_parse_strips_outer_slashes() {
        assert_eq!(
            JobRef::parse("/deploy/"),
            JobRef::Path { group: None, name: "deploy".to_string() }
        );
    }
}
