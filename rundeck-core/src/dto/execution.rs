//! Execution request options

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Params, push_each, push_joined, push_opt};
use crate::domain::execution::ExecutionStatus;
use crate::timestamp;

/// Paging and status filter for a single job's executions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExecutionsQuery {
    pub status: Option<ExecutionStatus>,
    /// Maximum number of results (server default: 20)
    pub max: Option<u32>,
    pub offset: Option<u32>,
}

impl JobExecutionsQuery {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_opt(&mut params, "status", self.status.as_ref());
        push_opt(&mut params, "max", self.max.as_ref());
        push_opt(&mut params, "offset", self.offset.as_ref());
        params
    }
}

/// Filters for querying a project's executions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionQuery {
    pub status_filter: Option<ExecutionStatus>,
    pub aborted_by_filter: Option<String>,
    pub user_filter: Option<String>,
    /// Relative window such as `2w`: an integer followed by one of `h d w m y`
    pub recent_filter: Option<String>,
    pub begin: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Include adhoc executions
    pub adhoc: Option<bool>,
    pub job_id_list_filter: Vec<String>,
    pub exclude_job_id_list_filter: Vec<String>,
    /// Full `group/name` job paths
    pub job_list_filter: Vec<String>,
    pub exclude_job_list_filter: Vec<String>,
    pub group_path: Option<String>,
    pub group_path_exact: Option<String>,
    pub exclude_group_path: Option<String>,
    pub exclude_group_path_exact: Option<String>,
    pub job_exact_filter: Option<String>,
    pub exclude_job_exact_filter: Option<String>,
    pub max: Option<u32>,
    pub offset: Option<u32>,
}

impl ExecutionQuery {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_opt(&mut params, "statusFilter", self.status_filter.as_ref());
        push_opt(&mut params, "abortedbyFilter", self.aborted_by_filter.as_ref());
        push_opt(&mut params, "userFilter", self.user_filter.as_ref());
        push_opt(&mut params, "recentFilter", self.recent_filter.as_ref());
        push_opt(&mut params, "begin", self.begin.map(|t| timestamp::format(&t)).as_ref());
        push_opt(&mut params, "end", self.end.map(|t| timestamp::format(&t)).as_ref());
        push_opt(&mut params, "adhoc", self.adhoc.as_ref());
        push_joined(&mut params, "jobIdListFilter", &self.job_id_list_filter);
        push_joined(
            &mut params,
            "excludeJobIdListFilter",
            &self.exclude_job_id_list_filter,
        );
        push_each(&mut params, "jobListFilter", &self.job_list_filter);
        push_each(&mut params, "excludeJobListFilter", &self.exclude_job_list_filter);
        push_opt(&mut params, "groupPath", self.group_path.as_ref());
        push_opt(&mut params, "groupPathExact", self.group_path_exact.as_ref());
        push_opt(&mut params, "excludeGroupPath", self.exclude_group_path.as_ref());
        push_opt(
            &mut params,
            "excludeGroupPathExact",
            self.exclude_group_path_exact.as_ref(),
        );
        push_opt(&mut params, "jobExactFilter", self.job_exact_filter.as_ref());
        push_opt(
            &mut params,
            "excludeJobExactFilter",
            self.exclude_job_exact_filter.as_ref(),
        );
        push_opt(&mut params, "max", self.max.as_ref());
        push_opt(&mut params, "offset", self.offset.as_ref());
        params
    }
}

/// Execution log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Xml,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        })
    }
}

/// Which slice of an execution's log output to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Byte offset to read from; 0 is the beginning
    pub offset: Option<u64>,
    /// Lines from the end of the output; overrides `offset`
    pub lastlines: Option<u64>,
    /// Unix millisecond timestamp; only output received after it
    pub lastmod: Option<i64>,
    /// Maximum lines to read forward from `offset`
    pub maxlines: Option<u64>,
}

impl OutputOptions {
    pub fn to_params(&self, format: OutputFormat) -> Params {
        let mut params = vec![("format".to_string(), format.to_string())];
        push_opt(&mut params, "offset", self.offset.as_ref());
        push_opt(&mut params, "lastlines", self.lastlines.as_ref());
        push_opt(&mut params, "lastmod", self.lastmod.as_ref());
        push_opt(&mut params, "maxlines", self.maxlines.as_ref());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::lookup;
    use chrono::TimeZone;

    #[test]
    fn test_execution_query_formats_dates() {
        let query = ExecutionQuery {
            status_filter: Some(ExecutionStatus::Failed),
            begin: Some(Utc.with_ymd_and_hms(2013, 11, 2, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let params = query.to_params();

        assert_eq!(lookup(&params, "statusFilter"), Some("failed"));
        assert_eq!(lookup(&params, "begin"), Some("2013-11-02T00:00:00Z"));
        assert_eq!(lookup(&params, "end"), None);
    }

    #[test]
    fn test_execution_query_list_encodings() {
        let query = ExecutionQuery {
            job_id_list_filter: vec!["a".to_string(), "b".to_string()],
            job_list_filter: vec!["ops/backup".to_string(), "ops/restore".to_string()],
            ..Default::default()
        };
        let params = query.to_params();

        assert_eq!(lookup(&params, "jobIdListFilter"), Some("a,b"));
        let job_lists: Vec<_> = params
            .iter()
            .filter(|(k, _)| k == "jobListFilter")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(job_lists, vec!["ops/backup", "ops/restore"]);
    }

    #[test]
    fn test_output_params_lead_with_format() {
        let options = OutputOptions {
            lastlines: Some(50),
            ..Default::default()
        };
        let params = options.to_params(OutputFormat::Json);
        assert_eq!(params[0], ("format".to_string(), "json".to_string()));
        assert_eq!(lookup(&params, "lastlines"), Some("50"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_job_executions_params() {
        let query = JobExecutionsQuery {
            status: Some(ExecutionStatus::Running),
            max: Some(5),
            offset: None,
        };
        let params = query.to_params();
        assert_eq!(lookup(&params, "status"), Some("running"));
        assert_eq!(lookup(&params, "max"), Some("5"));
        assert_eq!(lookup(&params, "offset"), None);
    }
}
