//! Project history options

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Params, push_each, push_opt};
use crate::timestamp;

/// Filters for a project's history events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub job_id_filter: Option<String>,
    pub report_id_filter: Option<String>,
    pub user_filter: Option<String>,
    /// Outcome, e.g. `succeed`, `fail` or `cancel`
    pub stat_filter: Option<String>,
    pub job_list_filter: Vec<String>,
    pub exclude_job_list_filter: Vec<String>,
    pub recent_filter: Option<String>,
    pub begin: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub max: Option<u32>,
    pub offset: Option<u32>,
}

impl HistoryQuery {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_opt(&mut params, "jobIdFilter", self.job_id_filter.as_ref());
        push_opt(&mut params, "reportIdFilter", self.report_id_filter.as_ref());
        push_opt(&mut params, "userFilter", self.user_filter.as_ref());
        push_opt(&mut params, "statFilter", self.stat_filter.as_ref());
        push_each(&mut params, "jobListFilter", &self.job_list_filter);
        push_each(&mut params, "excludeJobListFilter", &self.exclude_job_list_filter);
        push_opt(&mut params, "recentFilter", self.recent_filter.as_ref());
        push_opt(&mut params, "begin", self.begin.map(|t| timestamp::format(&t)).as_ref());
        push_opt(&mut params, "end", self.end.map(|t| timestamp::format(&t)).as_ref());
        push_opt(&mut params, "max", self.max.as_ref());
        push_opt(&mut params, "offset", self.offset.as_ref());
        params
    }
}
