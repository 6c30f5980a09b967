//! Job-related API endpoints

use std::path::Path;

use rundeck_core::domain::execution::Execution;
use rundeck_core::domain::job::Job;
use rundeck_core::domain::results::{DeleteJobsResult, ImportStatus};
use rundeck_core::dto::Params;
use rundeck_core::dto::job::{ImportOptions, DocumentFormat, JobQuery, RunJobOptions};
use tracing::{debug, info};

use crate::RundeckClient;
use crate::error::{ClientError, Result};
use crate::transform;
use crate::transport::{ApiRequest, RequestBody};

impl RundeckClient {
    // =============================================================================
    // Job Listing
    // =============================================================================

    /// List jobs in a project matching a query
    ///
    /// Exact-name and exact-group filters need API version 2.
    pub async fn list_jobs(&self, project: &str, query: &JobQuery) -> Result<Vec<Job>> {
        self.require_version(query.required_version())?;

        let mut params = vec![("project".to_string(), project.to_string())];
        params.extend(query.to_params());

        let envelope = self
            .request_checked(ApiRequest::get("jobs").with_query(params))
            .await?;
        transform::jobs(&envelope)
    }

    /// IDs of the jobs matching a query, at most `limit` of them
    ///
    /// # Errors
    /// [`ClientError::NotFound`] when nothing matches.
    pub async fn get_job_ids(
        &self,
        project: &str,
        query: &JobQuery,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        let jobs = self.list_jobs(project, query).await?;
        if jobs.is_empty() {
            return Err(ClientError::NotFound(format!(
                "No jobs in project {:?} match the filter",
                project
            )));
        }

        let ids = jobs.into_iter().map(|job| job.id);
        Ok(match limit {
            Some(limit) => ids.take(limit).collect(),
            None => ids.collect(),
        })
    }

    /// ID of the job with the given exact name
    ///
    /// When several jobs share the name, the first one the server lists wins.
    pub async fn get_job_id(&self, project: &str, name: &str) -> Result<String> {
        let ids = self
            .get_job_ids(project, &JobQuery::exact_name(name), Some(1))
            .await
            .map_err(|err| match err {
                ClientError::NotFound(_) => ClientError::NotFound(format!(
                    "Job {:?} not found in project {:?}",
                    name, project
                )),
                other => other,
            })?;

        ids.into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(format!("Job {:?} not found", name)))
    }

    // =============================================================================
    // Job Execution
    // =============================================================================

    /// Start a job and return the new execution without waiting for it
    pub async fn run_job(&self, job_id: &str, options: &RunJobOptions) -> Result<Execution> {
        let request = ApiRequest::get(format!("job/{}/run", job_id)).with_query(options.to_params());
        let envelope = self.request_checked(request).await?;
        let execution = transform::execution(&envelope)?;

        info!("Started job {} as execution {}", job_id, execution.id);
        Ok(execution)
    }

    // =============================================================================
    // Job Definitions
    // =============================================================================

    /// Export the definitions of a project's jobs as raw text
    pub async fn export_jobs(
        &self,
        project: &str,
        format: DocumentFormat,
        query: &JobQuery,
    ) -> Result<String> {
        let mut params = vec![
            ("format".to_string(), format.to_string()),
            ("project".to_string(), project.to_string()),
        ];
        params.extend(query.to_params());
        self.request_text(ApiRequest::get("jobs/export").with_query(params))
            .await
    }

    /// Export one job definition as raw text
    pub async fn export_job(&self, job_id: &str, format: DocumentFormat) -> Result<String> {
        let params = vec![("format".to_string(), format.to_string())];
        self.request_text(ApiRequest::get(format!("job/{}", job_id)).with_query(params))
            .await
    }

    /// Import job definitions from a document
    pub async fn import_jobs(&self, definition: &str, options: &ImportOptions) -> Result<ImportStatus> {
        let mut fields: Params = options.to_params();
        fields.push(("xmlBatch".to_string(), definition.to_string()));

        let request = ApiRequest::post("jobs/import").with_body(RequestBody::Form(fields));
        let envelope = self.request_checked(request).await?;
        let status = transform::job_import_status(&envelope)?;

        info!(
            "Imported jobs: {} succeeded, {} failed, {} skipped",
            status.succeeded.len(),
            status.failed.len(),
            status.skipped.len()
        );
        Ok(status)
    }

    /// Import job definitions from a file
    ///
    /// Without an explicit format the file extension decides; only `xml` and
    /// `yaml` (or `yml`) are accepted.
    pub async fn import_job_file(
        &self,
        path: impl AsRef<Path>,
        options: &ImportOptions,
    ) -> Result<ImportStatus> {
        let path = path.as_ref();
        let format = match options.format {
            Some(format) => format,
            None => path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(DocumentFormat::from_extension)
                .ok_or_else(|| {
                    ClientError::InvalidRequest(format!(
                        "Invalid job definition format for {}: expected .xml or .yaml",
                        path.display()
                    ))
                })?,
        };

        debug!("Reading {} job definitions from {}", format, path.display());
        let definition = tokio::fs::read_to_string(path).await?;

        let options = ImportOptions {
            format: Some(format),
            ..options.clone()
        };
        self.import_jobs(&definition, &options).await
    }

    // =============================================================================
    // Job Deletion
    // =============================================================================

    /// Delete a job
    ///
    /// From API version 11 the server answers a successful delete with
    /// `204 No Content`; older versions send a success envelope.
    pub async fn delete_job(&self, job_id: &str) -> Result<bool> {
        let request = ApiRequest::delete(format!("job/{}", job_id));

        if self.api_version() >= 11 {
            let raw = self.send(request).await?;
            return Ok(raw.status == 204);
        }

        let envelope = self.request(request).await?;
        Ok(envelope.success())
    }

    /// Delete several jobs in one request
    pub async fn delete_jobs(&self, ids: &[String]) -> Result<DeleteJobsResult> {
        if ids.is_empty() {
            return Err(ClientError::InvalidRequest(
                "At least one job ID is required".to_string(),
            ));
        }

        let fields = vec![("idlist".to_string(), ids.join(","))];
        let request = ApiRequest::post("jobs/delete").with_body(RequestBody::Form(fields));
        let envelope = self.request_checked(request).await?;
        transform::jobs_delete(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use crate::ClientError;
    use crate::transport::testing::{ScriptedTransport, param, scripted};
    use crate::transport::{Method, RequestBody};
    use rundeck_core::domain::execution::ExecutionStatus;
    use rundeck_core::dto::job::{DupeOption, ImportOptions, DocumentFormat, JobQuery, RunJobOptions};

    const JOBS: &str = r#"<result success="true" apiversion="11"><jobs count="2">
        <job id="3b8a86d5-4fc3-4cc1-95a2-8b51421c2069"><name>backup</name><group>ops</group><project>demo</project><description/></job>
        <job id="c07518ef-b697-4792-9a59-5b4f08855d67"><name>backup</name><group>db</group><project>demo</project><description/></job>
    </jobs></result>"#;

    const EMPTY_JOBS: &str = r#"<result success="true" apiversion="11"><jobs count="0"/></result>"#;

    #[tokio::test]
    async fn test_list_jobs_sends_project_and_filters() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, JOBS), 11);
        let query = JobQuery {
            group_path: Some("ops".to_string()),
            ..Default::default()
        };

        let jobs = client.list_jobs("demo", &query).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].group.as_deref(), Some("ops"));

        let request = &transport.requests()[0];
        assert_eq!(request.path, "jobs");
        assert_eq!(param(&request.query, "project"), Some("demo"));
        assert_eq!(param(&request.query, "groupPath"), Some("ops"));
    }

    #[tokio::test]
    async fn test_exact_filter_needs_version_two() {
        let (client, transport) = scripted(ScriptedTransport::new(), 1);
        let err = client.get_job_id("demo", "backup").await.unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedOperation { required: 2, configured: 1 }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_job_id_takes_first_match() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, JOBS), 11);
        let id = client.get_job_id("demo", "backup").await.unwrap();
        assert_eq!(id, "3b8a86d5-4fc3-4cc1-95a2-8b51421c2069");
        assert_eq!(param(&transport.requests()[0].query, "jobExactFilter"), Some("backup"));
    }

    #[tokio::test]
    async fn test_get_job_id_not_found() {
        let (client, _) = scripted(ScriptedTransport::new().respond(200, EMPTY_JOBS), 11);
        let err = client.get_job_id("demo", "missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("\"missing\""));
    }

    #[tokio::test]
    async fn test_get_job_ids_limit() {
        let (client, _) = scripted(ScriptedTransport::new().respond(200, JOBS).respond(200, JOBS), 11);
        let query = JobQuery::default();
        assert_eq!(client.get_job_ids("demo", &query, None).await.unwrap().len(), 2);
        assert_eq!(client.get_job_ids("demo", &query, Some(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_job() {
        let body = r#"<result success="true"><executions count="1"><execution id="117" status="running"><user>admin</user></execution></executions></result>"#;
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, body), 11);
        let options = RunJobOptions {
            arg_string: Some([("env", "prod")].into_iter().collect()),
            ..Default::default()
        };

        let execution = client.run_job("abc", &options).await.unwrap();
        assert_eq!(execution.id, 117);
        assert_eq!(execution.status, ExecutionStatus::Running);

        let request = &transport.requests()[0];
        assert_eq!(request.path, "job/abc/run");
        assert_eq!(param(&request.query, "argString"), Some("-env prod"));
    }

    #[tokio::test]
    async fn test_export_job_returns_raw_text() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, "- name: backup\n"), 11);
        let text = client.export_job("abc", DocumentFormat::Yaml).await.unwrap();
        assert_eq!(text, "- name: backup\n");
        assert_eq!(param(&transport.requests()[0].query, "format"), Some("yaml"));
    }

    #[tokio::test]
    async fn test_import_jobs_sends_batch_form() {
        let body = r#"<result success="true"><succeeded count="1"><job index="1"><name>backup</name></job></succeeded><failed count="0"/><skipped count="0"/></result>"#;
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, body), 11);
        let options = ImportOptions {
            dupe_option: Some(DupeOption::Update),
            ..Default::default()
        };

        let status = client.import_jobs("<joblist/>", &options).await.unwrap();
        assert_eq!(status.succeeded.len(), 1);
        assert_eq!(status.total(), 1);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        match &request.body {
            RequestBody::Form(fields) => {
                assert_eq!(param(fields, "xmlBatch"), Some("<joblist/>"));
                assert_eq!(param(fields, "dupeOption"), Some("update"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_import_job_file_rejects_unknown_extension() {
        let (client, transport) = scripted(ScriptedTransport::new(), 11);
        let err = client
            .import_job_file("jobs.json", &ImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_import_job_file_missing_file() {
        let (client, _) = scripted(ScriptedTransport::new(), 11);
        let err = client
            .import_job_file("/nonexistent/jobs.yml", &ImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[tokio::test]
    async fn test_delete_job_by_version() {
        let (client, _) = scripted(ScriptedTransport::new().respond(204, "").respond(404, ""), 11);
        assert!(client.delete_job("abc").await.unwrap());
        assert!(!client.delete_job("abc").await.unwrap());

        let body = r#"<result success="true"><success><message>Job was successfully deleted</message></success></result>"#;
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, body), 5);
        assert!(client.delete_job("abc").await.unwrap());
        assert_eq!(transport.requests()[0].method, Method::Delete);
    }

    #[tokio::test]
    async fn test_delete_jobs_bulk() {
        let body = r#"<result success="true"><deleteJobs requestCount="2" allsuccessful="true"><succeeded count="2"><deleteJobResult id="a"/><deleteJobResult id="b"/></succeeded></deleteJobs></result>"#;
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, body), 11);
        let ids = vec!["a".to_string(), "b".to_string()];

        let result = client.delete_jobs(&ids).await.unwrap();
        assert_eq!(result.request_count, 2);
        assert!(result.all_successful);

        let request = &transport.requests()[0];
        assert_eq!(request.body, RequestBody::Form(vec![("idlist".to_string(), "a,b".to_string())]));

        assert!(matches!(client.delete_jobs(&[]).await, Err(ClientError::InvalidRequest(_))));
    }
}
