//! Execution and adhoc run endpoints

use rundeck_core::domain::execution::Execution;
use rundeck_core::domain::results::AbortResult;
use rundeck_core::dto::adhoc::AdhocOptions;
use rundeck_core::dto::execution::{ExecutionQuery, JobExecutionsQuery, OutputFormat, OutputOptions};
use tracing::info;

use crate::RundeckClient;
use crate::error::{ClientError, Result};
use crate::transform;
use crate::transport::{ApiRequest, RequestBody};

impl RundeckClient {
    // =============================================================================
    // Execution Queries
    // =============================================================================

    /// Executions of one job, newest first
    pub async fn list_job_executions(
        &self,
        job_id: &str,
        query: &JobExecutionsQuery,
    ) -> Result<Vec<Execution>> {
        let request =
            ApiRequest::get(format!("job/{}/executions", job_id)).with_query(query.to_params());
        let envelope = self.request_checked(request).await?;
        transform::executions(&envelope)
    }

    /// Executions currently running in a project, or in all projects with `*`
    pub async fn list_running_executions(&self, project: &str) -> Result<Vec<Execution>> {
        let params = vec![("project".to_string(), project.to_string())];
        let envelope = self
            .request_checked(ApiRequest::get("executions/running").with_query(params))
            .await?;
        transform::executions(&envelope)
    }

    /// Current state of an execution
    pub async fn execution_status(&self, execution_id: u64) -> Result<Execution> {
        let envelope = self
            .request_checked(ApiRequest::get(format!("execution/{}", execution_id)))
            .await?;
        transform::execution(&envelope)
    }

    /// Query a project's executions (API version 5)
    pub async fn query_executions(
        &self,
        project: &str,
        query: &ExecutionQuery,
    ) -> Result<Vec<Execution>> {
        self.require_version(5)?;

        let mut params = vec![("project".to_string(), project.to_string())];
        params.extend(query.to_params());
        let envelope = self
            .request_checked(ApiRequest::get("executions").with_query(params))
            .await?;
        transform::executions(&envelope)
    }

    // =============================================================================
    // Execution Output
    // =============================================================================

    /// Execution log output as the server's JSON document
    pub async fn execution_output(
        &self,
        execution_id: u64,
        options: &OutputOptions,
    ) -> Result<serde_json::Value> {
        let request = ApiRequest::get(format!("execution/{}/output", execution_id))
            .with_query(options.to_params(OutputFormat::Json))
            .with_header("Accept", "application/json");
        let body = self.request_text(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            ClientError::MalformedResponse(format!("Failed to parse execution output: {}", e))
        })
    }

    /// Execution log output as plain text
    pub async fn execution_output_text(
        &self,
        execution_id: u64,
        options: &OutputOptions,
    ) -> Result<String> {
        let request = ApiRequest::get(format!("execution/{}/output", execution_id))
            .with_query(options.to_params(OutputFormat::Text));
        self.request_text(request).await
    }

    /// Ask the server to abort a running execution
    pub async fn abort_execution(
        &self,
        execution_id: u64,
        as_user: Option<&str>,
    ) -> Result<AbortResult> {
        let params = as_user
            .map(|user| vec![("asUser".to_string(), user.to_string())])
            .unwrap_or_default();
        let request =
            ApiRequest::get(format!("execution/{}/abort", execution_id)).with_query(params);
        let envelope = self.request_checked(request).await?;
        let result = transform::execution_abort(&envelope)?;

        info!("Abort of execution {}: {}", execution_id, result.status);
        Ok(result)
    }

    // =============================================================================
    // Adhoc Runs
    // =============================================================================

    /// Run a shell command on the matching nodes; returns the execution ID
    pub async fn run_adhoc_command(
        &self,
        project: &str,
        command: &str,
        options: &AdhocOptions,
    ) -> Result<u64> {
        let mut params = vec![
            ("project".to_string(), project.to_string()),
            ("exec".to_string(), command.to_string()),
        ];
        params.extend(options.to_command_params());

        let envelope = self
            .request_checked(ApiRequest::get("run/command").with_query(params))
            .await?;
        transform::run_execution(&envelope)
    }

    /// Upload and run a script on the matching nodes; returns the execution ID
    ///
    /// Interpreter options need API version 8.
    pub async fn run_adhoc_script(
        &self,
        project: &str,
        script: &str,
        options: &AdhocOptions,
    ) -> Result<u64> {
        self.require_version(options.required_version())?;

        let mut params = vec![("project".to_string(), project.to_string())];
        params.extend(options.to_params());

        let request = ApiRequest::post("run/script")
            .with_query(params)
            .with_body(RequestBody::Multipart {
                field: "scriptFile".to_string(),
                content: script.to_string(),
            });
        let envelope = self.request_checked(request).await?;
        transform::run_execution(&envelope)
    }

    /// Run a script fetched from a URL on the matching nodes (API version 4)
    ///
    /// Interpreter options need API version 8.
    pub async fn run_adhoc_url(
        &self,
        project: &str,
        script_url: &str,
        options: &AdhocOptions,
    ) -> Result<u64> {
        self.require_version(4)?;
        self.require_version(options.required_version())?;

        let mut fields = vec![
            ("project".to_string(), project.to_string()),
            ("scriptURL".to_string(), script_url.to_string()),
        ];
        fields.extend(options.to_params());

        let request = ApiRequest::post("run/url").with_body(RequestBody::Form(fields));
        let envelope = self.request_checked(request).await?;
        transform::run_execution(&envelope)
    }
}
