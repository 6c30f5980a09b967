//! Run a job and wait for it to finish
//!
//! The only place the client sleeps or retries.

use std::time::Duration;

use rundeck_core::domain::execution::{Execution, ExecutionStatus};
use rundeck_core::dto::job::RunJobOptions;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::RundeckClient;
use crate::error::{ClientError, Result};

/// How long and how often to poll a started execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Polling budget measured from the moment the job was started
    pub timeout: Duration,
    /// Sleep between polls
    pub interval: Duration,
    /// Statuses that end the wait
    pub terminal_statuses: Vec<ExecutionStatus>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(3),
            terminal_statuses: ExecutionStatus::terminal(),
        }
    }
}

impl WaitOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            ..Self::default()
        }
    }

    /// Replace the set of statuses that end the wait
    pub fn with_terminal_statuses(mut self, statuses: impl IntoIterator<Item = ExecutionStatus>) -> Self {
        self.terminal_statuses = statuses.into_iter().collect();
        self
    }

    fn is_terminal(&self, status: &ExecutionStatus) -> bool {
        self.terminal_statuses.contains(status)
    }
}

/// A status fetch that failed because the execution record is not there yet
fn is_unmaterialized(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::MissingField { kind: "execution", .. } | ClientError::NotFound(_)
    )
}

impl RundeckClient {
    /// Start a job and poll its execution until it reaches a terminal status
    ///
    /// Returns the terminal execution, or the last observed one once
    /// `wait.timeout` has elapsed. Running out of time is not an error;
    /// callers check `status` themselves.
    ///
    /// A single incomplete execution record on the very first poll is
    /// tolerated, since the server may not have materialized the execution
    /// yet. Any later failure is returned as is.
    pub async fn run_job_blocking(
        &self,
        job_id: &str,
        options: &RunJobOptions,
        wait: &WaitOptions,
    ) -> Result<Execution> {
        let mut execution = self.run_job(job_id, options).await?;
        let execution_id = execution.id;

        let start = Instant::now();
        let mut elapsed = Duration::ZERO;
        let mut tolerated = false;

        while elapsed < wait.timeout {
            match self.execution_status(execution_id).await {
                Ok(current) => {
                    debug!("Execution {} is {}", execution_id, current.status);
                    if wait.is_terminal(&current.status) {
                        info!(
                            "Execution {} finished as {} after {:?}",
                            execution_id, current.status, elapsed
                        );
                        return Ok(current);
                    }
                    execution = current;
                }
                Err(err) if elapsed.is_zero() && !tolerated && is_unmaterialized(&err) => {
                    warn!(
                        "Execution {} not available yet ({}), retrying in {:?}",
                        execution_id, err, wait.interval
                    );
                    tolerated = true;
                }
                Err(err) => return Err(err),
            }

            sleep(wait.interval).await;
            elapsed = start.elapsed();
        }

        warn!(
            "Execution {} still {} after {:?}",
            execution_id, execution.status, wait.timeout
        );
        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{ScriptedTransport, scripted};

    fn executions_body(id: u64, status: &str) -> String {
        format!(
            r#"<result success="true" apiversion="11"><executions count="1"><execution id="{id}" status="{status}"><user>admin</user></execution></executions></result>"#
        )
    }

    const INCOMPLETE: &str = r#"<result success="true" apiversion="11"><executions count="1"><execution status="running"/></executions></result>"#;

    #[test]
    fn test_default_wait_options() {
        let wait = WaitOptions::default();
        assert_eq!(wait.timeout, Duration::from_secs(60));
        assert_eq!(wait.interval, Duration::from_secs(3));
        assert!(wait.is_terminal(&ExecutionStatus::Aborted));
        assert!(!wait.is_terminal(&ExecutionStatus::Skipped));
        assert!(!wait.is_terminal(&ExecutionStatus::Running));

        let wait = wait.with_terminal_statuses([ExecutionStatus::Skipped]);
        assert!(wait.is_terminal(&ExecutionStatus::Skipped));
        assert!(!wait.is_terminal(&ExecutionStatus::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_returns_initial_execution() {
        let (client, transport) = scripted(
            ScriptedTransport::new().respond(200, executions_body(42, "running")),
            11,
        );
        let start = Instant::now();
        let wait = WaitOptions::new(Duration::ZERO, Duration::from_secs(3));

        let execution = client
            .run_job_blocking("abc", &RunJobOptions::default(), &wait)
            .await
            .unwrap();

        assert_eq!(execution.id, 42);
        assert_eq!(execution.status, ExecutionStatus::Running);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_on_terminal_status() {
        let (client, transport) = scripted(
            ScriptedTransport::new()
                .respond(200, executions_body(42, "running"))
                .respond(200, executions_body(42, "running"))
                .respond(200, executions_body(42, "running"))
                .respond(200, executions_body(42, "failed")),
            11,
        );
        let start = Instant::now();
        let wait = WaitOptions::new(Duration::from_secs(10), Duration::from_secs(3));

        let execution = client
            .run_job_blocking("abc", &RunJobOptions::default(), &wait)
            .await
            .unwrap();

        assert_eq!(execution.status, ExecutionStatus::Failed);
        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].path, "job/abc/run");
        assert!(requests[1..].iter().all(|r| r.path == "execution/42"));

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(6), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(9), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_last_observation() {
        let mut transport = ScriptedTransport::new().respond(200, executions_body(7, "running"));
        for _ in 0..4 {
            transport = transport.respond(200, executions_body(7, "running"));
        }
        let (client, transport) = scripted(transport, 11);
        let wait = WaitOptions::new(Duration::from_secs(10), Duration::from_secs(3));

        let execution = client
            .run_job_blocking("abc", &RunJobOptions::default(), &wait)
            .await
            .unwrap();

        assert_eq!(execution.status, ExecutionStatus::Running);
        // polls at 0s, 3s, 6s and 9s
        assert_eq!(transport.requests().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_terminal_set_stops_on_skipped() {
        let (client, _) = scripted(
            ScriptedTransport::new()
                .respond(200, executions_body(8, "running"))
                .respond(200, executions_body(8, "skipped")),
            11,
        );
        let wait = WaitOptions::default()
            .with_terminal_statuses([ExecutionStatus::Skipped, ExecutionStatus::Succeeded]);

        let execution = client
            .run_job_blocking("abc", &RunJobOptions::default(), &wait)
            .await
            .unwrap();
        assert_eq!(execution.status, ExecutionStatus::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_incomplete_record_is_tolerated() {
        let (client, transport) = scripted(
            ScriptedTransport::new()
                .respond(200, executions_body(9, "running"))
                .respond(200, INCOMPLETE)
                .respond(200, executions_body(9, "succeeded")),
            11,
        );
        let wait = WaitOptions::new(Duration::from_secs(10), Duration::from_secs(3));

        let execution = client
            .run_job_blocking("abc", &RunJobOptions::default(), &wait)
            .await
            .unwrap();
        assert_eq!(execution.status, ExecutionStatus::Succeeded);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_incomplete_record_propagates() {
        let (client, _) = scripted(
            ScriptedTransport::new()
                .respond(200, executions_body(9, "running"))
                .respond(200, executions_body(9, "running"))
                .respond(200, INCOMPLETE),
            11,
        );
        let wait = WaitOptions::new(Duration::from_secs(10), Duration::from_secs(3));

        let err = client
            .run_job_blocking("abc", &RunJobOptions::default(), &wait)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingField { kind: "execution", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_other_errors_propagate() {
        let (client, transport) = scripted(
            ScriptedTransport::new()
                .respond(200, executions_body(9, "running"))
                .respond(500, "Internal Server Error"),
            11,
        );
        let err = client
            .run_job_blocking("abc", &RunJobOptions::default(), &WaitOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_failure_propagates() {
        let body = r#"<result error="true"><error><message>Job ID does not exist: abc</message></error></result>"#;
        let (client, _) = scripted(ScriptedTransport::new().respond(404, body), 11);
        let err = client
            .run_job_blocking("abc", &RunJobOptions::default(), &WaitOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }
}
