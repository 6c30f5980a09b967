//! Rundeck HTTP Client
//!
//! A typed client for the Rundeck XML API. Responses are parsed into a
//! [`ResponseEnvelope`], checked for the server's error marker, and turned into
//! domain records by the transform registry.
//!
//! # Example
//!
//! ```no_run
//! use rundeck_client::{Auth, ClientConfig, RundeckClient, WaitOptions};
//! use rundeck_core::dto::job::RunJobOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new("rundeck.example.com", Auth::Token("secret".into()));
//!     let client = RundeckClient::connect(config).await?;
//!
//!     let job_id = client.get_job_id("ops", "nightly-backup").await?;
//!     let execution = client
//!         .run_job_blocking(&job_id, &RunJobOptions::default(), &WaitOptions::default())
//!         .await?;
//!
//!     println!("Execution {} finished as {}", execution.id, execution.status);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod node_xml;
pub mod transform;
pub mod transport;
pub mod xml;

mod executions;
mod jobs;
mod poll;
mod projects;
mod system;

// Re-export commonly used types
pub use config::{Auth, ClientConfig, Protocol};
pub use envelope::ResponseEnvelope;
pub use error::{ClientError, Result};
pub use poll::WaitOptions;
pub use transform::{ResponseKind, Transformed};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, RequestBody, Transport};

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

/// Client for the Rundeck API
///
/// Endpoint methods are grouped by area:
/// - System information
/// - Jobs (list, run, export, import, delete)
/// - Executions and adhoc runs
/// - Projects, node resources and history
#[derive(Clone)]
pub struct RundeckClient {
    transport: Arc<dyn Transport>,
    api_version: u32,
}

impl fmt::Debug for RundeckClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RundeckClient")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl RundeckClient {
    /// Connect to a server over HTTP
    ///
    /// Validates the configuration and authenticates before returning.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::connect(&config).await?;
        Ok(Self::with_transport(transport, config.api_version))
    }

    /// Create a client over a custom transport
    pub fn with_transport(transport: impl Transport + 'static, api_version: u32) -> Self {
        Self {
            transport: Arc::new(transport),
            api_version,
        }
    }

    /// API version requests are made with
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Fail before any request is sent when the configured version is too old
    pub(crate) fn require_version(&self, required: u32) -> Result<()> {
        if self.api_version < required {
            return Err(ClientError::UnsupportedOperation {
                required,
                configured: self.api_version,
            });
        }
        Ok(())
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Send a request and return the raw response, whatever its status
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        debug!("{:?} {}", request.method, request.path);
        self.transport.execute(request).await
    }

    /// Send a request and parse the envelope without checking for an error marker
    ///
    /// A non-2xx response whose body is not XML becomes a transport error.
    pub async fn request(&self, request: ApiRequest) -> Result<ResponseEnvelope> {
        let raw = self.send(request).await?;
        match ResponseEnvelope::parse(&raw.body, self.api_version) {
            Ok(envelope) => Ok(envelope.with_http_status(raw.status)),
            Err(err) if raw.is_success() => Err(err),
            Err(_) => Err(status_error(&raw)),
        }
    }

    /// Send a request and parse the envelope, failing on an error marker
    pub(crate) async fn request_checked(&self, request: ApiRequest) -> Result<ResponseEnvelope> {
        let envelope = self.request(request).await?.raise_for_error()?;
        match envelope.http_status() {
            Some(status) if !(200..300).contains(&status) => {
                Err(ClientError::http_status(status, envelope.message()))
            }
            _ => Ok(envelope),
        }
    }

    /// Send a request whose successful body is not an envelope
    pub(crate) async fn request_text(&self, request: ApiRequest) -> Result<String> {
        let raw = self.send(request).await?;
        if raw.is_success() {
            return Ok(raw.body);
        }
        Err(self.classify_failure(raw))
    }

    /// Send a request and run the registry transform for `kind` over the checked envelope
    pub async fn apply(&self, kind: ResponseKind, request: ApiRequest) -> Result<Transformed> {
        let envelope = self.request_checked(request).await?;
        transform::apply(kind, &envelope)
    }

    fn classify_failure(&self, raw: RawResponse) -> ClientError {
        match ResponseEnvelope::parse(&raw.body, self.api_version) {
            Ok(envelope) if !envelope.success() => ClientError::RemoteOperation {
                message: envelope.message().to_string(),
                envelope: Box::new(envelope.with_http_status(raw.status)),
            },
            _ => status_error(&raw),
        }
    }
}

fn status_error(raw: &RawResponse) -> ClientError {
    let body = raw.body.trim();
    let message = if body.is_empty() {
        StatusCode::from_u16(raw.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.chars().take(200).collect()
    };
    ClientError::http_status(raw.status, message)
}
