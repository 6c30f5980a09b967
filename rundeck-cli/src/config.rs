//! Connection settings
//!
//! Command-line flags, each with an environment variable fallback, that build
//! the client configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rundeck_client::config::{DEFAULT_PORT, MAX_API_VERSION};
use rundeck_client::{Auth, ClientConfig, Protocol};

/// Server connection flags
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Rundeck server host
    #[arg(long, global = true, env = "RUNDECK_SERVER", default_value = "localhost")]
    pub server: String,

    /// Server port
    #[arg(long, global = true, env = "RUNDECK_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// http or https
    #[arg(long, global = true, env = "RUNDECK_PROTOCOL", default_value = "http")]
    pub protocol: String,

    /// URL prefix when Rundeck is not served at the site root
    #[arg(long, global = true, env = "RUNDECK_BASE_PATH")]
    pub base_path: Option<String>,

    /// API token
    #[arg(long, global = true, env = "RUNDECK_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Username for password login
    #[arg(long, global = true, env = "RUNDECK_USR")]
    pub user: Option<String>,

    /// Password for password login
    #[arg(long, global = true, env = "RUNDECK_PWD", hide_env_values = true)]
    pub password: Option<String>,

    /// API version to speak
    #[arg(long, global = true, env = "RUNDECK_API_VERSION", default_value_t = MAX_API_VERSION)]
    pub api_version: u32,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub request_timeout: u64,
}

impl ConnectionArgs {
    /// Build and validate the client configuration
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let protocol: Protocol = self.protocol.parse()?;

        let auth = match (&self.token, &self.user, &self.password) {
            (Some(token), _, _) => Some(Auth::Token(token.clone())),
            (None, Some(username), Some(password)) => Some(Auth::Password {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        let config = ClientConfig {
            server: self.server.clone(),
            protocol,
            port: self.port,
            base_path: self.base_path.clone(),
            auth,
            api_version: self.api_version,
            verify_cert: !self.insecure,
            request_timeout: Duration::from_secs(self.request_timeout),
        };

        config.validate().context("Invalid connection settings")?;
        Ok(config)
    }
}
