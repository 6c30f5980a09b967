//! Client configuration
//!
//! Connection parameters for a Rundeck server. A configuration is read once
//! when the client is built and never changes afterwards.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Highest API version this client speaks
pub const MAX_API_VERSION: u32 = 11;

/// Default Rundeck server port
pub const DEFAULT_PORT: u16 = 4440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Port implied by the scheme when none is written in the URL
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(ClientError::InvalidConfig(format!(
                "protocol must be http or https, got {}",
                other
            ))),
        }
    }
}

/// How the client authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// API token sent with every request
    Token(String),
    /// Form login establishing a session cookie
    Password { username: String, password: String },
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => f.write_str("Token(***)"),
            Auth::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name
    pub server: String,

    pub protocol: Protocol,

    pub port: u16,

    /// URL prefix when Rundeck is served below the site root (e.g. "rundeck")
    pub base_path: Option<String>,

    pub auth: Option<Auth>,

    /// API version requests are made with
    pub api_version: u32,

    /// Verify the server's TLS certificate
    pub verify_cert: bool,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            protocol: Protocol::Http,
            port: DEFAULT_PORT,
            base_path: None,
            auth: None,
            api_version: MAX_API_VERSION,
            verify_cert: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(server: impl Into<String>, auth: Auth) -> Self {
        Self {
            server: server.into(),
            auth: Some(auth),
            ..Self::default()
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RUNDECK_SERVER (optional, default: localhost)
    /// - RUNDECK_PORT (optional, default: 4440)
    /// - RUNDECK_PROTOCOL (optional, http or https, default: http)
    /// - RUNDECK_BASE_PATH (optional)
    /// - RUNDECK_API_TOKEN, or RUNDECK_USR and RUNDECK_PWD
    /// - RUNDECK_API_VERSION (optional, default: 11)
    /// - RUNDECK_VERIFY_CERT (optional, default: true)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let protocol = var("RUNDECK_PROTOCOL")
            .map(|p| p.parse::<Protocol>())
            .transpose()?
            .unwrap_or(defaults.protocol);

        let port = match var("RUNDECK_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ClientError::InvalidConfig(format!("invalid port: {}", port)))?,
            None => defaults.port,
        };

        let api_version = match var("RUNDECK_API_VERSION") {
            Some(version) => version.parse::<u32>().map_err(|_| {
                ClientError::InvalidConfig(format!("invalid API version: {}", version))
            })?,
            None => defaults.api_version,
        };

        let verify_cert = var("RUNDECK_VERIFY_CERT")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(defaults.verify_cert);

        let auth = match (var("RUNDECK_API_TOKEN"), var("RUNDECK_USR"), var("RUNDECK_PWD")) {
            (Some(token), _, _) => Some(Auth::Token(token)),
            (None, Some(username), Some(password)) => Some(Auth::Password { username, password }),
            _ => None,
        };

        Ok(Self {
            server: var("RUNDECK_SERVER").unwrap_or(defaults.server),
            protocol,
            port,
            base_path: var("RUNDECK_BASE_PATH"),
            auth,
            api_version,
            verify_cert,
            request_timeout: defaults.request_timeout,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(ClientError::InvalidConfig("server cannot be empty".to_string()));
        }

        if !(1..=MAX_API_VERSION).contains(&self.api_version) {
            return Err(ClientError::InvalidConfig(format!(
                "api_version must be between 1 and {}, got {}",
                MAX_API_VERSION, self.api_version
            )));
        }

        match &self.auth {
            None => Err(ClientError::InvalidConfig(
                "an API token or a username and password are required".to_string(),
            )),
            Some(Auth::Token(token)) if token.is_empty() => {
                Err(ClientError::InvalidConfig("API token cannot be empty".to_string()))
            }
            Some(Auth::Password { username, password })
                if username.is_empty() || password.is_empty() =>
            {
                Err(ClientError::InvalidConfig(
                    "username and password cannot be empty".to_string(),
                ))
            }
            Some(_) => Ok(()),
        }
    }

    /// Server root URL, e.g. `https://rundeck.example.com/rundeck`
    pub fn base_url(&self) -> String {
        let mut url = format!("{}://{}", self.protocol, self.server);
        if self.port != self.protocol.default_port() {
            url.push_str(&format!(":{}", self.port));
        }
        if let Some(path) = self.base_path.as_deref().map(|p| p.trim_matches('/')) {
            if !path.is_empty() {
                url.push('/');
                url.push_str(path);
            }
        }
        url
    }

    /// Versioned API root, e.g. `http://localhost:4440/api/11`
    pub fn api_root(&self) -> String {
        format!("{}/api/{}", self.base_url(), self.api_version)
    }

    /// Full URL of an API path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root(), path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn token_config() -> ClientConfig {
        ClientConfig::new("rundeck.local", Auth::Token("secret".to_string()))
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = token_config();
        assert_eq!(config.protocol, Protocol::Http);
        assert_eq!(config.port, 4440);
        assert_eq!(config.api_version, 11);
        assert!(config.verify_cert);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_includes_non_default_port() {
        let config = token_config();
        assert_eq!(config.base_url(), "http://rundeck.local:4440");
        assert_eq!(config.api_url("jobs"), "http://rundeck.local:4440/api/11/jobs");
        assert_eq!(config.api_url("/system/info"), "http://rundeck.local:4440/api/11/system/info");
    }

    #[test]
    fn test_base_url_omits_default_port() {
        let mut config = token_config();
        config.protocol = Protocol::Https;
        config.port = 443;
        config.base_path = Some("/rundeck/".to_string());
        assert_eq!(config.base_url(), "https://rundeck.local/rundeck");

        config.protocol = Protocol::Http;
        config.port = 80;
        config.base_path = None;
        assert_eq!(config.base_url(), "http://rundeck.local");
    }

    #[test]
    fn test_validate_api_version_range() {
        let mut config = token_config();
        config.api_version = 0;
        assert!(config.validate().is_err());
        config.api_version = 12;
        assert!(config.validate().is_err());
        config.api_version = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_auth() {
        let mut config = token_config();
        config.auth = None;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));

        config.auth = Some(Auth::Password {
            username: "admin".to_string(),
            password: String::new(),
        });
        assert!(config.validate().is_err());

        config.server = String::new();
        config.auth = Some(Auth::Token("t".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("RUNDECK_SERVER", "ops.example.com"),
            ("RUNDECK_PROTOCOL", "HTTPS"),
            ("RUNDECK_PORT", "8443"),
            ("RUNDECK_USR", "admin"),
            ("RUNDECK_PWD", "hunter2"),
            ("RUNDECK_API_VERSION", "5"),
            ("RUNDECK_VERIFY_CERT", "false"),
        ]))
        .unwrap();

        assert_eq!(config.base_url(), "https://ops.example.com:8443");
        assert_eq!(config.api_version, 5);
        assert!(!config.verify_cert);
        assert_eq!(
            config.auth,
            Some(Auth::Password {
                username: "admin".to_string(),
                password: "hunter2".to_string()
            })
        );
    }

    #[test]
    fn test_from_lookup_prefers_token_and_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("RUNDECK_API_TOKEN", "abc"),
            ("RUNDECK_USR", "admin"),
        ]))
        .unwrap();
        assert_eq!(config.server, "localhost");
        assert_eq!(config.auth, Some(Auth::Token("abc".to_string())));
        assert_eq!(config.api_version, MAX_API_VERSION);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[("RUNDECK_PROTOCOL", "ftp")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("RUNDECK_PORT", "http")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("RUNDECK_API_VERSION", "v11")])).is_err());
    }

    #[test]
    fn test_auth_debug_hides_secrets() {
        let token = format!("{:?}", Auth::Token("secret".to_string()));
        assert!(!token.contains("secret"));

        let password = format!(
            "{:?}",
            Auth::Password {
                username: "admin".to_string(),
                password: "hunter2".to_string()
            }
        );
        assert!(password.contains("admin"));
        assert!(!password.contains("hunter2"));
    }
}
