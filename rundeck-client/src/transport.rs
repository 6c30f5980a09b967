//! HTTP transport
//!
//! The client talks to the server through the [`Transport`] trait so that the
//! request/response plumbing can be replaced in tests. [`HttpTransport`] is the
//! reqwest-backed implementation used in production.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use rundeck_core::dto::Params;

use crate::config::{Auth, ClientConfig};
use crate::error::{ClientError, Result};

const XML_WRAPPER_HEADER: HeaderName =
    HeaderName::from_static("x-rundeck-api-xml-response-wrapper");
const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-rundeck-auth-token");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// URL-encoded form fields
    Form(Params),
    /// XML document
    Xml(String),
    /// Single text part uploaded as a file
    Multipart { field: String, content: String },
}

/// A request against the versioned API root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to `/api/{version}/`
    pub path: String,
    pub query: Params,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes API requests
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// reqwest-backed transport holding an authenticated session
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_root: String,
}

impl HttpTransport {
    /// Build the HTTP session and authenticate
    ///
    /// Token auth is sent as a header on every request; password auth performs
    /// a form login and relies on the session cookie afterwards.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(XML_WRAPPER_HEADER, HeaderValue::from_static("true"));
        if let Some(Auth::Token(token)) = &config.auth {
            let mut value = HeaderValue::from_str(token).map_err(|_| {
                ClientError::InvalidConfig("API token contains invalid characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTH_TOKEN_HEADER, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .danger_accept_invalid_certs(!config.verify_cert)
            .timeout(config.request_timeout)
            .build()?;

        let transport = Self {
            client,
            api_root: config.api_root(),
        };

        if let Some(Auth::Password { username, password }) = &config.auth {
            transport
                .login(&config.base_url(), username, password)
                .await?;
        }

        Ok(transport)
    }

    async fn login(&self, base_url: &str, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/j_security_check", base_url);
        debug!("Logging in to {} as {}", base_url, username);

        let response = self
            .client
            .post(&url)
            .form(&[("j_username", username), ("j_password", password)])
            .send()
            .await?;

        let landed = response.url().path().to_string();
        if landed.contains("/user/error")
            || landed.contains("/user/login")
            || response.status() != StatusCode::OK
        {
            return Err(ClientError::Authentication(format!(
                "login as {} was rejected",
                username
            )));
        }

        info!("Authenticated to {} as {}", base_url, username);
        Ok(())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = format!("{}/{}", self.api_root, request.path.trim_start_matches('/'));

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), &url)
            .query(&request.query);

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidRequest(format!("Invalid header name: {}", name)))?;
            builder = builder.header(name, value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Xml(document) => builder
                .header(CONTENT_TYPE, "application/xml")
                .body(document),
            RequestBody::Multipart { field, content } => {
                let part = Part::text(content).file_name(field.clone());
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
