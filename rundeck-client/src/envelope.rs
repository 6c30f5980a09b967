//! Response envelope
//!
//! Every XML API response is wrapped in a root element that carries a success
//! or error marker, an optional message and the server's API version. The
//! envelope parses that wrapper once and memoizes the derived properties.

use std::sync::OnceLock;

use crate::error::{ClientError, Result};
use crate::xml::Element;

const SUCCESS: &str = "success";
const ERROR: &str = "error";

/// A parsed API response
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    body: String,
    root: Element,
    client_api_version: u32,
    http_status: Option<u16>,
    api_version: OnceLock<Option<u32>>,
    success: OnceLock<bool>,
    message: OnceLock<String>,
}

impl ResponseEnvelope {
    /// Parse a response body
    ///
    /// Fails with [`ClientError::MalformedResponse`] when the body is not
    /// well-formed XML.
    pub fn parse(body: &str, client_api_version: u32) -> Result<Self> {
        let root = Element::parse(body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(Self {
            body: body.to_string(),
            root,
            client_api_version,
            http_status: None,
            api_version: OnceLock::new(),
            success: OnceLock::new(),
            message: OnceLock::new(),
        })
    }

    /// Record the HTTP status the envelope arrived with
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Raw response text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Root element of the response
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// API version the client was configured with when the request was made
    pub fn client_api_version(&self) -> u32 {
        self.client_api_version
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// API version reported by the server, if any
    pub fn api_version(&self) -> Option<u32> {
        *self.api_version.get_or_init(|| {
            self.root
                .attr("apiversion")
                .and_then(|v| v.trim().parse().ok())
        })
    }

    /// Whether the root carries the success marker
    pub fn success(&self) -> bool {
        *self
            .success
            .get_or_init(|| self.root.attr(SUCCESS).is_some())
    }

    /// Whether the root carries an error marker or an `<error>` block
    ///
    /// Unlike `!success()`, a bare document with neither marker is not an
    /// error reply.
    pub fn is_error_reply(&self) -> bool {
        !self.success() && (self.root.attr(ERROR).is_some() || self.root.find(ERROR).is_some())
    }

    /// Message from the success or error block
    ///
    /// Falls back to the marker name itself when the block is absent, and to an
    /// empty string when the block has no message text.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| {
            let term = if self.success() { SUCCESS } else { ERROR };
            match self.root.find(term) {
                Some(block) => block.child_text("message").unwrap_or_default().to_string(),
                None => term.to_string(),
            }
        })
    }

    /// Return the envelope unchanged on success, or a remote error carrying it
    pub fn raise_for_error(self) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(ClientError::RemoteOperation {
            message: self.message().to_string(),
            envelope: Box::new(self),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_message() {
        let env = ResponseEnvelope::parse(
            r#"<result success="true" apiversion="11"><success><message>Job was successfully deleted</message></success></result>"#,
            11,
        )
        .unwrap();

        assert!(env.success());
        assert_eq!(env.api_version(), Some(11));
        assert_eq!(env.message(), "Job was successfully deleted");
        assert_eq!(env.client_api_version(), 11);
        assert!(env.raise_for_error().is_ok());
    }

    #[test]
    fn test_success_without_block_uses_term() {
        let env = ResponseEnvelope::parse(r#"<result success="true"><jobs count="0"/></result>"#, 5)
            .unwrap();
        assert!(env.success());
        assert_eq!(env.message(), "success");
        assert_eq!(env.api_version(), None);
    }

    #[test]
    fn test_error_envelope() {
        let env = ResponseEnvelope::parse(
            r#"<result error="true" apiversion="11"><error code="api.error.item.doesnotexist"><message>Job ID does not exist: x</message></error></result>"#,
            11,
        )
        .unwrap()
        .with_http_status(404);

        assert!(!env.success());
        assert_eq!(env.message(), "Job ID does not exist: x");

        let err = env.raise_for_error().unwrap_err();
        assert!(err.is_remote());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_error_reply_detection() {
        let env = ResponseEnvelope::parse(r#"<result error="true"/>"#, 11).unwrap();
        assert!(env.is_error_reply());

        let env = ResponseEnvelope::parse(
            "<result><error><message>boom</message></error></result>",
            11,
        )
        .unwrap();
        assert!(env.is_error_reply());

        let env = ResponseEnvelope::parse(r#"<project><node name="n"/></project>"#, 11).unwrap();
        assert!(!env.success());
        assert!(!env.is_error_reply());

        let env = ResponseEnvelope::parse(r#"<result success="true"/>"#, 11).unwrap();
        assert!(!env.is_error_reply());
    }

    #[test]
    fn test_error_without_block_uses_term() {
        let env = ResponseEnvelope::parse("<result/>", 11).unwrap();
        assert!(!env.success());
        assert_eq!(env.message(), "error");
    }

    #[test]
    fn test_block_without_message_is_empty() {
        let env = ResponseEnvelope::parse(r#"<result success="true"><success/></result>"#, 11)
            .unwrap();
        assert_eq!(env.message(), "");
    }

    #[test]
    fn test_unparseable_api_version_is_absent() {
        let env = ResponseEnvelope::parse(r#"<result success="true" apiversion="eleven"/>"#, 11)
            .unwrap();
        assert_eq!(env.api_version(), None);
    }

    #[test]
    fn test_malformed_body() {
        let err = ResponseEnvelope::parse("not xml at all", 11).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));

        let err = ResponseEnvelope::parse("", 11).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn test_properties_are_stable() {
        let env = ResponseEnvelope::parse(r#"<result success="true" apiversion="9"/>"#, 11).unwrap();
        assert_eq!(env.success(), env.success());
        assert_eq!(env.message(), env.message());
        assert_eq!(env.api_version(), env.api_version());
    }
}
