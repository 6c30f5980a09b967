//! System information endpoint

use rundeck_core::domain::system::SystemInfo;

use crate::RundeckClient;
use crate::error::Result;
use crate::transform;
use crate::transport::ApiRequest;

impl RundeckClient {
    /// Server version, host and runtime statistics
    pub async fn system_info(&self) -> Result<SystemInfo> {
        let envelope = self.request_checked(ApiRequest::get("system/info")).await?;
        transform::system_info(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use crate::transport::testing::{ScriptedTransport, scripted};

    #[tokio::test]
    async fn test_system_info() {
        let body = r#"<result success="true" apiversion="11"><system>
            <timestamp epoch="1709287200000" unit="ms"><datetime>2024-03-01T10:00:00Z</datetime></timestamp>
            <rundeck><version>2.0.0</version><apiversion>11</apiversion></rundeck>
            <os><name>Linux</name></os>
            <jvm><version>1.7</version></jvm>
            <stats>
                <uptime duration="1000" unit="ms"/>
                <cpu><processors>2</processors></cpu>
                <memory unit="byte"><free>10</free></memory>
                <scheduler><running>1</running></scheduler>
                <threads><active>30</active></threads>
            </stats>
        </system></result>"#;
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, body), 11);

        let info = client.system_info().await.unwrap();
        assert_eq!(info.rundeck["version"].as_deref(), Some("2.0.0"));
        assert_eq!(info.stats.scheduler["running"].as_deref(), Some("1"));
        assert_eq!(transport.requests()[0].path, "system/info");
    }

    #[tokio::test]
    async fn test_system_info_missing_section() {
        let body = r#"<result success="true"><system><timestamp><datetime>2024-03-01T10:00:00Z</datetime></timestamp></system></result>"#;
        let (client, _) = scripted(ScriptedTransport::new().respond(200, body), 11);
        let err = client.system_info().await.unwrap_err();
        assert!(matches!(err, crate::ClientError::UnexpectedShape { kind: "system_info", .. }));
    }
}
