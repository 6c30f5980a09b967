//! Project, resource and history endpoints

use std::collections::BTreeMap;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use rundeck_core::domain::event::Event as HistoryEvent;
use rundeck_core::domain::node::Node;
use rundeck_core::domain::project::Project;
use rundeck_core::domain::results::SuccessMessage;
use rundeck_core::dto::filter::NodeFilter;
use rundeck_core::dto::history::HistoryQuery;
use rundeck_core::dto::job::DocumentFormat;
use tracing::{info, warn};

use crate::RundeckClient;
use crate::error::{ClientError, Result};
use crate::node_xml::{emit, into_string, serialize_nodes};
use crate::transform;
use crate::transport::{ApiRequest, RequestBody};

impl RundeckClient {
    // =============================================================================
    // Projects
    // =============================================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let envelope = self.request_checked(ApiRequest::get("projects")).await?;
        transform::projects(&envelope)
    }

    pub async fn get_project(&self, project: &str) -> Result<Project> {
        let envelope = self
            .request_checked(ApiRequest::get(format!("project/{}", project)))
            .await?;
        transform::project(&envelope)
    }

    /// Create a project with the given configuration properties (API version 11)
    pub async fn create_project(
        &self,
        project: &str,
        config: &BTreeMap<String, String>,
    ) -> Result<Project> {
        self.require_version(11)?;

        let document = project_document(project, config)?;
        let request = ApiRequest::post("projects").with_body(RequestBody::Xml(document));
        let envelope = self.request_checked(request).await?;
        let created = transform::project(&envelope)?;

        info!("Created project {}", created.name);
        Ok(created)
    }

    // =============================================================================
    // Node Resources
    // =============================================================================

    /// Nodes in a project's resource model (API version 2)
    ///
    /// The resource document carries no success marker, so only an explicit
    /// error reply is raised.
    pub async fn list_project_resources(
        &self,
        project: &str,
        filter: &NodeFilter,
    ) -> Result<Vec<Node>> {
        self.require_version(2)?;

        let mut params = vec![("format".to_string(), DocumentFormat::Xml.to_string())];
        filter.append_params(&mut params);
        let request =
            ApiRequest::get(format!("project/{}/resources", project)).with_query(params);

        let envelope = self.request(request).await?;
        transform::project_resources(&envelope)
    }

    /// A project's resource model as raw text in the requested format
    pub async fn export_project_resources(
        &self,
        project: &str,
        format: DocumentFormat,
        filter: &NodeFilter,
    ) -> Result<String> {
        self.require_version(2)?;

        let mut params = vec![("format".to_string(), format.to_string())];
        filter.append_params(&mut params);
        self.request_text(
            ApiRequest::get(format!("project/{}/resources", project)).with_query(params),
        )
        .await
    }

    /// Replace a project's resource model with the given nodes
    pub async fn update_project_resources(
        &self,
        project: &str,
        nodes: &[Node],
    ) -> Result<SuccessMessage> {
        if nodes.is_empty() {
            return Err(ClientError::InvalidRequest(
                "No valid nodes provided".to_string(),
            ));
        }

        let document = serialize_nodes(nodes)?;
        let request = ApiRequest::post(format!("project/{}/resources", project))
            .with_body(RequestBody::Xml(document));
        let envelope = self.request_checked(request).await?;

        info!("Updated {} node(s) in project {}", nodes.len(), project);
        Ok(transform::success_message(&envelope))
    }

    /// Refresh a project's resources from its provider URL, or from `provider_url` (API version 2)
    pub async fn refresh_project_resources(
        &self,
        project: &str,
        provider_url: Option<&str>,
    ) -> Result<SuccessMessage> {
        self.require_version(2)?;

        let fields = provider_url
            .map(|url| vec![("providerURL".to_string(), url.to_string())])
            .unwrap_or_default();
        let request = ApiRequest::post(format!("project/{}/resources/refresh", project))
            .with_body(RequestBody::Form(fields));
        let envelope = self.request_checked(request).await?;

        let message = transform::success_message(&envelope);
        if message.message.is_empty() {
            warn!("Resource refresh for {} returned no message", project);
        }
        Ok(message)
    }

    // =============================================================================
    // History
    // =============================================================================

    /// A project's history events (API version 4)
    pub async fn project_history(
        &self,
        project: &str,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryEvent>> {
        self.require_version(4)?;

        let mut params = vec![("project".to_string(), project.to_string())];
        params.extend(query.to_params());
        let envelope = self
            .request_checked(ApiRequest::get("history").with_query(params))
            .await?;
        transform::events(&envelope)
    }
}

/// `<project><name/><config><property key value/>...</config></project>`
fn project_document(name: &str, config: &BTreeMap<String, String>) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    emit(&mut writer, Event::Start(BytesStart::new("project")))?;

    emit(&mut writer, Event::Start(BytesStart::new("name")))?;
    emit(&mut writer, Event::Text(BytesText::new(name)))?;
    emit(&mut writer, Event::End(BytesEnd::new("name")))?;

    if !config.is_empty() {
        emit(&mut writer, Event::Start(BytesStart::new("config")))?;
        for (key, value) in config {
            let mut property = BytesStart::new("property");
            property.push_attribute(("key", key.as_str()));
            property.push_attribute(("value", value.as_str()));
            emit(&mut writer, Event::Empty(property))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("config")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("project")))?;
    into_string(writer)
}
