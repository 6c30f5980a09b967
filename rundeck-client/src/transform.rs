//! Transform registry
//!
//! Each response kind has one pure transform from a parsed envelope to its
//! normalized value. The typed functions are public for callers that know the
//! kind statically; [`apply`] dispatches by [`ResponseKind`] through a table
//! that is built once and never modified.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use rundeck_core::domain::event::Event;
use rundeck_core::domain::execution::{Execution, ExecutionStatus};
use rundeck_core::domain::job::Job;
use rundeck_core::domain::node::Node;
use rundeck_core::domain::project::Project;
use rundeck_core::domain::results::{
    AbortResult, DeleteJobsResult, DeleteOutcome, ImportStatus, SuccessMessage,
};
use rundeck_core::domain::system::{SystemInfo, SystemStats};
use rundeck_core::domain::Fields;
use rundeck_core::timestamp;

use crate::envelope::ResponseEnvelope;
use crate::error::{ClientError, Result};
use crate::extract::{attributes_of, child_text_of, node_to_mapping};
use crate::node_xml;
use crate::xml::Element;

/// The closed set of response kinds the client understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    SystemInfo,
    Execution,
    Executions,
    Job,
    Jobs,
    Project,
    Projects,
    JobImportStatus,
    JobsDelete,
    ExecutionAbort,
    RunExecution,
    ProjectResources,
    SuccessMessage,
    Events,
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 14] = [
        ResponseKind::SystemInfo,
        ResponseKind::Execution,
        ResponseKind::Executions,
        ResponseKind::Job,
        ResponseKind::Jobs,
        ResponseKind::Project,
        ResponseKind::Projects,
        ResponseKind::JobImportStatus,
        ResponseKind::JobsDelete,
        ResponseKind::ExecutionAbort,
        ResponseKind::RunExecution,
        ResponseKind::ProjectResources,
        ResponseKind::SuccessMessage,
        ResponseKind::Events,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::SystemInfo => "system_info",
            ResponseKind::Execution => "execution",
            ResponseKind::Executions => "executions",
            ResponseKind::Job => "job",
            ResponseKind::Jobs => "jobs",
            ResponseKind::Project => "project",
            ResponseKind::Projects => "projects",
            ResponseKind::JobImportStatus => "job_import_status",
            ResponseKind::JobsDelete => "jobs_delete",
            ResponseKind::ExecutionAbort => "execution_abort",
            ResponseKind::RunExecution => "run_execution",
            ResponseKind::ProjectResources => "project_resources",
            ResponseKind::SuccessMessage => "success_message",
            ResponseKind::Events => "events",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        ResponseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ClientError::InvalidRequest(format!("Unknown response kind: {}", s)))
    }
}

/// Normalized value produced by a transform
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transformed {
    SystemInfo(SystemInfo),
    Execution(Execution),
    Executions(Vec<Execution>),
    Job(Job),
    Jobs(Vec<Job>),
    Project(Project),
    Projects(Vec<Project>),
    ImportStatus(ImportStatus),
    DeleteJobs(DeleteJobsResult),
    Abort(AbortResult),
    ExecutionId(u64),
    Nodes(Vec<Node>),
    SuccessMessage(SuccessMessage),
    Events(Vec<Event>),
}

pub type TransformFn = fn(&ResponseEnvelope) -> Result<Transformed>;

/// The kind-to-transform table
pub fn registry() -> &'static HashMap<ResponseKind, TransformFn> {
    static REGISTRY: OnceLock<HashMap<ResponseKind, TransformFn>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> HashMap<ResponseKind, TransformFn> {
    let entries: [(ResponseKind, TransformFn); 14] = [
        (ResponseKind::SystemInfo, |e| system_info(e).map(Transformed::SystemInfo)),
        (ResponseKind::Execution, |e| execution(e).map(Transformed::Execution)),
        (ResponseKind::Executions, |e| executions(e).map(Transformed::Executions)),
        (ResponseKind::Job, |e| job(e).map(Transformed::Job)),
        (ResponseKind::Jobs, |e| jobs(e).map(Transformed::Jobs)),
        (ResponseKind::Project, |e| project(e).map(Transformed::Project)),
        (ResponseKind::Projects, |e| projects(e).map(Transformed::Projects)),
        (ResponseKind::JobImportStatus, |e| job_import_status(e).map(Transformed::ImportStatus)),
        (ResponseKind::JobsDelete, |e| jobs_delete(e).map(Transformed::DeleteJobs)),
        (ResponseKind::ExecutionAbort, |e| execution_abort(e).map(Transformed::Abort)),
        (ResponseKind::RunExecution, |e| run_execution(e).map(Transformed::ExecutionId)),
        (ResponseKind::ProjectResources, |e| project_resources(e).map(Transformed::Nodes)),
        (ResponseKind::SuccessMessage, |e| Ok(Transformed::SuccessMessage(success_message(e)))),
        (ResponseKind::Events, |e| events(e).map(Transformed::Events)),
    ];
    entries.into_iter().collect()
}

/// Run the transform registered for `kind`
pub fn apply(kind: ResponseKind, envelope: &ResponseEnvelope) -> Result<Transformed> {
    let transform = registry()
        .get(&kind)
        .ok_or_else(|| ClientError::InvalidRequest(format!("No transform for {}", kind)))?;
    transform(envelope)
}

// ---- helpers ----

fn container<'a>(
    envelope: &'a ResponseEnvelope,
    kind: ResponseKind,
    tag: &str,
) -> Result<&'a Element> {
    envelope
        .root()
        .find(tag)
        .ok_or_else(|| ClientError::shape(kind.as_str(), tag))
}

fn required_child<'a>(parent: &'a Element, kind: ResponseKind, tag: &str) -> Result<&'a Element> {
    parent
        .find(tag)
        .ok_or_else(|| ClientError::shape(kind.as_str(), tag))
}

/// Value of a `count` attribute, when the element has one
fn declared_count(element: &Element, kind: ResponseKind) -> Result<Option<u32>> {
    element
        .attr("count")
        .map(|count| parse_number(kind, "count", count))
        .transpose()
}

fn parse_number<T: FromStr>(kind: ResponseKind, field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::invalid(kind.as_str(), field, value))
}

fn parse_time(kind: ResponseKind, field: &str, value: &str) -> Result<DateTime<Utc>> {
    timestamp::parse(value).map_err(|_| ClientError::invalid(kind.as_str(), field, value))
}

fn take(fields: &mut Fields, key: &str) -> Option<String> {
    fields.remove(key).flatten()
}

fn take_required(fields: &mut Fields, kind: ResponseKind, key: &str) -> Result<String> {
    take(fields, key).ok_or_else(|| ClientError::missing(kind.as_str(), key))
}

fn take_time(
    fields: &mut Fields,
    kind: ResponseKind,
    key: &str,
) -> Result<Option<DateTime<Utc>>> {
    take(fields, key)
        .map(|value| parse_time(kind, key, &value))
        .transpose()
}

fn first<T>(items: Vec<T>, what: &str) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::NotFound(format!("No {} in response", what)))
}

fn parse_job(element: &Element, kind: ResponseKind) -> Result<Job> {
    let mut fields = node_to_mapping(element);
    Ok(Job {
        id: take_required(&mut fields, kind, "id")?,
        name: take(&mut fields, "name"),
        group: take(&mut fields, "group"),
        project: take(&mut fields, "project"),
        description: take(&mut fields, "description"),
        extra: fields,
    })
}

fn parse_execution(element: &Element) -> Result<Execution> {
    let kind = ResponseKind::Execution;
    let mut element = element.clone();
    let job = element
        .detach("job")
        .map(|job| parse_job(&job, kind))
        .transpose()?;

    let mut fields = node_to_mapping(&element);
    let id = take_required(&mut fields, kind, "id")?;
    let status = take_required(&mut fields, kind, "status")?;

    Ok(Execution {
        id: parse_number(kind, "id", &id)?,
        status: ExecutionStatus::from(status),
        href: take(&mut fields, "href"),
        project: take(&mut fields, "project"),
        user: take(&mut fields, "user"),
        date_started: take_time(&mut fields, kind, "date-started")?,
        date_ended: take_time(&mut fields, kind, "date-ended")?,
        job,
        description: take(&mut fields, "description"),
        argstring: take(&mut fields, "argstring"),
        extra: fields,
    })
}

fn parse_project(element: &Element) -> Result<Project> {
    let kind = ResponseKind::Project;
    let mut element = element.clone();
    let resources = element.detach("resources").map(|r| child_text_of(&r));

    let mut fields = node_to_mapping(&element);
    Ok(Project {
        name: take_required(&mut fields, kind, "name")?,
        description: take(&mut fields, "description"),
        resources,
        extra: fields,
    })
}

fn parse_event(element: &Element) -> Result<Event> {
    let kind = ResponseKind::Events;
    let mut element = element.clone();
    let job = element.detach("job").map(|e| attributes_of(&e));
    let execution = element.detach("execution").map(|e| attributes_of(&e));
    let node_summary = element.detach("node-summary").map(|e| attributes_of(&e));

    let mut fields = node_to_mapping(&element);
    let date_started = take_required(&mut fields, kind, "date-started")?;
    let date_ended = take_required(&mut fields, kind, "date-ended")?;

    Ok(Event {
        title: take(&mut fields, "title"),
        status: take(&mut fields, "status"),
        summary: take(&mut fields, "summary"),
        user: take(&mut fields, "user"),
        project: take(&mut fields, "project"),
        date_started: parse_time(kind, "date-started", &date_started)?,
        date_ended: parse_time(kind, "date-ended", &date_ended)?,
        job,
        execution,
        node_summary,
        extra: fields,
    })
}

/// Items of a counted collection; `count="0"` short-circuits to empty
fn collection<T>(
    base: &Element,
    kind: ResponseKind,
    item: &str,
    parse: impl Fn(&Element) -> Result<T>,
) -> Result<Vec<T>> {
    if declared_count(base, kind)? == Some(0) {
        return Ok(Vec::new());
    }
    base.find_all(item).map(parse).collect()
}

// ---- transforms ----

pub fn system_info(envelope: &ResponseEnvelope) -> Result<SystemInfo> {
    let kind = ResponseKind::SystemInfo;
    let system = container(envelope, kind, "system")?;

    let datetime = required_child(system, kind, "timestamp")?
        .child_text("datetime")
        .ok_or_else(|| ClientError::missing(kind.as_str(), "timestamp"))?;

    let stats = required_child(system, kind, "stats")?;
    let section = |tag: &str| required_child(stats, kind, tag).map(child_text_of);

    Ok(SystemInfo {
        timestamp: parse_time(kind, "timestamp", datetime)?,
        rundeck: child_text_of(required_child(system, kind, "rundeck")?),
        os: child_text_of(required_child(system, kind, "os")?),
        jvm: child_text_of(required_child(system, kind, "jvm")?),
        stats: SystemStats {
            uptime: attributes_of(required_child(stats, kind, "uptime")?),
            cpu: section("cpu")?,
            memory: section("memory")?,
            scheduler: section("scheduler")?,
            threads: section("threads")?,
        },
    })
}

pub fn executions(envelope: &ResponseEnvelope) -> Result<Vec<Execution>> {
    let kind = ResponseKind::Executions;
    let base = container(envelope, kind, "executions")?;
    collection(base, kind, "execution", parse_execution)
}

pub fn execution(envelope: &ResponseEnvelope) -> Result<Execution> {
    first(executions(envelope)?, "execution")
}

pub fn jobs(envelope: &ResponseEnvelope) -> Result<Vec<Job>> {
    let kind = ResponseKind::Jobs;
    let base = container(envelope, kind, "jobs")?;
    collection(base, kind, "job", |e| parse_job(e, kind))
}

pub fn job(envelope: &ResponseEnvelope) -> Result<Job> {
    first(jobs(envelope)?, "job")
}

pub fn projects(envelope: &ResponseEnvelope) -> Result<Vec<Project>> {
    let kind = ResponseKind::Projects;
    let base = container(envelope, kind, "projects")?;
    collection(base, kind, "project", parse_project)
}

/// A single project, from either a `<projects>` collection or a bare `<project>`
pub fn project(envelope: &ResponseEnvelope) -> Result<Project> {
    let root = envelope.root();
    if root.find("projects").is_some() {
        return first(projects(envelope)?, "project");
    }
    match root.find("project") {
        Some(element) => parse_project(element),
        None => Err(ClientError::shape(ResponseKind::Project.as_str(), "projects")),
    }
}

pub fn job_import_status(envelope: &ResponseEnvelope) -> Result<ImportStatus> {
    let root = envelope.root();
    let group = |tag: &str| -> Vec<Fields> {
        root.find(tag)
            .map(|g| g.find_all("job").map(node_to_mapping).collect())
            .unwrap_or_default()
    };

    Ok(ImportStatus {
        succeeded: group("succeeded"),
        failed: group("failed"),
        skipped: group("skipped"),
    })
}

pub fn jobs_delete(envelope: &ResponseEnvelope) -> Result<DeleteJobsResult> {
    let kind = ResponseKind::JobsDelete;
    let base = container(envelope, kind, "deleteJobs")?;

    let outcome = |tag: &str| -> Result<Option<DeleteOutcome>> {
        let Some(group) = base.find(tag) else {
            return Ok(None);
        };
        let count = group
            .attr("count")
            .ok_or_else(|| ClientError::missing(kind.as_str(), format!("{}/count", tag)))?;
        Ok(Some(DeleteOutcome {
            count: parse_number(kind, "count", count)?,
            jobs: group.find_all("deleteJobResult").map(node_to_mapping).collect(),
        }))
    };

    let request_count = base
        .attr("requestCount")
        .ok_or_else(|| ClientError::missing(kind.as_str(), "requestCount"))?;

    Ok(DeleteJobsResult {
        request_count: parse_number(kind, "requestCount", request_count)?,
        all_successful: base.attr("allsuccessful") == Some("true"),
        succeeded: outcome("succeeded")?,
        failed: outcome("failed")?,
    })
}

pub fn execution_abort(envelope: &ResponseEnvelope) -> Result<AbortResult> {
    let kind = ResponseKind::ExecutionAbort;
    let abort = container(envelope, kind, "abort")?;
    let status = abort
        .attr("status")
        .ok_or_else(|| ClientError::missing(kind.as_str(), "status"))?;

    let execution = abort.find("execution");
    let execution_id = execution
        .and_then(|e| e.attr("id"))
        .map(|id| parse_number(kind, "execution/id", id))
        .transpose()?;

    Ok(AbortResult {
        status: status.to_string(),
        reason: abort.attr("reason").map(str::to_string),
        execution_id,
        execution_status: execution
            .and_then(|e| e.attr("status"))
            .map(ExecutionStatus::from),
    })
}

/// Id of an execution started by an adhoc run
pub fn run_execution(envelope: &ResponseEnvelope) -> Result<u64> {
    let kind = ResponseKind::RunExecution;
    let execution = container(envelope, kind, "execution")?;
    let id = execution
        .attr("id")
        .ok_or_else(|| ClientError::missing(kind.as_str(), "id"))?;
    parse_number(kind, "id", id)
}

/// Nodes from a resource document
///
/// The document is either a bare `<project>` root or an envelope wrapping one.
/// An error reply is raised rather than read as an empty node list.
pub fn project_resources(envelope: &ResponseEnvelope) -> Result<Vec<Node>> {
    if envelope.is_error_reply() {
        return Err(ClientError::RemoteOperation {
            message: envelope.message().to_string(),
            envelope: Box::new(envelope.clone()),
        });
    }

    let root = envelope.root();
    let base = if root.tag() == "project" {
        root
    } else {
        required_child(root, ResponseKind::ProjectResources, "project")?
    };
    base.find_all("node").map(node_xml::parse_node).collect()
}

pub fn success_message(envelope: &ResponseEnvelope) -> SuccessMessage {
    SuccessMessage {
        success: envelope.success(),
        message: envelope.message().to_string(),
    }
}

pub fn events(envelope: &ResponseEnvelope) -> Result<Vec<Event>> {
    let kind = ResponseKind::Events;
    let base = container(envelope, kind, "events")?;
    collection(base, kind, "event", parse_event)
}
