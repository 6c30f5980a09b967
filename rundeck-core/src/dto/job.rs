//! Job request options

use serde::{Deserialize, Serialize};

use super::filter::NodeFilter;
use super::{Params, push_joined, push_opt};

/// Arguments passed to a job or script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgString {
    /// Sent as-is
    Raw(String),
    /// Rendered as `-name value` pairs separated by spaces
    Pairs(Vec<(String, String)>),
}

impl ArgString {
    pub fn render(&self) -> String {
        match self {
            ArgString::Raw(raw) => raw.clone(),
            ArgString::Pairs(pairs) => pairs
                .iter()
                .map(|(name, value)| format!("-{} {}", name, value))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<&str> for ArgString {
    fn from(raw: &str) -> Self {
        ArgString::Raw(raw.to_string())
    }
}

impl From<String> for ArgString {
    fn from(raw: String) -> Self {
        ArgString::Raw(raw)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ArgString {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ArgString::Pairs(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Log verbosity of a job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Verbose,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(level)
    }
}

/// Options for running a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunJobOptions {
    pub arg_string: Option<ArgString>,
    pub log_level: Option<LogLevel>,
    /// Run as another user (requires runAs permission)
    pub as_user: Option<String>,
    pub node_filter: NodeFilter,
}

impl RunJobOptions {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(arg_string) = &self.arg_string {
            params.push(("argString".to_string(), arg_string.render()));
        }
        push_opt(&mut params, "loglevel", self.log_level.as_ref());
        push_opt(&mut params, "asUser", self.as_user.as_ref());
        self.node_filter.append_params(&mut params);
        params
    }
}

/// Filters for listing or exporting jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    /// Job IDs to include
    pub idlist: Vec<String>,
    /// Group path prefix, `*` for all groups or `-` for top level only
    pub group_path: Option<String>,
    /// Substring match on the job name
    pub job_filter: Option<String>,
    /// Exact job name
    pub job_exact_filter: Option<String>,
    /// Exact group path, or `-` for top level only
    pub group_path_exact: Option<String>,
}

impl JobQuery {
    /// Matches a job by its exact name
    pub fn exact_name(name: impl Into<String>) -> Self {
        Self {
            job_exact_filter: Some(name.into()),
            ..Default::default()
        }
    }

    /// Lowest API version able to serve this query
    pub fn required_version(&self) -> u32 {
        if self.job_exact_filter.is_some() || self.group_path_exact.is_some() {
            2
        } else {
            1
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_joined(&mut params, "idlist", &self.idlist);
        push_opt(&mut params, "groupPath", self.group_path.as_ref());
        push_opt(&mut params, "jobFilter", self.job_filter.as_ref());
        push_opt(&mut params, "jobExactFilter", self.job_exact_filter.as_ref());
        push_opt(&mut params, "groupPathExact", self.group_path_exact.as_ref());
        params
    }
}

/// Format of job definition and resource model documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Xml,
    Yaml,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Xml => "xml",
            DocumentFormat::Yaml => "yaml",
        }
    }

    /// Derives the format from a file extension, case-insensitively
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "xml" => Some(DocumentFormat::Xml),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an imported job already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DupeOption {
    Skip,
    Create,
    Update,
}

impl std::fmt::Display for DupeOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DupeOption::Skip => "skip",
            DupeOption::Create => "create",
            DupeOption::Update => "update",
        })
    }
}

/// Whether imported jobs keep their UUIDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UuidOption {
    Preserve,
    Remove,
}

impl std::fmt::Display for UuidOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UuidOption::Preserve => "preserve",
            UuidOption::Remove => "remove",
        })
    }
}

/// Options for importing job definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Definition format; the server assumes XML when unset
    pub format: Option<DocumentFormat>,
    pub dupe_option: Option<DupeOption>,
    /// Project all definitions are imported into; otherwise each definition names its own
    pub project: Option<String>,
    pub uuid_option: Option<UuidOption>,
}

impl ImportOptions {
    /// Form fields, excluding the definition document itself
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_opt(&mut params, "format", self.format.as_ref());
        push_opt(&mut params, "dupeOption", self.dupe_option.as_ref());
        push_opt(&mut params, "project", self.project.as_ref());
        push_opt(&mut params, "uuidOption", self.uuid_option.as_ref());
        params
    }
}
