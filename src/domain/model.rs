use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Raw configuration bytes exactly as retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    pub bytes: Vec<u8>,
    pub source_description: String,
    pub http_status: Option<u16>,
    pub byte_count: usize,
}

impl RawPayload {
    pub fn new(bytes: Vec<u8>, source_description: String, http_status: Option<u16>) -> Self {
        let byte_count = bytes.len();
        Self {
            bytes,
            source_description,
            http_status,
            byte_count,
        }
    }
}

/// Declared language of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialect {
    Json,
    Yaml,
    Unsupported(String),
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Json => write!(f, "JSON"),
            Dialect::Yaml => write!(f, "YAML"),
            Dialect::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

/// Where the payload came from; decides which format problems are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Fetch,
    File,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(String),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) | Scalar::Number(s) => write!(f, "{}", s),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Parsed configuration tree, independent of the source language.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Mapping(BTreeMap<String, Document>),
    Sequence(Vec<Document>),
    Scalar(Scalar),
    Null,
}

impl Document {
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Mapping(map) => map.get(key),
            Document::Sequence(_) | Document::Scalar(_) | Document::Null => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Document::Mapping(map) => Some(map),
            Document::Sequence(_) | Document::Scalar(_) | Document::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(Scalar::String(s)) => Some(s),
            Document::Scalar(_) | Document::Mapping(_) | Document::Sequence(_) | Document::Null => {
                None
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Document::Mapping(_) => "mapping",
            Document::Sequence(_) => "sequence",
            Document::Scalar(Scalar::String(_)) => "string",
            Document::Scalar(Scalar::Number(_)) => "number",
            Document::Scalar(Scalar::Bool(_)) => "bool",
            Document::Null => "null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Empty,
    NonParseable,
    ParsedNonObject,
    MissingHttp,
    Unsupported,
    ParsedObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    pub name: String,
    pub rule: String,
    pub service_ref: Option<String>,
    pub tls_domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Service {
    pub name: String,
}

/// Routers and the services they may point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingModel {
    pub routers: Vec<Router>,
    pub services: Vec<Service>,
}

impl RoutingModel {
    pub fn service_names(&self) -> BTreeSet<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn token(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    MissingService,
    TlsDomainCoverage,
    ParseError,
    UnexpectedShape,
    MissingRoutingSection,
    UnsupportedFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: FindingCategory,
    pub message: String,
    pub related_router: Option<String>,
}

impl Finding {
    pub fn critical(
        category: FindingCategory,
        message: impl Into<String>,
        related_router: Option<String>,
    ) -> Self {
        Self {
            severity: Severity::Critical,
            category,
            message: message.into(),
            related_router,
        }
    }

    pub fn warning(
        category: FindingCategory,
        message: impl Into<String>,
        related_router: Option<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            message: message.into(),
            related_router,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub router_count: usize,
    pub service_count: usize,
}

impl ValidationReport {
    pub fn aggregate(findings: Vec<Finding>, router_count: usize, service_count: usize) -> Self {
        Self {
            findings,
            router_count,
            service_count,
        }
    }

    pub fn critical_count(&self) -> usize {
        self.count(Severity::Critical)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_critical(&self) -> bool {
        self.critical_count() > 0
    }

    /// 0 unless at least one critical finding exists; warnings never fail a run.
    pub fn exit_code(&self) -> i32 {
        if self.has_critical() {
            1
        } else {
            0
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// A finished report together with the metadata of the payload it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub source: String,
    pub http_status: Option<u16>,
    pub byte_count: usize,
    pub format: FormatKind,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
