//! Core domain types for run context and outgoing messages.

use serde::Deserialize;
use serde_json::Value;

/// Name of the configuration engine reported in default subjects.
pub const ENGINE_NAME: &str = "Chef";

/// How the configuration run was driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Unattended run against a configuration server
    #[default]
    Client,
    /// Local standalone run
    Solo,
}

impl RunMode {
    /// Label used in subjects and templates.
    pub fn label(self) -> &'static str {
        match self {
            RunMode::Client => "Client",
            RunMode::Solo => "Solo",
        }
    }
}

/// Read-only snapshot of one configuration run.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionContext {
    /// Node the run executed on
    pub node_name: String,

    /// Whether the run succeeded
    #[serde(default = "default_success")]
    pub success: bool,

    /// Execution mode
    #[serde(default)]
    pub mode: RunMode,

    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: Option<f64>,

    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    /// Formatted exception, present on failed runs
    #[serde(default)]
    pub exception: Option<String>,

    #[serde(default)]
    pub backtrace: Vec<String>,

    /// Node attribute tree (e.g. `opsworks.activity`, `ec2.instance_id`)
    #[serde(default = "empty_attributes")]
    pub attributes: Value,
}

fn default_success() -> bool {
    true
}

fn empty_attributes() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ExecutionContext {
    /// Create a context for a node with default values.
    #[cfg(test)]
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            success: true,
            mode: RunMode::Client,
            elapsed_time: None,
            start_time: None,
            end_time: None,
            exception: None,
            backtrace: Vec::new(),
            attributes: empty_attributes(),
        }
    }

    /// Parse a context from its JSON representation.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// `success` or `failure`.
    pub fn outcome(&self) -> &'static str {
        if self.success {
            "success"
        } else {
            "failure"
        }
    }

    /// Look up a nested attribute by dotted path.
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.attributes, |node, key| node.get(key))
    }

    /// Look up a nested attribute and render scalars as text.
    pub fn attribute_str(&self, path: &str) -> Option<String> {
        self.attribute(path).and_then(scalar_to_string)
    }
}

/// Render a JSON scalar as plain text; `None` for null, arrays and objects.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A built notification, consumed by the publish step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

/// Credentials handed to the transport for a single publish.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub token: Option<String>,
    pub region: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .finish()
    }
}
