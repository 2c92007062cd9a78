//! Error types for sns-report.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single structural problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// One or more required parameters are absent.
    #[error("missing required parameter(s): {}", .0.join(", "))]
    MissingRequiredParameter(Vec<&'static str>),

    /// A value of the wrong type was assigned to a known parameter.
    #[error("parameter `{name}` must be a {expected}, got {found}")]
    InvalidParameterType {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// `body_template` points at a file that does not exist.
    #[error("body template not found: {}", .0.display())]
    TemplateFileNotFound(PathBuf),
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailed {
    violations: Vec<Violation>,
}

impl ValidationFailed {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[cfg(test)]
impl ValidationFailed {
    /// Names reported as missing, across all violations.
    pub fn missing(&self) -> Vec<&'static str> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                Violation::MissingRequiredParameter(names) => Some(names.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn has_missing_template(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::TemplateFileNotFound(_)))
    }

    pub fn has_invalid_type(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::InvalidParameterType { .. }))
    }
}

impl fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationFailed {}

impl From<Violation> for ValidationFailed {
    fn from(violation: Violation) -> Self {
        Self::new(vec![violation])
    }
}

/// Main error type for sns-report.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Configuration rejected before use
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailed),

    /// Template engine failure
    #[error("Template error in {source_name}: {message}")]
    TemplateRender {
        source_name: String,
        message: String,
    },

    /// Publish call failed
    #[error("Publish to {topic_arn} failed: {message}")]
    Transport { topic_arn: String, message: String },
}

impl NotifyError {
    pub(crate) fn render(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateRender {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<Violation> for NotifyError {
    fn from(violation: Violation) -> Self {
        Self::Validation(violation.into())
    }
}
