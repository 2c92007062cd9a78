//! Fixed schema of recognized notification parameters.

use std::fmt;

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Plain string
    Text,
    /// String holding a filesystem path
    Path,
    /// Sequence of strings
    TextList,
}

impl ParamKind {
    /// Human-readable type name used in violations.
    pub fn expected(self) -> &'static str {
        match self {
            ParamKind::Text => "string",
            ParamKind::Path => "string (path)",
            ParamKind::TextList => "string or array of strings",
        }
    }
}

/// A recognized parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    AccessKey,
    SecretKey,
    Region,
    Token,
    TopicArn,
    Subject,
    BodyTemplate,
    FilterOpsworksActivity,
}

impl Param {
    pub const ALL: [Param; 8] = [
        Param::AccessKey,
        Param::SecretKey,
        Param::Region,
        Param::Token,
        Param::TopicArn,
        Param::Subject,
        Param::BodyTemplate,
        Param::FilterOpsworksActivity,
    ];

    /// Parameters the environment probe may fill in, in resolution order.
    pub const PROBED: [Param; 4] = [
        Param::Region,
        Param::AccessKey,
        Param::SecretKey,
        Param::Token,
    ];

    /// Configuration key for this parameter.
    pub fn name(self) -> &'static str {
        match self {
            Param::AccessKey => "access_key",
            Param::SecretKey => "secret_key",
            Param::Region => "region",
            Param::Token => "token",
            Param::TopicArn => "topic_arn",
            Param::Subject => "subject",
            Param::BodyTemplate => "body_template",
            Param::FilterOpsworksActivity => "filter_opsworks_activity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn kind(self) -> ParamKind {
        match self {
            Param::BodyTemplate => ParamKind::Path,
            Param::FilterOpsworksActivity => ParamKind::TextList,
            _ => ParamKind::Text,
        }
    }

    pub fn required(self) -> bool {
        matches!(self, Param::AccessKey | Param::SecretKey | Param::TopicArn)
    }

    /// Secret values are never echoed back in logs or rendered output.
    pub fn is_secret(self) -> bool {
        matches!(self, Param::SecretKey | Param::Token)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
