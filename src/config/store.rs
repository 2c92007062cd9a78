//! Typed storage for notification parameters.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use toml::Value;

use super::schema::{Param, ParamKind};
use crate::domain::{Diagnostics, ValidationFailed, Violation};

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
}

/// Named notification parameters, type-checked on assignment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParameterStore {
    values: BTreeMap<Param, ParamValue>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the `[sns]` table of the configuration file.
    ///
    /// Unknown keys are reported through `diagnostics` and skipped. Every
    /// wrongly-typed value is collected before failing.
    pub fn from_table(
        table: &toml::Table,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self, ValidationFailed> {
        let mut store = Self::new();
        let mut violations = Vec::new();

        for (key, value) in table {
            if let Err(v) = store.configure(key, value, diagnostics) {
                violations.push(v);
            }
        }

        if violations.is_empty() {
            Ok(store)
        } else {
            Err(ValidationFailed::new(violations))
        }
    }

    pub fn contains(&self, param: Param) -> bool {
        self.values.contains_key(&param)
    }

    /// Assign a raw value, rejecting it if its type does not match the schema.
    pub fn set(&mut self, param: Param, value: &Value) -> Result<(), Violation> {
        let stored = match (param.kind(), value) {
            (ParamKind::Text | ParamKind::Path, Value::String(s)) => ParamValue::Text(s.clone()),
            (ParamKind::TextList, Value::String(s)) => ParamValue::List(vec![s.clone()]),
            (ParamKind::TextList, Value::Array(items)) => {
                let list = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid_type(param, value))?;
                ParamValue::List(list)
            }
            _ => return Err(invalid_type(param, value)),
        };
        self.values.insert(param, stored);
        Ok(())
    }

    /// Assign a string value. List parameters store it as a single entry.
    pub fn set_text(&mut self, param: Param, value: impl Into<String>) {
        let value = value.into();
        let stored = match param.kind() {
            ParamKind::TextList => ParamValue::List(vec![value]),
            ParamKind::Text | ParamKind::Path => ParamValue::Text(value),
        };
        self.values.insert(param, stored);
    }

    /// Apply a `name=value` override from the command line.
    ///
    /// A comma-separated value becomes the list for list parameters.
    pub fn apply_override(&mut self, assignment: &str) -> Result<Param, String> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got '{}'", assignment))?;
        let param = Param::from_name(name.trim())
            .ok_or_else(|| format!("unknown parameter '{}'", name.trim()))?;

        match param.kind() {
            ParamKind::TextList => {
                let list = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                self.values.insert(param, ParamValue::List(list));
            }
            ParamKind::Text | ParamKind::Path => self.set_text(param, value),
        }
        Ok(param)
    }

    pub fn text(&self, param: Param) -> Option<&str> {
        match self.values.get(&param)? {
            ParamValue::Text(s) => Some(s),
            ParamValue::List(_) => None,
        }
    }

    pub fn list(&self, param: Param) -> Option<&[String]> {
        match self.values.get(&param)? {
            ParamValue::List(items) => Some(items),
            ParamValue::Text(_) => None,
        }
    }
}

fn invalid_type(param: Param, value: &Value) -> Violation {
    Violation::InvalidParameterType {
        name: param.name(),
        expected: param.kind().expected(),
        found: value.type_str(),
    }
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (param, value) in &self.values {
            if param.is_secret() {
                map.entry(&param.name(), &"<redacted>");
            } else {
                map.entry(&param.name(), value);
            }
        }
        map.finish()
    }
}

/// Typed access to notification parameters.
pub trait Configurable {
    fn params(&self) -> &ParameterStore;

    fn params_mut(&mut self) -> &mut ParameterStore;

    /// Assign a parameter by its configuration key.
    ///
    /// Unknown keys are reported and ignored.
    fn configure(
        &mut self,
        name: &str,
        value: &Value,
        diagnostics: &dyn Diagnostics,
    ) -> Result<(), Violation> {
        match Param::from_name(name) {
            Some(param) => self.params_mut().set(param, value),
            None => {
                diagnostics.warn(&format!("Ignoring unknown sns parameter '{}'", name));
                Ok(())
            }
        }
    }

    fn access_key(&self) -> Option<&str> {
        self.params().text(Param::AccessKey)
    }

    fn secret_key(&self) -> Option<&str> {
        self.params().text(Param::SecretKey)
    }

    fn region(&self) -> Option<&str> {
        self.params().text(Param::Region)
    }

    fn token(&self) -> Option<&str> {
        self.params().text(Param::Token)
    }

    fn topic_arn(&self) -> Option<&str> {
        self.params().text(Param::TopicArn)
    }

    fn subject(&self) -> Option<&str> {
        self.params().text(Param::Subject)
    }

    fn body_template(&self) -> Option<&Path> {
        self.params().text(Param::BodyTemplate).map(Path::new)
    }

    fn activity_filter(&self) -> Option<&[String]> {
        self.params().list(Param::FilterOpsworksActivity)
    }
}

impl Configurable for ParameterStore {
    fn params(&self) -> &ParameterStore {
        self
    }

    fn params_mut(&mut self) -> &mut ParameterStore {
        self
    }
}
