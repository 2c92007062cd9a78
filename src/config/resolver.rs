//! Fills configuration gaps from the execution host.

use std::collections::HashMap;

use tracing::debug;

use super::schema::Param;
use super::store::ParameterStore;
use crate::domain::{Diagnostics, ExecutionContext};

/// Supplies auto-detected values for parameters not set explicitly.
pub trait EnvironmentProbe: Send + Sync {
    fn resolve(&self, param: Param, context: &ExecutionContext) -> Option<String>;
}

/// Probe backed by node attributes and the process environment.
pub struct HostProbe {
    env: HashMap<String, String>,
}

impl HostProbe {
    /// Probe reading the current process environment.
    pub fn from_env() -> Self {
        Self::with_env(std::env::vars().collect())
    }

    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self { env }
    }

    fn env_var(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.env.get(*name))
            .find(|value| !value.is_empty())
            .cloned()
    }
}

impl EnvironmentProbe for HostProbe {
    fn resolve(&self, param: Param, context: &ExecutionContext) -> Option<String> {
        match param {
            Param::Region => context
                .attribute_str("ec2.placement_availability_zone")
                .and_then(|az| region_from_zone(&az))
                .or_else(|| self.env_var(&["AWS_REGION", "AWS_DEFAULT_REGION"])),
            Param::AccessKey => self.env_var(&["AWS_ACCESS_KEY_ID"]),
            Param::SecretKey => self.env_var(&["AWS_SECRET_ACCESS_KEY"]),
            Param::Token => self.env_var(&["AWS_SESSION_TOKEN"]),
            _ => None,
        }
    }
}

/// Parent region of an availability zone.
///
/// `eu-west-1a` -> `eu-west-1`, `us-gov-west-1b` -> `us-gov-west-1`, and
/// Local Zones such as `us-west-2-lax-1a` -> `us-west-2`. The region ends at
/// the first all-digit segment.
pub fn region_from_zone(zone: &str) -> Option<String> {
    let zone = zone.trim();
    let mut chars = zone.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(digit)) if letter.is_ascii_lowercase() && digit.is_ascii_digit() => {}
        _ => return None,
    }

    let mut region = Vec::new();
    for segment in zone[..zone.len() - 1].split('-') {
        region.push(segment);
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            return (region.len() > 1).then(|| region.join("-"));
        }
    }
    None
}

/// Merges explicit configuration with probed values.
pub struct ConfigResolver<'a> {
    probe: &'a dyn EnvironmentProbe,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(probe: &'a dyn EnvironmentProbe, diagnostics: &'a dyn Diagnostics) -> Self {
        Self { probe, diagnostics }
    }

    /// Return a copy of `explicit` with probed values added.
    ///
    /// Explicit values always win. The probe is asked at most once per parameter.
    pub fn resolve(&self, explicit: &ParameterStore, context: &ExecutionContext) -> ParameterStore {
        let mut resolved = explicit.clone();

        for param in Param::PROBED {
            if explicit.contains(param) {
                continue;
            }
            match self.probe.resolve(param, context) {
                Some(value) => {
                    debug!("Resolved {} from environment", param);
                    resolved.set_text(param, value);
                }
                None if param.required() => {
                    self.diagnostics
                        .warn(&format!("No value found for required parameter '{}'", param));
                }
                None => {}
            }
        }

        resolved
    }
}
