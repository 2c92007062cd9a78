//! Structural validation of notification parameters.

use tracing::debug;

use super::schema::Param;
use super::store::{Configurable, ParameterStore};
use crate::domain::{Diagnostics, ValidationFailed, Violation};

/// Checks required parameters and the body template path.
///
/// Purely local: no network access and no credential verification.
pub struct Validator<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Validator<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Validate a store, reporting every violation found.
    pub fn check(&self, store: &ParameterStore) -> Result<(), ValidationFailed> {
        let mut violations = Vec::new();

        let missing: Vec<&'static str> = Param::ALL
            .into_iter()
            .filter(|p| p.required() && !store.contains(*p))
            .map(Param::name)
            .collect();
        if !missing.is_empty() {
            violations.push(Violation::MissingRequiredParameter(missing));
        }

        if let Some(path) = store.body_template() {
            if !path.exists() {
                violations.push(Violation::TemplateFileNotFound(path.to_path_buf()));
            }
        }

        if let Some(filter) = store.activity_filter() {
            if filter.is_empty() {
                self.diagnostics
                    .warn("filter_opsworks_activity is empty; notifications will not be filtered");
            }
        }

        if violations.is_empty() {
            debug!("Configuration passed validation");
            Ok(())
        } else {
            Err(ValidationFailed::new(violations))
        }
    }
}
