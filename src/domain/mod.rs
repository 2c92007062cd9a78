//! Domain layer containing core business logic.
//!
//! This module contains:
//! - Execution context and notification message types
//! - Message builder and template engine
//! - Activity filter
//! - Error types, diagnostics and logger

mod activity_filter;
mod builder;
pub mod diagnostics;
mod error;
pub mod logger;
mod template;
mod types;

pub use activity_filter::ActivityFilter;
pub use builder::NotificationBuilder;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{NotifyError, ValidationFailed, Violation};
pub use template::{PlaceholderEngine, TemplateEngine};
pub use types::{Credentials, ExecutionContext, NotificationMessage};
