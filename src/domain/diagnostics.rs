//! Diagnostics collaborator handed to components that report problems.

use tracing::{error, warn};

/// Sink for warnings and swallowed errors.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// Forwards diagnostics to the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}
