//! Service layer for notification dispatch.
//!
//! Contains the pipeline orchestration and the publish transport.

mod dispatcher;
mod transport;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use transport::AwsCliTransport;
