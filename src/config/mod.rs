//! Configuration management module.
//!
//! Handles TOML configuration file loading, the notification parameter
//! schema, validation, and resolution of values from the execution host.

mod resolver;
mod schema;
mod service;
mod store;
mod types;
mod validation;

pub use resolver::{ConfigResolver, EnvironmentProbe, HostProbe};
pub use schema::Param;
pub use service::ConfigService;
pub use store::{Configurable, ParameterStore};
pub use types::Config;
pub use validation::Validator;
