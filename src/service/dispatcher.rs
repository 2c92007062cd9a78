//! Notification pipeline: resolve, validate, build, filter, publish.

use tracing::{debug, info};

use super::transport::Transport;
use crate::config::{
    ConfigResolver, Configurable, EnvironmentProbe, Param, ParameterStore, Validator,
};
use crate::domain::{
    ActivityFilter, Credentials, Diagnostics, ExecutionContext, NotificationBuilder,
    NotificationMessage, NotifyError, TemplateEngine, Violation,
};

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Message was handed to the transport
    Published,
    /// Activity filter rejected the run
    Filtered,
    /// Safe run logged and swallowed an error
    Suppressed,
}

/// Orchestrates a single notification per run.
pub struct Dispatcher {
    config: ParameterStore,
    probe: Box<dyn EnvironmentProbe>,
    engine: Box<dyn TemplateEngine>,
    transport: Box<dyn Transport>,
    diagnostics: Box<dyn Diagnostics>,
}

impl Dispatcher {
    pub fn new(
        config: ParameterStore,
        probe: Box<dyn EnvironmentProbe>,
        engine: Box<dyn TemplateEngine>,
        transport: Box<dyn Transport>,
        diagnostics: Box<dyn Diagnostics>,
    ) -> Self {
        Self {
            config,
            probe,
            engine,
            transport,
            diagnostics,
        }
    }

    /// Resolve, validate and build, without filtering or publishing.
    pub fn prepare(
        &self,
        context: &ExecutionContext,
    ) -> Result<(ParameterStore, NotificationMessage), NotifyError> {
        let diagnostics = self.diagnostics.as_ref();

        let resolved = ConfigResolver::new(self.probe.as_ref(), diagnostics).resolve(&self.config, context);
        Validator::new(diagnostics).check(&resolved)?;
        debug!("Resolved parameters: {:?}", resolved);

        let message = NotificationBuilder::new(self.engine.as_ref()).build(context, &resolved)?;
        Ok((resolved, message))
    }

    /// Run the pipeline, propagating the first error.
    pub fn run_unsafe(&self, context: &ExecutionContext) -> Result<DispatchOutcome, NotifyError> {
        let (resolved, message) = self.prepare(context)?;

        if !ActivityFilter::should_dispatch(context, resolved.activity_filter()) {
            info!("Notification for {} filtered out by activity", context.node_name);
            return Ok(DispatchOutcome::Filtered);
        }

        let (topic_arn, credentials) = publish_target(&resolved)?;
        self.transport.publish(topic_arn, &message, &credentials)?;
        info!("Notification published to {}", topic_arn);

        Ok(DispatchOutcome::Published)
    }

    /// Run the pipeline, logging and swallowing any error.
    pub fn run_safe(&self, context: &ExecutionContext) -> DispatchOutcome {
        match self.run_unsafe(context) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.diagnostics
                    .error(&format!("Failed to send notification: {}", e));
                DispatchOutcome::Suppressed
            }
        }
    }
}

impl Configurable for Dispatcher {
    fn params(&self) -> &ParameterStore {
        &self.config
    }

    fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.config
    }
}

/// Topic and credentials of a validated store.
fn publish_target<'a>(
    store: &'a ParameterStore,
) -> Result<(&'a str, Credentials), NotifyError> {
    let required = |value: Option<&'a str>, param: Param| {
        value.ok_or_else(|| Violation::MissingRequiredParameter(vec![param.name()]))
    };

    let credentials = Credentials {
        access_key: required(store.access_key(), Param::AccessKey)?.to_string(),
        secret_key: required(store.secret_key(), Param::SecretKey)?.to_string(),
        token: store.token().map(str::to_string),
        region: store.region().map(str::to_string),
    };
    Ok((required(store.topic_arn(), Param::TopicArn)?, credentials))
}
