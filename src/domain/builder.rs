//! Notification subject and body construction.

use std::fmt::Write;

use super::error::NotifyError;
use super::template::TemplateEngine;
use super::types::{ExecutionContext, NotificationMessage, ENGINE_NAME};
use crate::config::Configurable;

/// Maximum subject length accepted by the notification service.
pub const MAX_SUBJECT_CHARS: usize = 100;

/// Maximum message size accepted by the notification service.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Builds notification messages from a run context and parameters.
pub struct NotificationBuilder<'a> {
    engine: &'a dyn TemplateEngine,
}

impl<'a> NotificationBuilder<'a> {
    pub fn new(engine: &'a dyn TemplateEngine) -> Self {
        Self { engine }
    }

    /// Build the message. Template errors propagate.
    ///
    /// A configured subject that renders blank falls back to the default
    /// subject. A body template that renders blank is an error.
    pub fn build(
        &self,
        context: &ExecutionContext,
        params: &impl Configurable,
    ) -> Result<NotificationMessage, NotifyError> {
        let subject = match params.subject() {
            Some(template) => self.engine.render_str("subject", template, context)?,
            None => String::new(),
        };
        let subject = match sanitize_subject(&subject) {
            s if s.trim().is_empty() => sanitize_subject(&default_subject(context)),
            s => s,
        };

        let body = match params.body_template() {
            Some(path) => {
                let body = self.engine.render(path, context)?;
                if body.trim().is_empty() {
                    return Err(NotifyError::render(
                        path.display().to_string(),
                        "rendered body is empty",
                    ));
                }
                body
            }
            None => default_body(context),
        };

        Ok(NotificationMessage {
            subject,
            body: truncate_body(body),
        })
    }
}

/// `"Chef Client success in web1"`
pub fn default_subject(context: &ExecutionContext) -> String {
    format!(
        "{} {} {} in {}",
        ENGINE_NAME,
        context.mode.label(),
        context.outcome(),
        context.node_name
    )
}

/// Multi-line run summary used when no body template is configured.
pub fn default_body(context: &ExecutionContext) -> String {
    let mut body = String::new();
    let run = format!("{} {}", ENGINE_NAME, context.mode.label());

    let _ = writeln!(body, "Node Name: {}", context.node_name);
    if let Some(fqdn) = context.attribute_str("fqdn") {
        let _ = writeln!(body, "Hostname: {}", fqdn);
    }
    let _ = writeln!(body);

    let _ = writeln!(body, "{} Run Status: {}", run, context.outcome());
    if let Some(run_list) = context.attribute("run_list").and_then(|v| v.as_array()) {
        let items: Vec<&str> = run_list.iter().filter_map(|v| v.as_str()).collect();
        let _ = writeln!(body, "{} Run List: {}", ENGINE_NAME, items.join(", "));
    }
    if let Some(env) = context.attribute_str("chef_environment") {
        let _ = writeln!(body, "{} Environment: {}", ENGINE_NAME, env);
    }

    if context.attribute("ec2").is_some() {
        let _ = writeln!(body);
        for (label, path) in [
            ("Instance Id", "ec2.instance_id"),
            ("Instance Public Hostname", "ec2.public_hostname"),
            ("Instance Hostname", "ec2.hostname"),
            ("Instance Public IPv4", "ec2.public_ipv4"),
            ("Instance Local IPv4", "ec2.local_ipv4"),
        ] {
            if let Some(value) = context.attribute_str(path) {
                let _ = writeln!(body, "{}: {}", label, value);
            }
        }
    }

    let _ = writeln!(body);
    if let Some(elapsed) = context.elapsed_time {
        let _ = writeln!(body, "{} Elapsed Time: {:.2} seconds", run, elapsed);
    }
    if let Some(start) = &context.start_time {
        let _ = writeln!(body, "{} Start Time: {}", run, start);
    }
    if let Some(end) = &context.end_time {
        let _ = writeln!(body, "{} End Time: {}", run, end);
    }

    if let Some(exception) = &context.exception {
        let _ = writeln!(body);
        let _ = writeln!(body, "Exception: {}", exception);
        if !context.backtrace.is_empty() {
            let _ = writeln!(body, "Stacktrace:");
            let _ = writeln!(body, "{}", context.backtrace.join("\n"));
        }
    }

    body
}

/// Single line, no control characters, at most [`MAX_SUBJECT_CHARS`].
fn sanitize_subject(subject: &str) -> String {
    subject
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(MAX_SUBJECT_CHARS)
        .collect()
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_BODY_BYTES {
        let mut end = MAX_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Param, ParameterStore};
    use crate::domain::types::RunMode;
    use crate::domain::PlaceholderEngine;
    use serde_json::json;
    use std::io::Write as _;

    fn build(ctx: &ExecutionContext, store: &ParameterStore) -> Result<NotificationMessage, NotifyError> {
        NotificationBuilder::new(&PlaceholderEngine).build(ctx, store)
    }

    #[test]
    fn test_default_subject_client_run() {
        let msg = build(&ExecutionContext::new("test"), &ParameterStore::new()).unwrap();
        assert_eq!(msg.subject, "Chef Client success in test");
    }

    #[test]
    fn test_default_subject_solo_run() {
        let mut ctx = ExecutionContext::new("test");
        ctx.mode = RunMode::Solo;
        let msg = build(&ctx, &ParameterStore::new()).unwrap();
        assert_eq!(msg.subject, "Chef Solo success in test");
    }

    #[test]
    fn test_default_subject_failure() {
        let mut ctx = ExecutionContext::new("test");
        ctx.success = false;
        assert_eq!(default_subject(&ctx), "Chef Client failure in test");
    }

    #[test]
    fn test_explicit_subject_wins_regardless_of_run() {
        let mut store = ParameterStore::new();
        store.set_text(Param::Subject, "My Subject");

        for (mode, success) in [
            (RunMode::Client, true),
            (RunMode::Client, false),
            (RunMode::Solo, true),
            (RunMode::Solo, false),
        ] {
            let mut ctx = ExecutionContext::new("test");
            ctx.mode = mode;
            ctx.success = success;
            assert_eq!(build(&ctx, &store).unwrap().subject, "My Subject");
        }
    }

    #[test]
    fn test_subject_placeholders() {
        let mut store = ParameterStore::new();
        store.set_text(Param::Subject, "{{ node_name }} finished: {{ status }}");
        let msg = build(&ExecutionContext::new("web1"), &store).unwrap();
        assert_eq!(msg.subject, "web1 finished: success");
    }

    #[test]
    fn test_subject_is_single_line_and_truncated() {
        let mut store = ParameterStore::new();
        store.set_text(Param::Subject, format!("line\none {}", "x".repeat(200)));
        let msg = build(&ExecutionContext::new("test"), &store).unwrap();
        assert!(msg.subject.starts_with("line one "));
        assert_eq!(msg.subject.chars().count(), MAX_SUBJECT_CHARS);
    }

    #[test]
    fn test_configured_subject_is_not_trimmed() {
        let mut store = ParameterStore::new();
        store.set_text(Param::Subject, " Alert ");
        let msg = build(&ExecutionContext::new("test"), &store).unwrap();
        assert_eq!(msg.subject, " Alert ");
    }

    #[test]
    fn test_blank_subject_falls_back_to_default() {
        let ctx = ExecutionContext::new("test");

        for subject in ["   ", "{{ exception }}"] {
            let mut store = ParameterStore::new();
            store.set_text(Param::Subject, subject);
            let msg = build(&ctx, &store).unwrap();
            assert_eq!(msg.subject, "Chef Client success in test");
        }
    }

    #[test]
    fn test_empty_template_body_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut store = ParameterStore::new();
        store.set_text(Param::BodyTemplate, file.path().to_string_lossy());

        match build(&ExecutionContext::new("test"), &store).unwrap_err() {
            NotifyError::TemplateRender { message, .. } => {
                assert_eq!(message, "rendered body is empty")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_body_contains_node_name() {
        let msg = build(&ExecutionContext::new("test"), &ParameterStore::new()).unwrap();
        assert!(msg.body.contains("Node Name: test"));
        assert!(!msg.body.contains("Exception"));
    }

    #[test]
    fn test_default_body_details() {
        let mut ctx = ExecutionContext::new("web1");
        ctx.success = false;
        ctx.elapsed_time = Some(3.0);
        ctx.exception = Some("RuntimeError: boom".to_string());
        ctx.backtrace = vec!["recipe.rb:1".to_string(), "recipe.rb:2".to_string()];
        ctx.attributes = json!({
            "fqdn": "web1.example.com",
            "run_list": ["recipe[base]", "role[web]"],
            "ec2": {"instance_id": "i-0abc", "local_ipv4": "10.0.0.5"}
        });

        let body = default_body(&ctx);
        assert!(body.contains("Hostname: web1.example.com"));
        assert!(body.contains("Chef Run List: recipe[base], role[web]"));
        assert!(body.contains("Instance Id: i-0abc"));
        assert!(body.contains("Instance Local IPv4: 10.0.0.5"));
        assert!(body.contains("Chef Client Elapsed Time: 3.00 seconds"));
        assert!(body.contains("Chef Client Run Status: failure"));
        assert!(body.contains("Exception: RuntimeError: boom"));
        assert!(body.contains("Stacktrace:\nrecipe.rb:1\nrecipe.rb:2"));
    }

    #[test]
    fn test_template_body_is_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Custom\n  {{{{ node_name }}}} done\n").unwrap();
        let mut store = ParameterStore::new();
        store.set_text(Param::BodyTemplate, file.path().to_string_lossy());

        let msg = build(&ExecutionContext::new("test"), &store).unwrap();
        assert_eq!(msg.body, "Custom\n  test done\n");
        assert_eq!(msg.subject, "Chef Client success in test");
    }

    #[test]
    fn test_template_errors_propagate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{{{ undefined_thing }}}}").unwrap();
        let mut store = ParameterStore::new();
        store.set_text(Param::BodyTemplate, file.path().to_string_lossy());

        let err = build(&ExecutionContext::new("test"), &store).unwrap_err();
        assert!(matches!(err, NotifyError::TemplateRender { .. }));
    }

    #[test]
    fn test_body_truncated_on_char_boundary() {
        let body = "é".repeat(MAX_BODY_BYTES);
        let out = truncate_body(body);
        assert!(out.len() <= MAX_BODY_BYTES);
        assert!(out.len() > MAX_BODY_BYTES - 2);
    }
}
