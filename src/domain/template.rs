//! Template rendering for notification subjects and bodies.
//!
//! Placeholders take the form `{{ name }}`. Recognized names:
//!
//! - `node_name`, `status` (`success`/`failure`), `success`, `mode`
//! - `elapsed_time`, `start_time`, `end_time`, `exception`, `backtrace`
//! - `node.<dotted.path>` for any scalar node attribute

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::error::NotifyError;
use super::types::ExecutionContext;

/// Renders templates against an execution context.
pub trait TemplateEngine: Send + Sync {
    /// Render the file at `path`.
    fn render(&self, path: &Path, context: &ExecutionContext) -> Result<String, NotifyError>;

    /// Render an inline template string.
    fn render_str(
        &self,
        source_name: &str,
        template: &str,
        context: &ExecutionContext,
    ) -> Result<String, NotifyError>;
}

/// Engine substituting `{{ name }}` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderEngine;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("valid placeholder regex"))
}

impl PlaceholderEngine {
    fn lookup(name: &str, context: &ExecutionContext) -> Option<String> {
        if let Some(path) = name.strip_prefix("node.") {
            return context.attribute_str(path);
        }
        match name {
            "node_name" => Some(context.node_name.clone()),
            "status" => Some(context.outcome().to_string()),
            "success" => Some(context.success.to_string()),
            "mode" => Some(context.mode.label().to_string()),
            "elapsed_time" => Some(
                context
                    .elapsed_time
                    .map(|secs| format!("{:.2}", secs))
                    .unwrap_or_default(),
            ),
            "start_time" => Some(context.start_time.clone().unwrap_or_default()),
            "end_time" => Some(context.end_time.clone().unwrap_or_default()),
            "exception" => Some(context.exception.clone().unwrap_or_default()),
            "backtrace" => Some(context.backtrace.join("\n")),
            _ => None,
        }
    }
}

impl TemplateEngine for PlaceholderEngine {
    fn render(&self, path: &Path, context: &ExecutionContext) -> Result<String, NotifyError> {
        let source_name = path.display().to_string();
        let template = fs::read_to_string(path)
            .map_err(|e| NotifyError::render(&source_name, format!("cannot read template: {}", e)))?;
        self.render_str(&source_name, &template, context)
    }

    fn render_str(
        &self,
        source_name: &str,
        template: &str,
        context: &ExecutionContext,
    ) -> Result<String, NotifyError> {
        let mut output = String::with_capacity(template.len());
        let mut last = 0;

        for caps in placeholder_regex().captures_iter(template) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let name = caps.get(1).map_or("", |m| m.as_str());
            let value = Self::lookup(name, context).ok_or_else(|| {
                NotifyError::render(source_name, format!("unknown variable '{}'", name))
            })?;
            output.push_str(&template[last..whole.start]);
            output.push_str(&value);
            last = whole.end;
        }

        let rest = &template[last..];
        if let Some(pos) = rest.find("{{") {
            let line = template[..last + pos].matches('\n').count() + 1;
            return Err(NotifyError::render(
                source_name,
                format!("unterminated placeholder on line {}", line),
            ));
        }
        output.push_str(rest);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RunMode;
    use serde_json::json;
    use std::io::Write;

    fn context() -> ExecutionContext {
        let mut ctx = ExecutionContext::new("test");
        ctx.elapsed_time = Some(12.5);
        ctx.attributes = json!({"opsworks": {"activity": "deploy"}, "ec2": {"tags": ["a"]}});
        ctx
    }

    #[test]
    fn test_plain_text_renders_unchanged() {
        let out = PlaceholderEngine
            .render_str("subject", "Deploy finished", &context())
            .unwrap();
        assert_eq!(out, "Deploy finished");
    }

    #[test]
    fn test_builtin_variables() {
        let mut ctx = context();
        ctx.mode = RunMode::Solo;
        let out = PlaceholderEngine
            .render_str("t", "{{node_name}} {{ status }} {{ mode }} {{ elapsed_time }}", &ctx)
            .unwrap();
        assert_eq!(out, "test success Solo 12.50");
    }

    #[test]
    fn test_attribute_variables() {
        let out = PlaceholderEngine
            .render_str("t", "activity={{ node.opsworks.activity }}", &context())
            .unwrap();
        assert_eq!(out, "activity=deploy");
    }

    #[test]
    fn test_unknown_variable_fails() {
        let err = PlaceholderEngine
            .render_str("t", "{{ nope }}", &context())
            .unwrap_err();
        assert!(matches!(err, NotifyError::TemplateRender { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_non_scalar_attribute_fails() {
        assert!(PlaceholderEngine
            .render_str("t", "{{ node.ec2.tags }}", &context())
            .is_err());
    }

    #[test]
    fn test_unterminated_placeholder_fails() {
        let err = PlaceholderEngine
            .render_str("t", "line one\nNode: {{ node_name", &context())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_render_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Custom body for {{{{ node_name }}}}").unwrap();

        let out = PlaceholderEngine.render(file.path(), &context()).unwrap();
        assert_eq!(out, "Custom body for test\n");
    }

    #[test]
    fn test_render_missing_file_fails() {
        let err = PlaceholderEngine
            .render(Path::new("/nonexistent/body.tmpl"), &context())
            .unwrap_err();
        assert!(matches!(err, NotifyError::TemplateRender { .. }));
    }
}
