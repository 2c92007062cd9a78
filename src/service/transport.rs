//! Publish transport for built notifications.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use serde_json::json;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::{Credentials, NotificationMessage, NotifyError};

/// Delivers one message to a topic.
pub trait Transport: Send + Sync {
    fn publish(
        &self,
        topic_arn: &str,
        message: &NotificationMessage,
        credentials: &Credentials,
    ) -> Result<(), NotifyError>;
}

/// Publishes through the AWS command line client.
///
/// Topic, subject and body travel in a `--cli-input-json` file, so message
/// size is not bound by the argument length limit and values are never parsed
/// as options or parameter-file references. Credentials are passed to the
/// child process environment only.
pub struct AwsCliTransport {
    program: String,
    leading_args: Vec<String>,
}

impl AwsCliTransport {
    /// Create a transport from a command line such as `aws` or `aws --profile ops`.
    pub fn new(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "aws".to_string());
        Self {
            program,
            leading_args: parts.collect(),
        }
    }

    fn build_command(&self, input: &Path, credentials: &Credentials) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(["sns", "publish", "--output", "json"])
            .arg("--cli-input-json")
            .arg(format!("file://{}", input.display()));

        if let Some(region) = &credentials.region {
            cmd.arg("--region").arg(region);
        }

        cmd.env("AWS_ACCESS_KEY_ID", &credentials.access_key)
            .env("AWS_SECRET_ACCESS_KEY", &credentials.secret_key);
        match &credentials.token {
            Some(token) => cmd.env("AWS_SESSION_TOKEN", token),
            None => cmd.env_remove("AWS_SESSION_TOKEN"),
        };

        cmd
    }
}

/// Write the `sns publish` request to a temporary JSON file.
///
/// The file is removed when the returned handle is dropped.
fn write_input(topic_arn: &str, message: &NotificationMessage) -> std::io::Result<NamedTempFile> {
    let request = json!({
        "TopicArn": topic_arn,
        "Subject": message.subject,
        "Message": message.body,
    });

    let mut file = tempfile::Builder::new()
        .prefix("sns-report-")
        .suffix(".json")
        .tempfile()?;
    serde_json::to_writer(&mut file, &request)?;
    file.flush()?;
    Ok(file)
}

impl Transport for AwsCliTransport {
    fn publish(
        &self,
        topic_arn: &str,
        message: &NotificationMessage,
        credentials: &Credentials,
    ) -> Result<(), NotifyError> {
        let transport_error = |detail: String| NotifyError::Transport {
            topic_arn: topic_arn.to_string(),
            message: detail,
        };

        debug!(
            "Publishing to {} via {} (subject: {}, {} bytes)",
            topic_arn,
            self.program,
            message.subject,
            message.body.len()
        );

        let input = write_input(topic_arn, message)
            .map_err(|e| transport_error(format!("failed to write publish request: {}", e)))?;

        let output = self
            .build_command(input.path(), credentials)
            .output()
            .map_err(|e| transport_error(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Publish command failed: {}", stderr.trim());
            return Err(transport_error(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        debug!("Publish response: {}", String::from_utf8_lossy(&output.stdout).trim());
        Ok(())
    }
}
