use crate::aws::{AwsError, parse_service_error};
use crate::credentials::AwsContext;

/// Abstraction over aws CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait AwsExecutor: Send + Sync {
    /// Execute an aws command under `context` and capture its JSON stdout.
    async fn exec(&self, args: &[String], context: &AwsContext) -> Result<String, AwsError>;
}

/// Real aws CLI executor.
pub struct RealExecutor;

impl AwsExecutor for RealExecutor {
    async fn exec(&self, args: &[String], context: &AwsContext) -> Result<String, AwsError> {
        use std::process::Stdio;

        let mut cmd = tokio::process::Command::new("aws");
        cmd.args(args)
            .args(["--region", &context.region, "--output", "json"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(credentials) = context.credentials() {
            // A profile would take precedence over the assumed identity.
            cmd.env_remove("AWS_PROFILE");
            cmd.envs(credentials.env_vars());
        }

        tracing::debug!(?args, region = %context.region, assumed = context.is_assumed(), "aws");

        let output = cmd
            .output()
            .await
            .map_err(|e| AwsError::NotFound { source: e })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| AwsError::InvalidUtf8 { source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(
                // arch-lint: allow(no-silent-result-drop) reason="stderr without a service error code is reported whole as CommandFailed"
                parse_service_error(&stderr).unwrap_or_else(|| AwsError::CommandFailed {
                    args: args.to_vec(),
                    stderr,
                }),
            )
        }
    }
}
