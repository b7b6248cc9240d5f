use crate::flavor::Invocation;
use std::path::PathBuf;

/// Runs IaC tool processes.
#[allow(async_fn_in_trait)]
pub trait IacTool: Send + Sync {
    /// Run `invocation` with `env` layered over the inherited environment.
    /// Output is streamed to the operator's terminal.
    async fn run(&self, invocation: &Invocation, env: &[(String, String)]) -> Result<(), ToolError>;
}

/// Spawns the real `terraform`/`terragrunt` binaries.
pub struct CliTool {
    project_dir: PathBuf,
}

impl CliTool {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }
}

impl IacTool for CliTool {
    async fn run(&self, invocation: &Invocation, env: &[(String, String)]) -> Result<(), ToolError> {
        let cwd = self.project_dir.join(&invocation.cwd);
        tracing::info!(
            program = invocation.program,
            args = ?invocation.args,
            cwd = %cwd.display(),
            "running"
        );

        let status = tokio::process::Command::new(invocation.program)
            .args(&invocation.args)
            .current_dir(&cwd)
            .env_remove("AWS_PROFILE")
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .await
            .map_err(|e| ToolError::Spawn {
                program: invocation.program,
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                program: invocation.program,
                args: invocation.args.clone(),
                status: status.to_string(),
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{program} not found or failed to start")]
    Spawn {
        program: &'static str,
        source: std::io::Error,
    },
    #[error("{program} {} failed: {status}", .args.join(" "))]
    Failed {
        program: &'static str,
        args: Vec<String>,
        status: String,
    },
}
