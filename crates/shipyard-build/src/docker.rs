use std::path::{Path, PathBuf};
use std::process::Stdio;

/// The local container tool: build, registry login, push.
///
/// Production code uses [`DockerCli`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait ContainerTool: Send + Sync {
    /// `docker build -t <image> <context_dir>`
    async fn build(&self, image: &str, context_dir: &Path) -> Result<(), DockerError>;

    /// Authenticate against one registry endpoint.
    async fn login(&self, username: &str, password: &str, endpoint: &str)
    -> Result<(), DockerError>;

    /// `docker push <image>`
    async fn push(&self, image: &str) -> Result<(), DockerError>;
}

/// Real docker CLI, run from the project directory with output streamed to the terminal.
pub struct DockerCli {
    working_dir: PathBuf,
}

impl DockerCli {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    async fn run_streaming(&self, args: &[String]) -> Result<(), DockerError> {
        tracing::debug!(?args, "docker");
        let status = tokio::process::Command::new("docker")
            .args(args)
            .current_dir(&self.working_dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| DockerError::NotFound { source: e })?;

        if status.success() {
            Ok(())
        } else {
            Err(DockerError::CommandFailed {
                args: args.to_vec(),
                detail: format!("exit code: {status}"),
            })
        }
    }
}

impl ContainerTool for DockerCli {
    async fn build(&self, image: &str, context_dir: &Path) -> Result<(), DockerError> {
        let context = context_dir
            .to_str()
            .ok_or_else(|| DockerError::InvalidPath(context_dir.to_path_buf()))?;
        self.run_streaming(&args(["build", "-t", image, context])).await
    }

    async fn login(
        &self,
        username: &str,
        password: &str,
        endpoint: &str,
    ) -> Result<(), DockerError> {
        use tokio::io::AsyncWriteExt;

        // Password goes through stdin so it never shows up in the process list.
        let cmd = args(["login", "-u", username, "--password-stdin", endpoint]);
        tracing::debug!(endpoint, username, "docker login");

        let mut child = tokio::process::Command::new("docker")
            .args(&cmd)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DockerError::NotFound { source: e })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(password.as_bytes())
                .await
                .map_err(|e| DockerError::StdinWrite { source: e })?;
            stdin
                .shutdown()
                .await
                .map_err(|e| DockerError::StdinWrite { source: e })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| DockerError::NotFound { source: e })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DockerError::CommandFailed {
                args: cmd,
                detail: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }

    async fn push(&self, image: &str) -> Result<(), DockerError> {
        self.run_streaming(&args(["push", image])).await
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("docker CLI not found, install it from https://docs.docker.com/get-docker/")]
    NotFound { source: std::io::Error },

    #[error("docker command failed: {args:?}\n{detail}")]
    CommandFailed { args: Vec<String>, detail: String },

    #[error("build context path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to write to docker stdin")]
    StdinWrite { source: std::io::Error },
}
