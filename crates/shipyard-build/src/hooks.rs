use shipyard_core::HookConfig;
use std::path::{Path, PathBuf};

/// Whether an optional hook actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Ran,
    Absent,
}

/// Optional scripts around the image build.
#[allow(async_fn_in_trait)]
pub trait BuildHooks: Send + Sync {
    /// Runs before `docker build` with `{component}-{version}` and the build dir.
    async fn pre_build(&self, identifier: &str, build_dir: &Path)
    -> Result<HookOutcome, HookError>;

    /// Runs after a successful `docker build` with the image reference.
    async fn post_build(&self, image: &str) -> Result<HookOutcome, HookError>;
}

/// Executable scripts in the project directory. A missing or
/// non-executable script is skipped.
pub struct ScriptHooks {
    project_dir: PathBuf,
    pre_build: PathBuf,
    post_build: PathBuf,
}

impl ScriptHooks {
    pub fn new(project_dir: impl Into<PathBuf>, config: &HookConfig) -> Self {
        Self {
            project_dir: project_dir.into(),
            pre_build: config.pre_build.clone(),
            post_build: config.post_build.clone(),
        }
    }

    async fn run(&self, hook: &Path, args: &[&str]) -> Result<HookOutcome, HookError> {
        let path = self.project_dir.join(hook);
        if !is_executable(&path) {
            tracing::debug!(hook = %path.display(), "hook not present, skipping");
            return Ok(HookOutcome::Absent);
        }

        tracing::info!(hook = %hook.display(), ?args, "running hook");
        let status = tokio::process::Command::new(&path)
            .args(args)
            .current_dir(&self.project_dir)
            .status()
            .await
            .map_err(|e| HookError::Spawn {
                hook: path.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(HookOutcome::Ran)
        } else {
            Err(HookError::Failed {
                hook: path,
                status: status.to_string(),
            })
        }
    }
}

impl BuildHooks for ScriptHooks {
    async fn pre_build(
        &self,
        identifier: &str,
        build_dir: &Path,
    ) -> Result<HookOutcome, HookError> {
        let build_dir = build_dir.to_string_lossy();
        self.run(&self.pre_build, &[identifier, &build_dir]).await
    }

    async fn post_build(&self, image: &str) -> Result<HookOutcome, HookError> {
        self.run(&self.post_build, &[image]).await
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to start hook {hook}")]
    Spawn {
        hook: PathBuf,
        source: std::io::Error,
    },
    #[error("hook {hook} failed: {status}")]
    Failed { hook: PathBuf, status: String },
}
