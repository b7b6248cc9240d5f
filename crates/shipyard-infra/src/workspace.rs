use crate::flavor::IacFlavor;
use shipyard_core::PathConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local files an IaC run creates and must remove again.
pub trait LocalWorkspace: Send + Sync {
    /// Remove the backend config, the tool's working directory and the
    /// secrets link. Paths that are already gone are not an error.
    fn clean(&self) -> Result<Vec<PathBuf>, CleanupError>;

    fn write_backend_config(&self, contents: &str) -> Result<PathBuf, WorkspaceError>;

    /// Point the well-known secrets path at `source`, replacing any old link.
    fn link_secrets(&self, source: &Path) -> Result<PathBuf, WorkspaceError>;
}

/// The real filesystem under a project directory.
pub struct FsWorkspace {
    backend_config: PathBuf,
    working_dir: PathBuf,
    secrets_link: PathBuf,
}

impl FsWorkspace {
    pub fn new(
        project_dir: &Path,
        infra_dir: &Path,
        secrets_link: impl Into<PathBuf>,
        flavor: IacFlavor,
    ) -> Self {
        Self {
            backend_config: project_dir.join(flavor.backend_config_path(infra_dir)),
            working_dir: project_dir.join(flavor.working_dir(infra_dir)),
            secrets_link: secrets_link.into(),
        }
    }

    pub fn from_config(project_dir: &Path, paths: &PathConfig, flavor: IacFlavor) -> Self {
        Self::new(
            project_dir,
            &paths.infra_dir,
            paths.secrets_link.clone(),
            flavor,
        )
    }
}

impl LocalWorkspace for FsWorkspace {
    fn clean(&self) -> Result<Vec<PathBuf>, CleanupError> {
        let mut removed = Vec::new();
        for (path, is_dir) in [
            (&self.backend_config, false),
            (&self.working_dir, true),
            (&self.secrets_link, false),
        ] {
            let result = if is_dir {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_file(path)
            };
            match result {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "removed");
                    removed.push(path.clone());
                }
                // arch-lint: allow(no-error-swallowing) reason="a path that is already gone needs no cleanup"
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(CleanupError {
                        path: path.clone(),
                        source: e,
                    });
                }
            }
        }
        Ok(removed)
    }

    fn write_backend_config(&self, contents: &str) -> Result<PathBuf, WorkspaceError> {
        if let Some(parent) = self.backend_config.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&self.backend_config, contents).map_err(|e| WorkspaceError::Write {
            path: self.backend_config.clone(),
            source: e,
        })?;
        tracing::info!(path = %self.backend_config.display(), "wrote state backend config");
        Ok(self.backend_config.clone())
    }

    fn link_secrets(&self, source: &Path) -> Result<PathBuf, WorkspaceError> {
        match std::fs::remove_file(&self.secrets_link) {
            Ok(()) => {}
            // arch-lint: allow(no-error-swallowing) reason="no previous link to replace"
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(WorkspaceError::Link {
                    path: self.secrets_link.clone(),
                    source: e,
                });
            }
        }
        link(source, &self.secrets_link).map_err(|e| WorkspaceError::Link {
            path: self.secrets_link.clone(),
            source: e,
        })?;
        tracing::debug!(link = %self.secrets_link.display(), "linked secrets");
        Ok(self.secrets_link.clone())
    }
}

#[cfg(unix)]
fn link(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(not(unix))]
fn link(source: &Path, link: &Path) -> std::io::Result<()> {
    std::fs::copy(source, link).map(|_| ())
}

#[derive(Debug, thiserror::Error)]
#[error("failed to remove {path}")]
pub struct CleanupError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to link secrets at {path}")]
    Link {
        path: PathBuf,
        source: std::io::Error,
    },
}
