use shipyard_aws::{CredentialError, InvalidSessionName, RegistryError};
use shipyard_build::{DockerError, HookError, SlugError};
use shipyard_infra::{CleanupError, InfraArgsError, SecretsError, ToolError, WorkspaceError};

/// Every way a release or infra run can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("credential delegation failed")]
    Authorization(#[from] CredentialError),

    #[error("registry repository is not in a usable state")]
    ResourceState(#[from] RegistryError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("build hook failed")]
    Hook(#[from] HookError),

    #[error(transparent)]
    Tool(#[from] InfraError),

    #[error("local cleanup failed")]
    Cleanup(#[from] CleanupError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Project(#[from] shipyard_core::Error),

    #[error(transparent)]
    InfraArgs(#[from] InfraArgsError),

    #[error(transparent)]
    SessionName(#[from] InvalidSessionName),
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("slug build failed")]
    Slug(#[from] SlugError),

    #[error("docker build of {image} failed")]
    Image { image: String, source: DockerError },

    #[error("could not fetch registry credentials")]
    Token(#[source] RegistryError),

    #[error("registry token for {endpoint} is not base64 `user:password`")]
    MalformedToken { endpoint: String },

    #[error("docker login to {endpoint} failed")]
    Login {
        endpoint: String,
        source: DockerError,
    },

    #[error("docker push of {image} failed")]
    Push { image: String, source: DockerError },
}

#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    #[error("failed to prepare local IaC files")]
    Workspace(#[from] WorkspaceError),

    #[error("failed to materialise secrets")]
    Secrets(#[from] SecretsError),

    #[error("IaC tool failed")]
    Tool(#[from] ToolError),
}

impl From<shipyard_core::Error> for Error {
    fn from(e: shipyard_core::Error) -> Self {
        Self::Configuration(e.into())
    }
}

impl From<InfraArgsError> for Error {
    fn from(e: InfraArgsError) -> Self {
        Self::Configuration(e.into())
    }
}

impl From<InvalidSessionName> for Error {
    fn from(e: InvalidSessionName) -> Self {
        Self::Configuration(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
