use crate::aws::AwsError;
use crate::credentials::{AwsContext, SessionName, TemporaryCredentials, admin_role_arn};
use crate::executor::{AwsExecutor, RealExecutor};
use secrecy::SecretString;
use serde::Deserialize;

/// Error code ECR returns when a repository does not exist.
const REPOSITORY_NOT_FOUND: &str = "RepositoryNotFoundException";

/// Pull-only actions granted to the production account.
pub const PULL_ACTIONS: [&str; 3] = [
    "ecr:GetDownloadUrlForLayer",
    "ecr:BatchGetImage",
    "ecr:BatchCheckLayerAvailability",
];

/// AWS operations client, parameterized over the executor for testability.
pub struct AwsClient<E: AwsExecutor = RealExecutor> {
    executor: E,
}

impl AwsClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for AwsClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: AwsExecutor> AwsClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── STS ──

    /// Exchange the caller's identity for admin credentials in `account_id`.
    ///
    /// Always runs under the ambient caller identity. Nothing is cached:
    /// every call asks STS for a fresh session.
    pub async fn assume_role(
        &self,
        region: &str,
        account_id: &str,
        session: &SessionName,
    ) -> Result<TemporaryCredentials, CredentialError> {
        let role_arn = admin_role_arn(account_id);
        tracing::info!(%role_arn, session = %session, "assuming role");

        let output = self
            .executor
            .exec(
                &args([
                    "sts",
                    "assume-role",
                    "--role-arn",
                    &role_arn,
                    "--role-session-name",
                    session.as_str(),
                ]),
                &AwsContext::caller(region),
            )
            .await
            .map_err(|e| match e {
                AwsError::Service { code, message, .. } => CredentialError::Denied {
                    role_arn: role_arn.clone(),
                    code,
                    message,
                },
                other => CredentialError::Unavailable {
                    role_arn: role_arn.clone(),
                    source: other,
                },
            })?;

        let response: AssumeRoleResponse = serde_json::from_str(&output)
            .map_err(|e| CredentialError::InvalidResponse { source: e })?;
        let c = response.credentials;

        Ok(TemporaryCredentials {
            access_key_id: c.access_key_id,
            secret_access_key: SecretString::from(c.secret_access_key),
            session_token: SecretString::from(c.session_token),
            expiration: c.expiration,
        })
    }

    // ── ECR ──

    /// Look a repository up. Not-found is a value, not an error.
    pub async fn describe_repository(&self, context: &AwsContext, name: &str) -> RepositoryLookup {
        let result = self
            .executor
            .exec(
                &args(["ecr", "describe-repositories", "--repository-names", name]),
                context,
            )
            .await;

        match result {
            Ok(_) => RepositoryLookup::Found,
            Err(e) if e.code() == Some(REPOSITORY_NOT_FOUND) => RepositoryLookup::NotFound,
            Err(e) => RepositoryLookup::Failed(e),
        }
    }

    pub async fn create_repository(&self, context: &AwsContext, name: &str) -> Result<(), AwsError> {
        self.executor
            .exec(
                &args(["ecr", "create-repository", "--repository-name", name]),
                context,
            )
            .await?;
        Ok(())
    }

    pub async fn set_repository_policy(
        &self,
        context: &AwsContext,
        name: &str,
        policy: &str,
    ) -> Result<(), AwsError> {
        self.executor
            .exec(
                &args([
                    "ecr",
                    "set-repository-policy",
                    "--repository-name",
                    name,
                    "--policy-text",
                    policy,
                ]),
                context,
            )
            .await?;
        Ok(())
    }

    /// Ensure the repository exists, creating it with a cross-account pull
    /// policy for `pull_account_id` if it does not.
    ///
    /// Any describe failure other than not-found is returned as
    /// [`RegistryError::Describe`] without attempting creation. A repository
    /// created before a failed policy call is left in place; the next run
    /// finds it and does nothing.
    pub async fn ensure_repository(
        &self,
        context: &AwsContext,
        name: &str,
        pull_account_id: &str,
    ) -> Result<RepositoryStatus, RegistryError> {
        if !context.is_assumed() {
            return Err(RegistryError::Unprivileged);
        }

        tracing::info!(repository = name, "checking ECR repository");
        match self.describe_repository(context, name).await {
            RepositoryLookup::Found => Ok(RepositoryStatus::Existing),
            RepositoryLookup::Failed(source) => Err(RegistryError::Describe {
                repository: name.to_owned(),
                source,
            }),
            RepositoryLookup::NotFound => {
                tracing::info!(repository = name, "creating ECR repository");
                self.create_repository(context, name)
                    .await
                    .map_err(|e| RegistryError::Create {
                        repository: name.to_owned(),
                        source: e,
                    })?;

                self.set_repository_policy(context, name, &pull_policy(pull_account_id))
                    .await
                    .map_err(|e| RegistryError::Policy {
                        repository: name.to_owned(),
                        source: e,
                    })?;

                Ok(RepositoryStatus::Created)
            }
        }
    }

    /// One authorization entry per registry endpoint the credentials are valid for.
    pub async fn authorization_data(
        &self,
        context: &AwsContext,
    ) -> Result<Vec<AuthorizationData>, RegistryError> {
        if !context.is_assumed() {
            return Err(RegistryError::Unprivileged);
        }

        let output = self
            .executor
            .exec(&args(["ecr", "get-authorization-token"]), context)
            .await
            .map_err(|e| RegistryError::Token { source: e })?;

        let response: AuthorizationTokenResponse = serde_json::from_str(&output)
            .map_err(|e| RegistryError::InvalidResponse { source: e })?;

        Ok(response.authorization_data)
    }
}

/// Repository policy letting `account_id`'s root principal pull images.
pub fn pull_policy(account_id: &str) -> String {
    serde_json::json!({
        "Version": "2008-10-17",
        "Statement": [{
            "Sid": "allow production",
            "Effect": "Allow",
            "Principal": { "AWS": format!("arn:aws:iam::{account_id}:root") },
            "Action": PULL_ACTIONS,
        }]
    })
    .to_string()
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Response types ──

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssumeRoleResponse {
    credentials: StsCredentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StsCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationTokenResponse {
    authorization_data: Vec<AuthorizationData>,
}

/// Base64 `username:password` token for one registry endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationData {
    pub authorization_token: String,
    pub proxy_endpoint: String,
}

// ── Lookup types ──

/// Outcome of a repository describe call.
#[derive(Debug)]
pub enum RepositoryLookup {
    Found,
    NotFound,
    Failed(AwsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryStatus {
    Existing,
    Created,
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("not allowed to assume {role_arn} ({code}): {message}")]
    Denied {
        role_arn: String,
        code: String,
        message: String,
    },

    #[error("could not request credentials for {role_arn}")]
    Unavailable { role_arn: String, source: AwsError },

    #[error("unexpected assume-role response")]
    InvalidResponse { source: serde_json::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry calls require assumed credentials")]
    Unprivileged,

    #[error("failed to describe ECR repository '{repository}'")]
    Describe { repository: String, source: AwsError },

    #[error("failed to create ECR repository '{repository}'")]
    Create { repository: String, source: AwsError },

    #[error("failed to set policy on ECR repository '{repository}'")]
    Policy { repository: String, source: AwsError },

    #[error("failed to get ECR authorization token")]
    Token { source: AwsError },

    #[error("unexpected get-authorization-token response")]
    InvalidResponse { source: serde_json::Error },
}
