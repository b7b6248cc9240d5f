use crate::error::{BuildError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shipyard_aws::{AuthorizationData, AwsClient, AwsContext, AwsExecutor, RegistryError};
use shipyard_build::ContainerTool;

/// Logs the container tool in to every registry endpoint the assumed
/// credentials can reach.
pub struct RegistryAuthenticator<'a, E: AwsExecutor, D: ContainerTool> {
    aws: &'a AwsClient<E>,
    docker: &'a D,
}

/// Decoded credentials for one registry endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegistryLogin {
    endpoint: String,
    username: String,
    password: String,
}

impl<'a, E: AwsExecutor, D: ContainerTool> RegistryAuthenticator<'a, E, D> {
    pub fn new(aws: &'a AwsClient<E>, docker: &'a D) -> Self {
        Self { aws, docker }
    }

    /// Returns the endpoints logged in to. Every token is decoded before the
    /// first login; the first failing login aborts the rest.
    pub async fn login(&self, context: &AwsContext) -> Result<Vec<String>> {
        let data = self.aws.authorization_data(context).await.map_err(|e| match e {
            RegistryError::Unprivileged => crate::Error::ResourceState(RegistryError::Unprivileged),
            other => BuildError::Token(other).into(),
        })?;

        let logins = data
            .iter()
            .map(decode)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut endpoints = Vec::with_capacity(logins.len());
        for login in logins {
            tracing::info!(endpoint = %login.endpoint, "logging in to registry");
            self.docker
                .login(&login.username, &login.password, &login.endpoint)
                .await
                .map_err(|e| BuildError::Login {
                    endpoint: login.endpoint.clone(),
                    source: e,
                })?;
            endpoints.push(login.endpoint);
        }
        Ok(endpoints)
    }
}

fn decode(data: &AuthorizationData) -> std::result::Result<RegistryLogin, BuildError> {
    let malformed = || BuildError::MalformedToken {
        endpoint: data.proxy_endpoint.clone(),
    };
    let bytes = STANDARD
        .decode(data.authorization_token.trim())
        .map_err(|_| malformed())?;
    let token = String::from_utf8(bytes).map_err(|_| malformed())?;
    let (username, password) = token.split_once(':').ok_or_else(malformed)?;

    Ok(RegistryLogin {
        endpoint: data.proxy_endpoint.clone(),
        username: username.to_owned(),
        password: password.to_owned(),
    })
}
