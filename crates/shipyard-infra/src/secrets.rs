use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Credstash table holding platform secrets.
pub const CREDSTASH_TABLE: &str = "credstash-platform";

/// A decrypted secrets file. The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct SecretsFile {
    file: NamedTempFile,
}

impl SecretsFile {
    /// Write `contents` to a fresh owner-only temporary file.
    pub fn write(contents: &[u8]) -> Result<Self, SecretsError> {
        let mut file = tempfile::Builder::new()
            .prefix("shipyard-secrets-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| SecretsError::Write { source: e })?;
        file.write_all(contents)
            .and_then(|()| file.flush())
            .map_err(|e| SecretsError::Write { source: e })?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Decrypts a component's secrets for one environment.
#[allow(async_fn_in_trait)]
pub trait SecretsMaterializer: Send + Sync {
    /// `env` carries the privileged credentials the decryption runs under.
    async fn materialize(
        &self,
        component: &str,
        environment: &str,
        env: &[(String, String)],
    ) -> Result<SecretsFile, SecretsError>;
}

/// Reads secrets with the `credstash` CLI.
pub struct CredstashSecrets {
    table: String,
}

impl CredstashSecrets {
    pub fn new() -> Self {
        Self {
            table: CREDSTASH_TABLE.to_owned(),
        }
    }

    fn args(&self, component: &str, environment: &str) -> Vec<String> {
        vec![
            "--table".to_owned(),
            self.table.clone(),
            "getall".to_owned(),
            "--format".to_owned(),
            "json".to_owned(),
            format!("component={component}"),
            format!("env={environment}"),
        ]
    }
}

impl Default for CredstashSecrets {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretsMaterializer for CredstashSecrets {
    async fn materialize(
        &self,
        component: &str,
        environment: &str,
        env: &[(String, String)],
    ) -> Result<SecretsFile, SecretsError> {
        let args = self.args(component, environment);
        tracing::debug!(table = %self.table, component, environment, "decrypting secrets");

        let output = tokio::process::Command::new("credstash")
            .args(&args)
            .env_remove("AWS_PROFILE")
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .await
            .map_err(|e| SecretsError::Spawn { source: e })?;

        if !output.status.success() {
            return Err(SecretsError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        SecretsFile::write(&output.stdout)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("credstash not found or failed to start")]
    Spawn { source: std::io::Error },
    #[error("secrets decryption failed: {stderr}")]
    Failed { stderr: String },
    #[error("failed to write decrypted secrets")]
    Write { source: std::io::Error },
}
