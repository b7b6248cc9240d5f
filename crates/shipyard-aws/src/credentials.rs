use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Role assumed in every target account.
pub const ADMIN_ROLE: &str = "admin";

/// `arn:aws:iam::{account_id}:role/admin`
pub fn admin_role_arn(account_id: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{ADMIN_ROLE}")
}

/// Temporary credentials returned by STS.
///
/// The secret halves are wrapped in [`SecretString`] and only exposed as
/// child-process environment variables through [`TemporaryCredentials::env_vars`].
#[derive(Clone)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: SecretString,
    pub expiration: String,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl TemporaryCredentials {
    /// Environment variables that make a child process act under these credentials.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        vec![
            ("AWS_ACCESS_KEY_ID".to_owned(), self.access_key_id.clone()),
            (
                "AWS_SECRET_ACCESS_KEY".to_owned(),
                self.secret_access_key.expose_secret().to_owned(),
            ),
            (
                "AWS_SESSION_TOKEN".to_owned(),
                self.session_token.expose_secret().to_owned(),
            ),
        ]
    }
}

/// Identity an AWS call is made under.
///
/// `caller` is the ambient, unprivileged identity and is only used to assume
/// a role; everything else runs under `assumed` credentials.
#[derive(Debug, Clone)]
pub struct AwsContext {
    pub region: String,
    credentials: Option<TemporaryCredentials>,
}

impl AwsContext {
    pub fn caller(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            credentials: None,
        }
    }

    pub fn assumed(region: impl Into<String>, credentials: TemporaryCredentials) -> Self {
        Self {
            region: region.into(),
            credentials: Some(credentials),
        }
    }

    pub fn credentials(&self) -> Option<&TemporaryCredentials> {
        self.credentials.as_ref()
    }

    pub fn is_assumed(&self) -> bool {
        self.credentials.is_some()
    }
}

/// STS role session name: 2-64 characters of `[A-Za-z0-9_+=,.@-]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionName(String);

impl SessionName {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidSessionName> {
        let name = name.into();
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_+=,.@-".contains(c));
        if (2..=64).contains(&name.len()) && valid_chars {
            Ok(Self(name))
        } else {
            Err(InvalidSessionName(name))
        }
    }

    /// Session name for a release: `JOB_NAME` (with `/` replaced by `-`),
    /// then `EMAIL`, then `fallback`.
    pub fn for_release(
        job_name: Option<&str>,
        email: Option<&str>,
        fallback: &str,
    ) -> Result<Self, InvalidSessionName> {
        match (job_name, email) {
            (Some(job), _) => Self::new(job.replace('/', "-")),
            (None, Some(email)) => Self::new(email),
            (None, None) => Self::new(fallback),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid role session name {0:?}: must be 2-64 characters of [A-Za-z0-9_+=,.@-]")]
pub struct InvalidSessionName(pub String);
