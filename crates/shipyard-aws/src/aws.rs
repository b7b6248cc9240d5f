#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    #[error("aws CLI not found, install it from https://aws.amazon.com/cli/")]
    NotFound { source: std::io::Error },

    #[error("{operation} rejected with {code}: {message}")]
    Service {
        code: String,
        operation: String,
        message: String,
    },

    #[error("aws command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("aws output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("unexpected aws output")]
    InvalidOutput { source: serde_json::Error },
}

impl AwsError {
    /// Service error code, when the API (not the CLI) rejected the call.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Parse the CLI's `An error occurred (Code) when calling the Op operation: msg`.
pub fn parse_service_error(stderr: &str) -> Option<AwsError> {
    let line = stderr
        .lines()
        .find(|l| l.contains("An error occurred ("))?;
    let rest = line.split_once("An error occurred (")?.1;
    let (code, rest) = rest.split_once(')')?;
    let rest = rest.trim_start().strip_prefix("when calling the ")?;
    let (operation, message) = rest.split_once(" operation")?;
    let message = message
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .to_owned();

    Some(AwsError::Service {
        code: code.to_owned(),
        operation: operation.to_owned(),
        message,
    })
}
