//! Terraform/Terragrunt plumbing for shipyard.
//!
//! # Infra run
//!
//! ```text
//! shipyard infra <args>...
//!   1. Clean     ── rm state.tf, .terraform, /tmp/secrets.json
//!   2. Assume    ── sts assume-role arn:aws:iam::<account_id>:role/admin
//!   3. Backend   ── write infra/state.tf (bucket terraform-tfstate-<md5 prefix>)
//!   4. Secrets   ── credstash getall → temp file ← /tmp/secrets.json
//!   5. Run       ── terraform init; terraform <args>
//!   6. Clean     ── always, even when 2-5 fail
//! ```

pub mod args;
pub mod backend;
pub mod flavor;
pub mod secrets;
pub mod tool;
pub mod workspace;

pub use args::{InfraArgs, InfraArgsError};
pub use backend::{BackendLocation, bucket_name};
pub use flavor::{IacFlavor, Invocation};
pub use secrets::{CredstashSecrets, SecretsError, SecretsFile, SecretsMaterializer};
pub use tool::{CliTool, IacTool, ToolError};
pub use workspace::{CleanupError, FsWorkspace, LocalWorkspace, WorkspaceError};
