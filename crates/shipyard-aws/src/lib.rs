//! AWS operations for shipyard, driven through the `aws` CLI.
//!
//! Every call takes an explicit [`AwsContext`]: the caller's ambient identity
//! is only used by [`AwsClient::assume_role`]; registry calls require
//! assumed credentials.

pub mod aws;
pub mod client;
pub mod credentials;
pub mod executor;

pub use aws::AwsError;
pub use client::{
    AuthorizationData, AwsClient, CredentialError, RegistryError, RepositoryLookup,
    RepositoryStatus, pull_policy,
};
pub use credentials::{AwsContext, InvalidSessionName, SessionName, TemporaryCredentials};
pub use executor::{AwsExecutor, RealExecutor};
