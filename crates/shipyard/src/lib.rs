//! Release and infrastructure pipelines.
//!
//! [`ReleasePipeline`] builds a component's image and, when a version is
//! given, publishes it to the dev account's ECR registry. [`InfraRunner`]
//! runs Terraform or Terragrunt against the account-scoped S3 state
//! backend under assumed admin credentials.
//!
//! Both take their collaborators as type parameters with real defaults, so
//! tests can substitute any step.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use shipyard::{InfraRunner, IacFlavor, InfraArgs, ShipyardConfig};
//!
//! # async fn run() -> Result<(), shipyard::Error> {
//! let config = ShipyardConfig::load(Path::new("."))?;
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! let args = InfraArgs::parse(&args, IacFlavor::Terraform)?;
//! let outcome = InfraRunner::new(Path::new("."), &config, IacFlavor::Terraform)
//!     .run(&args)
//!     .await?;
//! for step in outcome.steps {
//!     println!("{step}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod infra;
pub mod registry;
pub mod release;

pub use error::{BuildError, ConfigurationError, Error, InfraError, Result};
pub use infra::{InfraOutcome, InfraRunner};
pub use registry::RegistryAuthenticator;
pub use release::{ReleaseOutcome, ReleasePipeline, ReleasePlan, SessionSource};

pub use shipyard_core::{
    AccountKind, BuildType, FilePlatformSource, IdentityContext, ImageReference,
    JsonMetadataSource, PlatformSource, ServiceMetadata, ShipyardConfig, Version,
    component_from_remote,
};
pub use shipyard_infra::{IacFlavor, InfraArgs};
