//! Core types and configuration for shipyard.
//!
//! This crate defines the `shipyard.toml` schema ([`ShipyardConfig`]),
//! the `service.json` metadata model ([`ServiceMetadata`]), platform account
//! lookup ([`PlatformConfig`]), the release identity ([`IdentityContext`]),
//! and shared error types.

pub mod config;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod platform;

pub use config::{HookConfig, PathConfig, ShipyardConfig, SlugConfig};
pub use error::{Error, Result};
pub use identity::{IdentityContext, ImageReference, Version, component_from_remote};
pub use metadata::{BuildType, JsonMetadataSource, MetadataSource, RawMetadata, ServiceMetadata};
pub use platform::{AccountKind, FilePlatformSource, PlatformConfig, PlatformSource};
