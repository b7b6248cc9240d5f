//! Container image builds, slug bundling, and build hooks for shipyard.
//!
//! # Release build
//!
//! ```text
//! shipyard release [VERSION]
//!   1. Slug        ── tar | docker run flynn/slugbuilder → target/slug.tgz  (TYPE = slug)
//!   2. Pre-build   ── ./prepare-docker-build <component>-<version> <build dir>
//!   3. Build       ── docker build -t <image> <build dir>
//!   4. Post-build  ── ./on-docker-build <image>
//!   5. Push        ── docker login (per endpoint) → docker push  (VERSION given)
//! ```
//!
//! # Slug contents
//!
//! Every top-level entry of the project directory is streamed to the
//! builder except `.git`, `build`, `target`, `infrastructure` and
//! `node_modules`.

pub mod docker;
pub mod hooks;
pub mod slug;

pub use docker::{ContainerTool, DockerCli, DockerError};
pub use hooks::{BuildHooks, HookError, HookOutcome, ScriptHooks};
pub use slug::{DockerSlugBuilder, SlugBuilder, SlugError};
