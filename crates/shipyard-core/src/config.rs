use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// shipyard.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipyardConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub hooks: HookConfig,
    #[serde(default)]
    pub slug: SlugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory holding the IaC sources, relative to the project root
    #[serde(default = "default_infra_dir")]
    pub infra_dir: PathBuf,
    /// Well-known location where decrypted runtime secrets are exposed
    #[serde(default = "default_secrets_link")]
    pub secrets_link: PathBuf,
    /// Root of the platform-config checkout
    #[serde(default = "default_platform_config_dir")]
    pub platform_config_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Executable run before `docker build`
    #[serde(default = "default_pre_build_hook")]
    pub pre_build: PathBuf,
    /// Executable run after a successful `docker build`
    #[serde(default = "default_post_build_hook")]
    pub post_build: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugConfig {
    /// Image that turns a source tarball into a slug
    #[serde(default = "default_builder_image")]
    pub builder_image: String,
    /// Dockerfile staged next to the slug
    #[serde(default = "default_slug_dockerfile")]
    pub dockerfile: PathBuf,
    /// Host directory mounted as the builder's cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            infra_dir: default_infra_dir(),
            secrets_link: default_secrets_link(),
            platform_config_dir: default_platform_config_dir(),
        }
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            pre_build: default_pre_build_hook(),
            post_build: default_post_build_hook(),
        }
    }
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            builder_image: default_builder_image(),
            dockerfile: default_slug_dockerfile(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl ShipyardConfig {
    /// Load from shipyard.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("shipyard.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no shipyard.toml, using defaults");
            Ok(Self::default())
        }
    }
}

fn default_infra_dir() -> PathBuf {
    PathBuf::from("infra")
}

fn default_secrets_link() -> PathBuf {
    PathBuf::from("/tmp/secrets.json")
}

fn default_platform_config_dir() -> PathBuf {
    PathBuf::from("config/platform-config")
}

fn default_pre_build_hook() -> PathBuf {
    PathBuf::from("prepare-docker-build")
}

fn default_post_build_hook() -> PathBuf {
    PathBuf::from("on-docker-build")
}

fn default_builder_image() -> String {
    "flynn/slugbuilder".to_owned()
}

fn default_slug_dockerfile() -> PathBuf {
    PathBuf::from("/infra/Dockerfile_slug")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("/tmp/cache")
}
