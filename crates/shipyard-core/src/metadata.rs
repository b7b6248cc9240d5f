use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Category of container build a component uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    /// Source is first turned into a slug by a builder image.
    Slug,
    /// The component ships its own Dockerfile.
    Docker,
}

impl BuildType {
    fn from_name(name: &str) -> Self {
        if name == "slug" { Self::Slug } else { Self::Docker }
    }
}

/// `service.json` as written by the component, before defaults.
///
/// Keys not used by shipyard (deployment settings and the like) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawMetadata {
    pub team: Option<String>,
    #[serde(rename = "TYPE")]
    pub build_type: Option<String>,
    pub docker_build_dir: Option<String>,
    pub slug_builder_docker_opts: Option<String>,
    pub region: Option<String>,
    pub account_prefix: Option<String>,
}

/// Component metadata with defaults applied. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMetadata {
    pub team: String,
    pub build_type: BuildType,
    pub docker_build_dir: PathBuf,
    pub slug_builder_docker_opts: String,
    /// Region hosting the registry and the release credentials
    pub region: String,
    pub account_prefix: String,
}

impl ServiceMetadata {
    /// Merge defaults into raw metadata. Pure; `TEAM` is the only required key.
    pub fn with_defaults(raw: RawMetadata) -> crate::Result<Self> {
        let team = raw.team.ok_or(crate::Error::MissingTeam)?;

        Ok(Self {
            team,
            build_type: raw
                .build_type
                .as_deref()
                .map(BuildType::from_name)
                // arch-lint: allow(no-silent-result-drop) reason="absent keys take their documented defaults"
                .unwrap_or(BuildType::Docker),
            // arch-lint: allow(no-silent-result-drop) reason="absent keys take their documented defaults"
            docker_build_dir: PathBuf::from(raw.docker_build_dir.as_deref().unwrap_or(".")),
            // arch-lint: allow(no-silent-result-drop) reason="absent keys take their documented defaults"
            slug_builder_docker_opts: raw.slug_builder_docker_opts.unwrap_or_default(),
            // arch-lint: allow(no-silent-result-drop) reason="absent keys take their documented defaults"
            region: raw.region.unwrap_or_else(|| "eu-west-1".to_owned()),
            // arch-lint: allow(no-silent-result-drop) reason="absent keys take their documented defaults"
            account_prefix: raw.account_prefix.unwrap_or_else(|| "mmg".to_owned()),
        })
    }

    /// Load through `source` and apply defaults.
    pub fn load(source: &impl MetadataSource) -> crate::Result<Self> {
        Self::with_defaults(source.load()?)
    }
}

/// Where raw service metadata comes from.
pub trait MetadataSource {
    fn load(&self) -> crate::Result<RawMetadata>;
}

/// Reads `service.json` from a project directory.
pub struct JsonMetadataSource {
    path: PathBuf,
}

impl JsonMetadataSource {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            path: project_dir.join("service.json"),
        }
    }
}

impl MetadataSource for JsonMetadataSource {
    fn load(&self) -> crate::Result<RawMetadata> {
        if !self.path.exists() {
            return Err(crate::Error::MetadataMissing(self.path.clone()));
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| crate::Error::MetadataRead {
                path: self.path.clone(),
                source: e,
            })?;
        serde_json::from_str(&content).map_err(|e| crate::Error::MetadataParse {
            path: self.path.clone(),
            source: e,
        })
    }
}
