use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which of a platform's two accounts to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Hosts registries and non-production infrastructure.
    Dev,
    /// Pulls released images.
    Prod,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str("dev"),
            Self::Prod => f.write_str("prod"),
        }
    }
}

/// One platform-config document: `{prefix}{kind}/{region}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformConfig {
    pub account_id: String,
}

/// Resolves platform accounts for a region.
pub trait PlatformSource {
    fn load(&self, region: &str, account_prefix: &str, kind: AccountKind)
    -> crate::Result<PlatformConfig>;
}

/// Reads platform-config JSON files from a checkout on disk.
pub struct FilePlatformSource {
    root: PathBuf,
}

impl FilePlatformSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, region: &str, account_prefix: &str, kind: AccountKind) -> PathBuf {
        self.root
            .join(format!("{account_prefix}{kind}"))
            .join(format!("{region}.json"))
    }
}

impl PlatformSource for FilePlatformSource {
    fn load(
        &self,
        region: &str,
        account_prefix: &str,
        kind: AccountKind,
    ) -> crate::Result<PlatformConfig> {
        let path = self.path_for(region, account_prefix, kind);
        read_platform_config(&path)
    }
}

fn read_platform_config(path: &Path) -> crate::Result<PlatformConfig> {
    if !path.exists() {
        return Err(crate::Error::PlatformConfigMissing(path.to_path_buf()));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::Error::PlatformConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    let config: PlatformConfig =
        serde_json::from_str(&content).map_err(|e| crate::Error::PlatformConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
    tracing::debug!(path = %path.display(), account_id = %config.account_id, "platform config loaded");
    Ok(config)
}
