use std::fmt;

/// Tag used for images built without a release version.
pub const DEV_TAG: &str = "dev";

/// A release version. Never empty; absence is modelled as `Option<Version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> crate::Result<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(crate::Error::EmptyVersion);
        }
        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who and what is being released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    /// Account hosting the registry
    pub account_id: String,
    pub region: String,
    pub component: String,
    pub environment: Option<String>,
    pub version: Option<Version>,
    /// Suffix distinguishing parallel deployments of the same component
    pub leg: Option<String>,
}

impl IdentityContext {
    /// Fully qualified reference of the image this release produces.
    pub fn image_reference(&self) -> ImageReference {
        ImageReference {
            account_id: self.account_id.clone(),
            region: self.region.clone(),
            component: self.component.clone(),
            tag: self
                .version
                .as_ref()
                .map_or_else(|| DEV_TAG.to_owned(), |v| v.as_str().to_owned()),
        }
    }

    /// `{component}-{version}`, or `{component}-dev` for unversioned builds.
    pub fn build_identifier(&self) -> String {
        let version = self.version.as_ref().map_or(DEV_TAG, Version::as_str);
        format!("{}-{}", self.component, version)
    }
}

/// `{account}.dkr.ecr.{region}.amazonaws.com/{component}:{tag}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub account_id: String,
    pub region: String,
    pub component: String,
    pub tag: String,
}

impl ImageReference {
    /// Registry host, without scheme.
    pub fn registry(&self) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", self.account_id, self.region)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry(), self.component, self.tag)
    }
}

/// Extract the repository name from a git remote URL.
///
/// Accepts the last path segment with an optional `.git` suffix; segments
/// containing dots are rejected.
pub fn component_from_remote(remote: &str) -> crate::Result<String> {
    let trimmed = remote.trim();
    // arch-lint: allow(no-silent-result-drop) reason="the .git suffix is optional"
    let without_suffix = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let segment = without_suffix
        .rsplit_once('/')
        .map(|(_, last)| last)
        .filter(|last| !last.is_empty() && !last.contains('.'));

    segment
        .map(str::to_owned)
        .ok_or_else(|| crate::Error::ComponentFromRemote {
            remote: trimmed.to_owned(),
        })
}
