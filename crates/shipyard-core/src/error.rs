use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Service metadata ──
    #[error("{0} not found")]
    MetadataMissing(PathBuf),

    #[error("failed to read service metadata at {path}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed service metadata at {path}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("TEAM missing from service metadata (service.json)")]
    MissingTeam,

    // ── Platform config ──
    #[error("{0} not found (maybe you need to pull in a platform-config repo?)")]
    PlatformConfigMissing(PathBuf),

    #[error("failed to read platform config at {path}")]
    PlatformConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed platform config at {path}")]
    PlatformConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ── Identity ──
    #[error("release version must not be empty")]
    EmptyVersion,

    #[error("could not get component name from remote {remote:?}")]
    ComponentFromRemote { remote: String },
}
