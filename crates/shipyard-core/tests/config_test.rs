use shipyard_core::ShipyardConfig;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = ShipyardConfig::load(tmp.path()).unwrap();

    assert_eq!(config.paths.infra_dir, PathBuf::from("infra"));
    assert_eq!(config.paths.secrets_link, PathBuf::from("/tmp/secrets.json"));
    assert_eq!(
        config.paths.platform_config_dir,
        PathBuf::from("config/platform-config")
    );
    assert_eq!(config.hooks.pre_build, PathBuf::from("prepare-docker-build"));
    assert_eq!(config.hooks.post_build, PathBuf::from("on-docker-build"));
    assert_eq!(config.slug.builder_image, "flynn/slugbuilder");
    assert_eq!(config.slug.dockerfile, PathBuf::from("/infra/Dockerfile_slug"));
    assert_eq!(config.slug.cache_dir, PathBuf::from("/tmp/cache"));
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[paths]
infra_dir = "terraform"
secrets_link = "/run/secrets.json"
platform_config_dir = "../platform-config"

[hooks]
pre_build = "scripts/pre"
post_build = "scripts/post"

[slug]
builder_image = "registry.local/slugbuilder:2"
dockerfile = "docker/Dockerfile.slug"
cache_dir = "/var/cache/slug"
"#;
    std::fs::write(tmp.path().join("shipyard.toml"), toml).unwrap();

    let config = ShipyardConfig::load(tmp.path()).unwrap();

    assert_eq!(config.paths.infra_dir, PathBuf::from("terraform"));
    assert_eq!(config.paths.secrets_link, PathBuf::from("/run/secrets.json"));
    assert_eq!(
        config.paths.platform_config_dir,
        PathBuf::from("../platform-config")
    );
    assert_eq!(config.hooks.pre_build, PathBuf::from("scripts/pre"));
    assert_eq!(config.hooks.post_build, PathBuf::from("scripts/post"));
    assert_eq!(config.slug.builder_image, "registry.local/slugbuilder:2");
    assert_eq!(config.slug.dockerfile, PathBuf::from("docker/Dockerfile.slug"));
    assert_eq!(config.slug.cache_dir, PathBuf::from("/var/cache/slug"));
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[paths]
infra_dir = "tf"
"#;
    std::fs::write(tmp.path().join("shipyard.toml"), toml).unwrap();

    let config = ShipyardConfig::load(tmp.path()).unwrap();

    assert_eq!(config.paths.infra_dir, PathBuf::from("tf"));
    // Defaults preserved
    assert_eq!(config.paths.secrets_link, PathBuf::from("/tmp/secrets.json"));
    assert_eq!(config.slug.builder_image, "flynn/slugbuilder");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("shipyard.toml"), "not valid {{{{ toml").unwrap();

    let result = ShipyardConfig::load(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("shipyard.toml"), "").unwrap();

    let config = ShipyardConfig::load(tmp.path()).unwrap();
    assert_eq!(config.paths.infra_dir, PathBuf::from("infra"));
}
