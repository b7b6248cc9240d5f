use std::path::Path;

use shipyard_infra::{FsWorkspace, IacFlavor, LocalWorkspace, SecretsFile};
use tempfile::TempDir;

fn workspace(root: &Path, flavor: IacFlavor) -> FsWorkspace {
    FsWorkspace::new(root, Path::new("infra"), root.join("secrets.json"), flavor)
}

#[test]
fn clean_on_empty_project_is_a_no_op() {
    let tmp = TempDir::new().unwrap();

    let removed = workspace(tmp.path(), IacFlavor::Terraform).clean().unwrap();

    assert!(removed.is_empty());
}

#[test]
fn clean_removes_backend_config_working_dir_and_link() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path(), IacFlavor::Terraform);
    ws.write_backend_config("terraform {}").unwrap();
    std::fs::create_dir_all(tmp.path().join("infra/.terraform/modules")).unwrap();
    let secrets = SecretsFile::write(b"{}").unwrap();
    ws.link_secrets(secrets.path()).unwrap();

    let removed = ws.clean().unwrap();

    assert_eq!(removed.len(), 3);
    assert!(!tmp.path().join("infra/state.tf").exists());
    assert!(!tmp.path().join("infra/.terraform").exists());
    assert!(std::fs::symlink_metadata(tmp.path().join("secrets.json")).is_err());
    assert!(secrets.path().exists());
}

#[test]
fn clean_leaves_iac_sources_alone() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("infra")).unwrap();
    std::fs::write(tmp.path().join("infra/main.tf"), "").unwrap();

    workspace(tmp.path(), IacFlavor::Terraform).clean().unwrap();

    assert!(tmp.path().join("infra/main.tf").exists());
}

#[test]
fn terraform_backend_config_lands_in_infra_dir() {
    let tmp = TempDir::new().unwrap();

    let path = workspace(tmp.path(), IacFlavor::Terraform)
        .write_backend_config("contents")
        .unwrap();

    assert_eq!(path, tmp.path().join("infra/state.tf"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "contents");
}

#[test]
fn terragrunt_backend_config_lands_in_project_root() {
    let tmp = TempDir::new().unwrap();

    let path = workspace(tmp.path(), IacFlavor::Terragrunt)
        .write_backend_config("contents")
        .unwrap();

    assert_eq!(path, tmp.path().join(".terragrunt"));
}

#[cfg(unix)]
#[test]
fn link_secrets_replaces_a_stale_link() {
    let tmp = TempDir::new().unwrap();
    let ws = workspace(tmp.path(), IacFlavor::Terraform);
    let old = SecretsFile::write(b"old").unwrap();
    let new = SecretsFile::write(b"new").unwrap();

    ws.link_secrets(old.path()).unwrap();
    let link = ws.link_secrets(new.path()).unwrap();

    assert_eq!(std::fs::read_link(&link).unwrap(), new.path());
    assert_eq!(std::fs::read_to_string(&link).unwrap(), "new");
}
