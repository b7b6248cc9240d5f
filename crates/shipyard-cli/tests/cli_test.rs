use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn shipyard() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shipyard");
    cmd.env_remove("COMPONENT_NAME")
        .env_remove("JOB_NAME")
        .env_remove("EMAIL");
    cmd
}

// ── Help / Version ──

#[test]
fn shows_help() {
    shipyard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Release container images to ECR"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("infra"))
        .stdout(predicate::str::contains("terragrunt"));
}

#[test]
fn shows_version() {
    shipyard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shipyard"));
}

#[test]
fn release_help_lists_component_and_leg_flags() {
    shipyard()
        .args(["release", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--component-name"))
        .stdout(predicate::str::contains("--leg"));
}

// ── Infra Command ──

#[test]
fn infra_requires_arguments() {
    shipyard().arg("infra").assert().failure();
}

#[test]
fn infra_missing_variable_fails_without_touching_files() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("infra/.terraform")).unwrap();
    std::fs::write(tmp.path().join("infra/.terraform/terraform.tfstate"), "{}").unwrap();
    let secrets_link = tmp.path().join("secrets.json");
    std::fs::write(
        tmp.path().join("shipyard.toml"),
        format!("[paths]\nsecrets_link = {:?}\n", secrets_link.display().to_string()),
    )
    .unwrap();

    shipyard()
        .current_dir(tmp.path())
        .args([
            "infra",
            "plan",
            "-var",
            "env=staging",
            "-var",
            "component=payments",
            "-var",
            "account_id=111111111111",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: shipyard infra <command>"))
        .stderr(predicate::str::contains("missing -var aws_region=..."));

    assert!(!tmp.path().join("infra/state.tf").exists());
    assert!(tmp.path().join("infra/.terraform/terraform.tfstate").exists());
    assert!(secrets_link.symlink_metadata().is_err());
}

#[test]
fn terragrunt_missing_variable_fails_without_touching_files() {
    let tmp = TempDir::new().unwrap();

    shipyard()
        .current_dir(tmp.path())
        .args([
            "terragrunt",
            "plan",
            "-var",
            "env=staging",
            "-var",
            "component=payments",
            "-var",
            "aws_region=eu-west-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: shipyard terragrunt <command>"))
        .stderr(predicate::str::contains("missing -var account_id=..."));

    assert!(!tmp.path().join(".terragrunt").exists());
}

// ── Release Command ──

#[test]
fn release_without_service_json_fails() {
    let tmp = TempDir::new().unwrap();

    shipyard()
        .current_dir(tmp.path())
        .args(["release", "-c", "payments"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service.json not found"));
}

#[test]
fn release_rejects_empty_version() {
    let tmp = TempDir::new().unwrap();

    shipyard()
        .current_dir(tmp.path())
        .args(["release", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("version must not be empty"));
}

#[test]
fn release_requires_team() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("service.json"), r#"{"TYPE": "docker"}"#).unwrap();

    shipyard()
        .current_dir(tmp.path())
        .args(["release", "-c", "payments"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TEAM missing"));
}

#[test]
fn release_without_platform_config_points_at_it() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("service.json"), r#"{"TEAM": "payments-team"}"#).unwrap();

    shipyard()
        .current_dir(tmp.path())
        .args(["release", "-c", "payments"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("platform-config"));
}
