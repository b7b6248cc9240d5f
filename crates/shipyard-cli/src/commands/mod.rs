mod infra;
mod release;

use anyhow::Context;
use std::path::Path;

pub use infra::infra;
pub use release::release;

/// Component name from the flag, then `COMPONENT_NAME`, then the git remote.
pub(crate) async fn resolve_component(
    flag: Option<String>,
    project_dir: &Path,
) -> anyhow::Result<String> {
    if let Some(name) = flag.filter(|n| !n.is_empty()) {
        return Ok(name);
    }
    if let Some(name) = env_var("COMPONENT_NAME") {
        return Ok(name);
    }

    let output = tokio::process::Command::new("git")
        .args(["config", "remote.origin.url"])
        .current_dir(project_dir)
        .output()
        .await
        .context("failed to run git to find the component name")?;
    if !output.status.success() {
        anyhow::bail!(
            "no component name: pass --component-name, set COMPONENT_NAME, \
             or run inside a git checkout with an origin remote"
        );
    }

    let remote = String::from_utf8_lossy(&output.stdout);
    tracing::debug!(remote = %remote.trim(), "component name from git remote");
    Ok(shipyard::component_from_remote(&remote)?)
}

/// A non-empty environment variable.
pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        // arch-lint: allow(no-silent-result-drop) reason="unset or non-UTF-8 variables fall through to the next source"
        .ok()
        .filter(|v| !v.is_empty())
}

pub(crate) fn print_steps(steps: &[String]) {
    for step in steps {
        println!("  {step}");
    }
}
