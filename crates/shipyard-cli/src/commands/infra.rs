use anyhow::Context;
use shipyard::{IacFlavor, InfraArgs, InfraRunner, ShipyardConfig};
use std::path::PathBuf;

/// Run terraform or terragrunt with `args` forwarded verbatim.
pub async fn infra(args: &[String], flavor: IacFlavor) -> anyhow::Result<()> {
    let parsed = InfraArgs::parse(args, flavor).with_context(|| {
        format!(
            "usage: shipyard {} <command> -var env=... -var component=... \
             -var aws_region=... -var account_id=...",
            subcommand(flavor)
        )
    })?;

    let project_dir = PathBuf::from(".");
    let config = ShipyardConfig::load(&project_dir)?;

    let outcome = InfraRunner::new(&project_dir, &config, flavor)
        .run(&parsed)
        .await
        .with_context(|| format!("{} run failed", flavor.program()))?;

    super::print_steps(&outcome.steps);
    Ok(())
}

fn subcommand(flavor: IacFlavor) -> &'static str {
    match flavor {
        IacFlavor::Terraform => "infra",
        IacFlavor::Terragrunt => "terragrunt",
    }
}
