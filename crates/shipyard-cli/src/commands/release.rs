use anyhow::Context;
use shipyard::{
    AccountKind, FilePlatformSource, IdentityContext, JsonMetadataSource, PlatformSource,
    ReleasePipeline, ReleasePlan, ServiceMetadata, SessionSource, ShipyardConfig, Version,
};
use std::path::PathBuf;

/// Build the component image and push it when a version is given.
pub async fn release(
    version: Option<String>,
    component_name: Option<String>,
    leg: Option<String>,
) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");

    let version = version.map(Version::new).transpose()?;
    let config = ShipyardConfig::load(&project_dir)?;
    let metadata = ServiceMetadata::load(&JsonMetadataSource::new(&project_dir))?;
    let component = super::resolve_component(component_name, &project_dir).await?;

    let platform = FilePlatformSource::new(project_dir.join(&config.paths.platform_config_dir));
    let dev = platform
        .load(&metadata.region, &metadata.account_prefix, AccountKind::Dev)
        .context("failed to load dev account")?;
    let prod = platform
        .load(&metadata.region, &metadata.account_prefix, AccountKind::Prod)
        .context("failed to load prod account")?;

    let session = SessionSource {
        job_name: super::env_var("JOB_NAME"),
        email: super::env_var("EMAIL"),
    };

    let plan = ReleasePlan {
        identity: IdentityContext {
            account_id: dev.account_id,
            region: metadata.region.clone(),
            component,
            environment: None,
            version,
            leg,
        },
        prod_account_id: prod.account_id,
        metadata,
        session,
        project_dir: project_dir.clone(),
    };

    println!("Releasing {}...", plan.identity.image_reference());
    let outcome = ReleasePipeline::new(&project_dir, &config)
        .run(&plan)
        .await
        .context("release failed")?;

    super::print_steps(&outcome.steps);
    println!();
    if outcome.pushed {
        println!("Pushed: {}", outcome.image);
    } else {
        println!("Built: {}", outcome.image);
    }

    Ok(())
}
