use crate::error::{BuildError, Result};
use crate::registry::RegistryAuthenticator;
use shipyard_aws::{
    AwsClient, AwsContext, AwsExecutor, InvalidSessionName, RealExecutor, RepositoryStatus,
    SessionName,
};
use shipyard_build::{
    BuildHooks, ContainerTool, DockerCli, DockerSlugBuilder, HookOutcome, ScriptHooks, SlugBuilder,
};
use shipyard_core::{BuildType, IdentityContext, ImageReference, ServiceMetadata, ShipyardConfig};
use std::path::{Path, PathBuf};

/// Everything a release needs, resolved up front by the caller.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub project_dir: PathBuf,
    /// `account_id` is the dev account, which hosts the registry.
    pub identity: IdentityContext,
    /// Granted pull access on newly created repositories.
    pub prod_account_id: String,
    pub metadata: ServiceMetadata,
    pub session: SessionSource,
}

/// Session name used when neither a job name nor an email is known.
const FALLBACK_SESSION_NAME: &str = "shipyard-release";

/// Raw inputs for the STS session name. Only validated when publishing, so
/// local builds never depend on them.
#[derive(Debug, Clone, Default)]
pub struct SessionSource {
    /// CI job name; `/` is replaced by `-`.
    pub job_name: Option<String>,
    pub email: Option<String>,
}

impl SessionSource {
    pub fn resolve(&self) -> std::result::Result<SessionName, InvalidSessionName> {
        SessionName::for_release(
            self.job_name.as_deref(),
            self.email.as_deref(),
            FALLBACK_SESSION_NAME,
        )
    }
}

/// Result of a successful release.
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    pub image: ImageReference,
    pub pushed: bool,
    pub steps: Vec<String>,
}

/// Build → hooks → (provision → login → push).
pub struct ReleasePipeline<
    E: AwsExecutor = RealExecutor,
    D: ContainerTool = DockerCli,
    H: BuildHooks = ScriptHooks,
    S: SlugBuilder = DockerSlugBuilder,
> {
    aws: AwsClient<E>,
    docker: D,
    hooks: H,
    slug: S,
}

impl ReleasePipeline {
    pub fn new(project_dir: &Path, config: &ShipyardConfig) -> Self {
        Self {
            aws: AwsClient::new(),
            docker: DockerCli::new(project_dir),
            hooks: ScriptHooks::new(project_dir, &config.hooks),
            slug: DockerSlugBuilder::new(config.slug.clone()),
        }
    }
}

impl<E, D, H, S> ReleasePipeline<E, D, H, S>
where
    E: AwsExecutor,
    D: ContainerTool,
    H: BuildHooks,
    S: SlugBuilder,
{
    pub fn with_parts(aws: AwsClient<E>, docker: D, hooks: H, slug: S) -> Self {
        Self {
            aws,
            docker,
            hooks,
            slug,
        }
    }

    /// Run the release. Without a version the image is only built locally
    /// and no AWS call is made.
    pub async fn run(&self, plan: &ReleasePlan) -> Result<ReleaseOutcome> {
        let identity = &plan.identity;
        let image = identity.image_reference();
        let image_name = image.to_string();
        let mut steps = Vec::new();

        tracing::info!(
            component = %identity.component,
            team = %plan.metadata.team,
            leg = ?identity.leg,
            "starting release"
        );
        if let Some(leg) = &identity.leg {
            steps.push(format!("Leg: {leg}"));
        }

        // Build directory
        let build_dir = match plan.metadata.build_type {
            BuildType::Slug => {
                let dir = self
                    .slug
                    .build_slug(&plan.project_dir, &plan.metadata.slug_builder_docker_opts)
                    .await
                    .map_err(BuildError::from)?;
                steps.push(format!("Slug built in {}", dir.display()));
                dir
            }
            BuildType::Docker => plan.metadata.docker_build_dir.clone(),
        };

        // Image
        let identifier = identity.build_identifier();
        if self.hooks.pre_build(&identifier, &build_dir).await? == HookOutcome::Ran {
            steps.push("Pre-build hook ran".to_string());
        }

        self.docker
            .build(&image_name, &build_dir)
            .await
            .map_err(|e| BuildError::Image {
                image: image_name.clone(),
                source: e,
            })?;
        steps.push(format!("Image built: {image_name}"));

        if self.hooks.post_build(&image_name).await? == HookOutcome::Ran {
            steps.push("Post-build hook ran".to_string());
        }

        // Publish
        let Some(version) = &identity.version else {
            tracing::info!("no version supplied, push skipped");
            steps.push("No version supplied, push skipped".to_string());
            return Ok(ReleaseOutcome {
                image,
                pushed: false,
                steps,
            });
        };

        tracing::info!(%version, "publishing");
        let session = plan.session.resolve()?;
        let credentials = self
            .aws
            .assume_role(&identity.region, &identity.account_id, &session)
            .await?;
        let context = AwsContext::assumed(identity.region.clone(), credentials);
        steps.push(format!("Assumed admin role in {}", identity.account_id));

        let status = self
            .aws
            .ensure_repository(&context, &identity.component, &plan.prod_account_id)
            .await?;
        steps.push(match status {
            RepositoryStatus::Existing => format!("Repository {} exists", identity.component),
            RepositoryStatus::Created => format!("Repository {} created", identity.component),
        });

        let endpoints = RegistryAuthenticator::new(&self.aws, &self.docker)
            .login(&context)
            .await?;
        steps.push(format!("Logged in to {} registry endpoint(s)", endpoints.len()));

        self.docker
            .push(&image_name)
            .await
            .map_err(|e| BuildError::Push {
                image: image_name.clone(),
                source: e,
            })?;
        steps.push(format!("Pushed {image_name}"));

        Ok(ReleaseOutcome {
            image,
            pushed: true,
            steps,
        })
    }
}
