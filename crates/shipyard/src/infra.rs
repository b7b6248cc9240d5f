use crate::error::{InfraError, Result};
use shipyard_aws::{AwsClient, AwsExecutor, RealExecutor, SessionName};
use shipyard_aws::credentials::admin_role_arn;
use shipyard_core::ShipyardConfig;
use shipyard_infra::{
    BackendLocation, CliTool, CredstashSecrets, FsWorkspace, IacFlavor, IacTool, InfraArgs,
    LocalWorkspace, SecretsMaterializer,
};
use std::path::{Path, PathBuf};

/// Result of a successful infra run.
#[derive(Debug, Clone)]
pub struct InfraOutcome {
    pub steps: Vec<String>,
}

/// Clean → assume → backend → secrets → tool → clean.
pub struct InfraRunner<
    E: AwsExecutor = RealExecutor,
    W: LocalWorkspace = FsWorkspace,
    T: IacTool = CliTool,
    S: SecretsMaterializer = CredstashSecrets,
> {
    aws: AwsClient<E>,
    workspace: W,
    tool: T,
    secrets: S,
    flavor: IacFlavor,
    infra_dir: PathBuf,
}

impl InfraRunner {
    pub fn new(project_dir: &Path, config: &ShipyardConfig, flavor: IacFlavor) -> Self {
        Self {
            aws: AwsClient::new(),
            workspace: FsWorkspace::from_config(project_dir, &config.paths, flavor),
            tool: CliTool::new(project_dir),
            secrets: CredstashSecrets::new(),
            flavor,
            infra_dir: config.paths.infra_dir.clone(),
        }
    }
}

impl<E, W, T, S> InfraRunner<E, W, T, S>
where
    E: AwsExecutor,
    W: LocalWorkspace,
    T: IacTool,
    S: SecretsMaterializer,
{
    pub fn with_parts(
        aws: AwsClient<E>,
        workspace: W,
        tool: T,
        secrets: S,
        flavor: IacFlavor,
        infra_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            aws,
            workspace,
            tool,
            secrets,
            flavor,
            infra_dir: infra_dir.into(),
        }
    }

    /// Run the IaC tool with `args` forwarded verbatim.
    ///
    /// Local state is cleaned before and after, whether or not the run
    /// succeeds. When both the run and the final cleanup fail, the run's
    /// error is returned and the cleanup failure is logged.
    pub async fn run(&self, args: &InfraArgs) -> Result<InfraOutcome> {
        let mut steps = Vec::new();

        self.workspace.clean()?;
        steps.push("Local IaC state cleaned".to_string());

        let result = self.assume_and_run(args, &mut steps).await;

        match (result, self.workspace.clean()) {
            (Ok(()), Ok(_)) => {
                steps.push("Local IaC state cleaned".to_string());
                Ok(InfraOutcome { steps })
            }
            (Ok(()), Err(cleanup)) => Err(cleanup.into()),
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(cleanup)) => {
                tracing::warn!(error = %cleanup, "cleanup after failed run also failed");
                Err(e)
            }
        }
    }

    async fn assume_and_run(&self, args: &InfraArgs, steps: &mut Vec<String>) -> Result<()> {
        let session = SessionName::new(self.flavor.session_name())?;
        let credentials = self
            .aws
            .assume_role(&args.aws_region, &args.account_id, &session)
            .await?;
        steps.push(format!("Assumed {}", admin_role_arn(&args.account_id)));

        let location = BackendLocation::new(
            &args.account_id,
            args.state_region(),
            &args.environment,
            &args.component,
        );
        let path = self
            .workspace
            .write_backend_config(&location.render(self.flavor))
            .map_err(InfraError::from)?;
        steps.push(format!(
            "State backend s3://{}/{} written to {}",
            location.bucket,
            location.key(),
            path.display()
        ));

        let mut env = credentials.env_vars();
        env.push(("AWS_DEFAULT_REGION".to_owned(), args.aws_region.clone()));

        let secrets = self
            .secrets
            .materialize(&args.component, &args.environment, &env)
            .await
            .map_err(InfraError::from)?;
        let link = self
            .workspace
            .link_secrets(secrets.path())
            .map_err(InfraError::from)?;
        steps.push(format!("Secrets linked at {}", link.display()));

        for invocation in self.flavor.invocations(&args.forwarded, &self.infra_dir) {
            self.tool
                .run(&invocation, &env)
                .await
                .map_err(InfraError::from)?;
            steps.push(format!(
                "{} {}",
                invocation.program,
                invocation.args.join(" ")
            ));
        }

        Ok(())
    }
}
