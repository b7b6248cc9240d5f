mod commands;

use clap::{Parser, Subcommand};
use shipyard::IacFlavor;

#[derive(Parser)]
#[command(name = "shipyard", about = "Release container images to ECR and run Terraform on AWS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the component image; with a VERSION, push it to ECR
    Release {
        /// Release version; omit for a local build tagged "dev"
        version: Option<String>,
        /// Component name (default: $COMPONENT_NAME, then the git remote)
        #[arg(long, short = 'c')]
        component_name: Option<String>,
        /// Deployment leg
        #[arg(long, short = 'l')]
        leg: Option<String>,
    },
    /// Run terraform with an account-scoped S3 state backend
    Infra {
        /// Arguments passed to terraform; must set env, component, aws_region
        /// and account_id via -var name=value
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Run terragrunt with an account-scoped S3 state backend
    Terragrunt {
        /// Arguments passed to terragrunt; must set env, component, aws_region
        /// and account_id via -var name=value
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="unset or invalid RUST_LOG falls back to info"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Release {
            version,
            component_name,
            leg,
        } => commands::release(version, component_name, leg).await?,
        Commands::Infra { args } => commands::infra(&args, IacFlavor::Terraform).await?,
        Commands::Terragrunt { args } => commands::infra(&args, IacFlavor::Terragrunt).await?,
    }

    Ok(())
}
