use std::path::{Path, PathBuf};

/// Which IaC front-end drives the run. Both share the S3 state bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IacFlavor {
    Terraform,
    Terragrunt,
}

/// One IaC tool process: program, arguments, and working directory
/// relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl IacFlavor {
    pub fn program(self) -> &'static str {
        match self {
            Self::Terraform => "terraform",
            Self::Terragrunt => "terragrunt",
        }
    }

    /// Fixed STS session name for privileged IaC runs.
    pub fn session_name(self) -> &'static str {
        self.program()
    }

    /// `name=` assignments read from the forwarded arguments when present.
    pub fn optional_vars(self) -> &'static [&'static str] {
        match self {
            Self::Terraform => &["state_aws_region"],
            Self::Terragrunt => &[],
        }
    }

    /// Where the rendered backend config is written, relative to the project root.
    pub fn backend_config_path(self, infra_dir: &Path) -> PathBuf {
        match self {
            Self::Terraform => infra_dir.join("state.tf"),
            Self::Terragrunt => PathBuf::from(".terragrunt"),
        }
    }

    /// The tool's local working directory, relative to the project root.
    pub fn working_dir(self, infra_dir: &Path) -> PathBuf {
        match self {
            Self::Terraform => infra_dir.join(".terraform"),
            Self::Terragrunt => PathBuf::from(".terraform"),
        }
    }

    /// Initialisation followed by the operator's command, arguments verbatim.
    pub fn invocations(self, forwarded: &[String], infra_dir: &Path) -> Vec<Invocation> {
        let infra = infra_dir.to_string_lossy().into_owned();
        match self {
            Self::Terraform => vec![
                Invocation {
                    program: "terraform",
                    args: vec!["init".to_owned()],
                    cwd: infra_dir.to_path_buf(),
                },
                Invocation {
                    program: "terraform",
                    args: forwarded.to_vec(),
                    cwd: infra_dir.to_path_buf(),
                },
            ],
            Self::Terragrunt => {
                let mut args = forwarded.to_vec();
                args.push(infra.clone());
                vec![
                    Invocation {
                        program: "terragrunt",
                        args: vec!["get".to_owned(), infra],
                        cwd: PathBuf::from("."),
                    },
                    Invocation {
                        program: "terragrunt",
                        args,
                        cwd: PathBuf::from("."),
                    },
                ]
            }
        }
    }
}
