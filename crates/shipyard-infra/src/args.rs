use crate::flavor::IacFlavor;

/// Variables pulled out of the forwarded IaC arguments.
///
/// The arguments themselves are forwarded untouched; these are only read so
/// the state backend and credentials can be prepared before the tool starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraArgs {
    pub environment: String,
    pub component: String,
    pub aws_region: String,
    pub account_id: String,
    pub state_aws_region: Option<String>,
    pub forwarded: Vec<String>,
}

impl InfraArgs {
    /// Scan `args` for `name=value` assignments. The value is everything after
    /// the first `=`; when a name appears more than once the last one wins.
    pub fn parse(args: &[String], flavor: IacFlavor) -> Result<Self, InfraArgsError> {
        let required = |name: &str| {
            find_var(args, name).ok_or_else(|| InfraArgsError::Missing {
                name: name.to_owned(),
            })
        };

        let environment = required("env")?;
        let component = required("component")?;
        let aws_region = required("aws_region")?;
        let account_id = required("account_id")?;
        let state_aws_region = if flavor.optional_vars().contains(&"state_aws_region") {
            find_var(args, "state_aws_region")
        } else {
            None
        };

        Ok(Self {
            environment,
            component,
            aws_region,
            account_id,
            state_aws_region,
            forwarded: args.to_vec(),
        })
    }

    /// Region holding the state bucket; defaults to the deployment region.
    pub fn state_region(&self) -> &str {
        // arch-lint: allow(no-silent-result-drop) reason="state_aws_region is optional"
        self.state_aws_region.as_deref().unwrap_or(&self.aws_region)
    }
}

fn find_var(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .filter_map(|arg| arg.split_once('='))
        .filter(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
        .next_back()
}

#[derive(Debug, thiserror::Error)]
pub enum InfraArgsError {
    #[error("missing -var {name}=... in infra arguments")]
    Missing { name: String },
}
