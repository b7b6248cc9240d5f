use crate::flavor::IacFlavor;

/// Every state bucket starts with this; the rest is derived from the account.
pub const BUCKET_PREFIX: &str = "terraform-tfstate-";

/// DynamoDB table holding Terraform state locks.
pub const LOCK_TABLE: &str = "terraform_locks";

/// DynamoDB table used by the legacy Terragrunt lock config.
pub const TERRAGRUNT_LOCK_TABLE: &str = "terragrunt_locks";

/// `terraform-tfstate-` followed by the first 6 hex characters of md5(account_id).
pub fn bucket_name(account_id: &str) -> String {
    let digest = format!("{:x}", md5::compute(account_id.as_bytes()));
    format!("{BUCKET_PREFIX}{}", &digest[..6])
}

/// Where and how a component's remote state is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendLocation {
    pub bucket: String,
    pub environment: String,
    pub component: String,
    pub region: String,
}

impl BackendLocation {
    pub fn new(account_id: &str, region: &str, environment: &str, component: &str) -> Self {
        Self {
            bucket: bucket_name(account_id),
            environment: environment.to_owned(),
            component: component.to_owned(),
            region: region.to_owned(),
        }
    }

    /// `{environment}/{component}/terraform.tfstate`
    pub fn key(&self) -> String {
        format!("{}/{}/terraform.tfstate", self.environment, self.component)
    }

    /// Render the backend configuration the IaC tool reads at startup. Pure.
    pub fn render(&self, flavor: IacFlavor) -> String {
        match flavor {
            IacFlavor::Terraform => format!(
                r#"
terraform {{
  backend "s3" {{
    bucket = "{bucket}"
    key    = "{key}"
    region = "{region}"
    dynamodb_table = "{lock_table}"
  }}
}}
"#,
                bucket = self.bucket,
                key = self.key(),
                region = self.region,
                lock_table = LOCK_TABLE,
            ),
            IacFlavor::Terragrunt => format!(
                r#"lock = {{
  backend = "dynamodb"
  config {{
    state_file_id = "{env}-{component}"
    aws_region = "{region}"
    table_name = "{lock_table}"
    max_lock_retries = 360
  }}
}}
remote_state = {{
  backend = "s3"
  config {{
    encrypt = "true"
    bucket = "{bucket}"
    key = "{key}"
    region = "{region}"
  }}
}}"#,
                env = self.environment,
                component = self.component,
                region = self.region,
                lock_table = TERRAGRUNT_LOCK_TABLE,
                bucket = self.bucket,
                key = self.key(),
            ),
        }
    }
}
