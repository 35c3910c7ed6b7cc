//! Test fixtures and constants.

/// Stacks of the default set for `dev`, in synthesis order.
pub const DEV_STACKS: [&str; 3] = [
    "hrmgo-us-east-2-stack-dev-app-pipeline",
    "hrmgo-us-east-2-stack-dev-infra-pipeline",
    "hrmgo-us-east-2-stack-dev-cicd-pipeline",
];

/// A registry with a `qa` environment next to a renamed `dev`.
pub const REGISTRY_QA: &str = r#"
[environments.dev]
region = "us-east-2"
project = "hrmgo"
environment = "dev"
owner_account = "mtoribio"
account_id = "884162918988"
app = { repo = "NewHRMv2.0", branch = "dev_morrison" }
infra = { repo = "HRMGO_INFRA", branch = "development" }
cicd = { repo = "HRMGO_PIPELINE", branch = "development" }

[environments.qa]
region = "us-west-2"
project = "hrmgo"
environment = "qa"
owner_account = "qa-team"
account_id = "123456789012"
app = { repo = "NewHRMv2.0", branch = "qa" }
infra = { repo = "HRMGO_INFRA", branch = "qa" }
cicd = { repo = "HRMGO_PIPELINE", branch = "qa" }
"#;

/// A single-environment registry.
pub const REGISTRY_SINGLE: &str = r#"
[environments.staging]
region = "eu-west-1"
project = "acme"
environment = "staging"
account_id = "210987654321"
app = { repo = "acme-app", branch = "staging" }
infra = { repo = "acme-infra", branch = "staging" }
cicd = { repo = "acme-pipelines", branch = "staging" }
"#;

/// The flat shape without `account_id` or repository tables.
pub const REGISTRY_LEGACY: &str = r#"
[environments.dev]
region = "us-east-2"
project = "hrmgo"
environment = "dev"
owner_account = "mtoribio"
repo = "NewHRMv2.0"
branch = "dev_morrison"
"#;

/// A record whose account id isn't 12 digits.
pub const REGISTRY_BAD_ACCOUNT: &str = r#"
[environments.dev]
region = "us-east-2"
project = "hrmgo"
environment = "dev"
account_id = "88416291"
app = { repo = "a", branch = "main" }
infra = { repo = "i", branch = "main" }
cicd = { repo = "c", branch = "main" }
"#;

/// Two environments whose names overlap once hyphens shift.
pub const REGISTRY_OVERLAP: &str = r#"
[environments.a-stage-b]
region = "r"
project = "p"
environment = "a-stage-b"
account_id = "111111111111"
app = { repo = "a", branch = "main" }
infra = { repo = "i", branch = "main" }
cicd = { repo = "c", branch = "main" }

[environments.b]
region = "r-stage-a"
project = "p"
environment = "b"
account_id = "222222222222"
app = { repo = "a", branch = "main" }
infra = { repo = "i", branch = "main" }
cicd = { repo = "c", branch = "main" }
"#;
