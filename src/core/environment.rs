//! Environment registry.
//!
//! Maps an environment key (`dev`, `prod`) to the immutable record every
//! generator reads from. The record is selected once and passed by reference
//! through every construction call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// A source repository and the branch a pipeline tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoRef {
    pub repo: String,
    pub branch: String,
}

impl RepoRef {
    pub fn new(repo: &str, branch: &str) -> Self {
        Self {
            repo: repo.to_string(),
            branch: branch.to_string(),
        }
    }
}

/// One deployment target.
///
/// Unknown fields are rejected so that the flat, pre-`account_id` record
/// shape fails to load instead of being silently merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub region: String,
    pub project: String,
    pub environment: String,
    /// Owner of the source repositories on the source-control provider.
    #[serde(default)]
    pub owner_account: String,
    /// Twelve-digit AWS account number.
    pub account_id: String,
    pub app: RepoRef,
    pub infra: RepoRef,
    pub cicd: RepoRef,
}

impl EnvironmentConfig {
    /// The built-in development record.
    pub fn dev() -> Self {
        Self {
            region: "us-east-2".to_string(),
            project: "hrmgo".to_string(),
            environment: "dev".to_string(),
            owner_account: "mtoribio".to_string(),
            account_id: "884162918988".to_string(),
            app: RepoRef::new("NewHRMv2.0", "dev_morrison"),
            infra: RepoRef::new("HRMGO_INFRA", "development"),
            cicd: RepoRef::new("HRMGO_PIPELINE", "development"),
        }
    }

    /// The built-in production record.
    pub fn prod() -> Self {
        Self {
            region: "us-east-2".to_string(),
            project: "hrmgo".to_string(),
            environment: "prod".to_string(),
            owner_account: String::new(),
            account_id: "364964202465".to_string(),
            app: RepoRef::new("NewHRMv2.0", "main"),
            infra: RepoRef::new("HRMGO_INFRA", "main"),
            cicd: RepoRef::new("HRMGO_PIPELINE", "main"),
        }
    }

    /// ECR registry host for this account and region.
    pub fn ecr_registry(&self) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", self.account_id, self.region)
    }

    /// Check field contents for the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for empty required fields and
    /// `ConfigError::InvalidValue` for a key mismatch or malformed account id.
    pub fn validate(&self, key: &str) -> Result<()> {
        let required: [(&'static str, &str); 9] = [
            ("region", &self.region),
            ("project", &self.project),
            ("environment", &self.environment),
            ("app.repo", &self.app.repo),
            ("app.branch", &self.app.branch),
            ("infra.repo", &self.infra.repo),
            ("infra.branch", &self.infra.branch),
            ("cicd.repo", &self.cicd.repo),
            ("cicd.branch", &self.cicd.branch),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    key: key.to_string(),
                    field,
                }
                .into());
            }
        }

        if self.environment != key {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                field: "environment",
                reason: format!("record says '{}'", self.environment),
            }
            .into());
        }

        if self.account_id.len() != 12 || !self.account_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                field: "account_id",
                reason: format!("expected 12 digits, got '{}'", self.account_id),
            }
            .into());
        }

        Ok(())
    }
}

/// Fixed mapping from environment key to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registry {
    environments: BTreeMap<String, EnvironmentConfig>,
}

impl Registry {
    /// The registry compiled into the binary (`dev` and `prod`).
    pub fn builtin() -> Self {
        let mut environments = BTreeMap::new();
        environments.insert("dev".to_string(), EnvironmentConfig::dev());
        environments.insert("prod".to_string(), EnvironmentConfig::prod());
        Self { environments }
    }

    /// Parse a registry from TOML text and validate every record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown fields,
    /// `ConfigError::Empty` when no environment is defined, or a validation
    /// error for the first bad record.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let registry: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load a registry file from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file can't be read, otherwise
    /// the errors of [`Registry::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading registry");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml(&contents)?;

        debug!(environments = registry.environments.len(), "registry loaded");
        Ok(registry)
    }

    /// Resolve the registry to use.
    ///
    /// An explicit path wins; otherwise `pipegen.toml` in `dir` is used when
    /// present; otherwise the built-in registry.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local: PathBuf = dir.join(constants::REGISTRY_FILE);
        if local.is_file() {
            return Self::load(local);
        }

        debug!("using built-in registry");
        Ok(Self::builtin())
    }

    /// Select the record for `key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownEnvironment` if the key isn't registered.
    pub fn select(&self, key: &str) -> Result<&EnvironmentConfig> {
        self.environments.get(key).ok_or_else(|| {
            ConfigError::UnknownEnvironment {
                key: key.to_string(),
                known: self.keys().collect::<Vec<_>>().join(", "),
            }
            .into()
        })
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// All `(key, record)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvironmentConfig)> {
        self.environments.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.environments.is_empty() {
            return Err(ConfigError::Empty.into());
        }
        for (key, record) in &self.environments {
            record.validate(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const REGISTRY: &str = r#"
[environments.staging]
region = "eu-west-1"
project = "acme"
environment = "staging"
owner_account = "acme-org"
account_id = "111122223333"
app = { repo = "acme-app", branch = "staging" }
infra = { repo = "acme-infra", branch = "staging" }
cicd = { repo = "acme-pipeline", branch = "staging" }
"#;

    #[test]
    fn test_builtin_has_dev_and_prod() {
        let registry = Registry::builtin();
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["dev", "prod"]);
        assert_eq!(registry.select("dev").unwrap().account_id, "884162918988");
        assert_eq!(registry.select("prod").unwrap().account_id, "364964202465");
    }

    #[test]
    fn test_builtin_records_validate() {
        for (key, record) in Registry::builtin().iter() {
            record.validate(key).unwrap();
        }
    }

    #[test]
    fn test_select_unknown_lists_known_keys() {
        let err = Registry::builtin().select("qa").unwrap_err();
        match err {
            Error::Config(ConfigError::UnknownEnvironment { key, known }) => {
                assert_eq!(key, "qa");
                assert_eq!(known, "dev, prod");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_toml() {
        let registry = Registry::from_toml(REGISTRY).unwrap();
        let staging = registry.select("staging").unwrap();
        assert_eq!(staging.project, "acme");
        assert_eq!(staging.cicd, RepoRef::new("acme-pipeline", "staging"));
        assert_eq!(
            staging.ecr_registry(),
            "111122223333.dkr.ecr.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn test_from_toml_rejects_flat_legacy_shape() {
        let legacy = r#"
[environments.dev]
region = "us-east-2"
project = "hrmgo"
environment = "dev"
ownerAccount = "mtoribio"
infraRepo = "HRMGO_INFRA"
infraBranch = "development"
"#;
        assert!(Registry::from_toml(legacy).is_err());
    }

    #[test]
    fn test_from_toml_rejects_key_mismatch() {
        let text = REGISTRY.replace("[environments.staging]", "[environments.qa]");
        let err = Registry::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("environment"));
    }

    #[test]
    fn test_from_toml_rejects_bad_account_id() {
        let text = REGISTRY.replace("111122223333", "1234");
        let err = Registry::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("account_id"));
    }

    #[test]
    fn test_from_toml_rejects_empty_branch() {
        let text = REGISTRY.replace(r#"branch = "staging" }
cicd"#, r#"branch = "" }
cicd"#);
        let err = Registry::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("infra.branch"));
    }

    #[test]
    fn test_from_toml_empty_registry() {
        let err = Registry::from_toml("[environments]\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Empty)));
    }

    #[test]
    fn test_owner_account_may_be_empty() {
        let text = REGISTRY.replace(r#"owner_account = "acme-org""#, "");
        let registry = Registry::from_toml(&text).unwrap();
        assert_eq!(registry.select("staging").unwrap().owner_account, "");
    }

    #[test]
    fn test_discover_prefers_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(constants::REGISTRY_FILE), REGISTRY).unwrap();

        let registry = Registry::discover(None, dir.path()).unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["staging"]);
    }

    #[test]
    fn test_discover_falls_back_to_builtin() {
        let dir = tempfile::TempDir::new().unwrap();
        let registry = Registry::discover(None, dir.path()).unwrap();
        assert_eq!(registry, Registry::builtin());
    }

    #[test]
    fn test_discover_explicit_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Registry::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile { .. })));
    }
}
