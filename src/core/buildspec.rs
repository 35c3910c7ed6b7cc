//! CodeBuild buildspec model.
//!
//! Only the parts the generated projects use: `install` and `build` phases
//! with runtime versions and commands, and an optional artifacts section.
//! Commands are opaque strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::constants;
use crate::error::{RenderError, Result};

/// A complete buildspec document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    pub version: String,
    pub phases: Phases,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ArtifactFiles>,
}

/// Phases executed in order: `install`, then `build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phases {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Phase>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(
        rename = "runtime-versions",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub runtime_versions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
}

impl Phase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a runtime (`nodejs`, `php`, `ruby`) to a version.
    pub fn runtime(mut self, name: &str, version: &str) -> Self {
        self.runtime_versions
            .insert(name.to_string(), version.to_string());
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
        self
    }
}

/// Files exported as the action's output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFiles {
    #[serde(rename = "base-directory")]
    pub base_directory: String,
    pub files: Vec<String>,
    #[serde(rename = "exclude-paths", default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,
}

impl ArtifactFiles {
    /// The whole working tree without `node_modules`.
    pub fn workspace() -> Self {
        Self {
            base_directory: ".".to_string(),
            files: vec!["**/*".to_string()],
            exclude_paths: vec!["node_modules/**".to_string()],
        }
    }
}

impl BuildSpec {
    pub fn new() -> Self {
        Self {
            version: constants::BUILDSPEC_VERSION.to_string(),
            phases: Phases::default(),
            artifacts: None,
        }
    }

    pub fn install(mut self, phase: Phase) -> Self {
        self.phases.install = Some(phase);
        self
    }

    pub fn build(mut self, phase: Phase) -> Self {
        self.phases.build = Some(phase);
        self
    }

    pub fn artifacts(mut self, artifacts: ArtifactFiles) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Every command in execution order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.phases
            .install
            .iter()
            .chain(self.phases.build.iter())
            .flat_map(|phase| phase.commands.iter().map(String::as_str))
    }

    /// Whether the buildspec exports an artifact.
    pub fn has_artifacts(&self) -> bool {
        self.artifacts.is_some()
    }

    /// Render as the YAML document CodeBuild expects inline.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self).map_err(RenderError::Yaml)?)
    }
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self::new()
    }
}
