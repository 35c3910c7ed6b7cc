//! Build projects.
//!
//! A `BuildProject` is the execution environment a pipeline action invokes:
//! image, timeout, buildspec and any extra permissions granted to its role.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::buildspec::BuildSpec;
use crate::core::constants;

/// CodeBuild container image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildImage {
    /// `aws/codebuild/standard:6.0`
    Standard6,
    /// `aws/codebuild/standard:7.0`
    Standard7,
    /// Any other image id, e.g. `aws/codebuild/amazonlinux2-aarch64-standard:3.0`.
    Custom(String),
}

impl BuildImage {
    pub fn image_id(&self) -> &str {
        match self {
            BuildImage::Standard6 => "aws/codebuild/standard:6.0",
            BuildImage::Standard7 => "aws/codebuild/standard:7.0",
            BuildImage::Custom(id) => id,
        }
    }

    /// CodeBuild environment type matching the image architecture.
    pub fn environment_type(&self) -> &'static str {
        if self.image_id().contains("aarch64") {
            "ARM_CONTAINER"
        } else {
            "LINUX_CONTAINER"
        }
    }
}

/// An IAM statement attached to a project's service role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    /// `sts:AssumeRole` on every resource, needed by projects that run
    /// `cdk deploy` or mutate ECS/ECR state.
    pub fn assume_role() -> Self {
        Self {
            actions: vec!["sts:AssumeRole".to_string()],
            resources: vec!["*".to_string()],
        }
    }
}

/// A declared CodeBuild project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProject {
    /// Template-local identifier, e.g. `CodeBuildAppProjectLinting`.
    pub logical_id: String,
    /// Generated project name.
    pub name: String,
    pub image: BuildImage,
    pub privileged: bool,
    pub timeout_minutes: u32,
    /// Plain-text environment variables.
    pub environment: BTreeMap<String, String>,
    pub buildspec: BuildSpec,
    pub policies: Vec<PolicyStatement>,
}

impl BuildProject {
    /// A project on `image` with the default timeout and nothing granted.
    pub fn new(logical_id: &str, name: String, image: BuildImage, buildspec: BuildSpec) -> Self {
        Self {
            logical_id: logical_id.to_string(),
            name,
            image,
            privileged: false,
            timeout_minutes: constants::BUILD_TIMEOUT_MINUTES,
            environment: BTreeMap::new(),
            buildspec,
            policies: Vec::new(),
        }
    }

    /// Run the container in privileged mode (required for `docker build`).
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn env_var(mut self, key: &str, value: &str) -> Self {
        self.environment.insert(key.to_string(), value.to_string());
        self
    }

    /// Grant an extra statement to this project's role.
    pub fn grant(mut self, statement: PolicyStatement) -> Self {
        self.policies.push(statement);
        self
    }

    /// Whether this project's role may assume other roles.
    pub fn can_assume_roles(&self) -> bool {
        self.policies
            .iter()
            .any(|p| p.actions.iter().any(|a| a == "sts:AssumeRole"))
    }
}
