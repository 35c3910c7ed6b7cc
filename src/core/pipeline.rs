//! Pipeline topology.
//!
//! A pipeline is an ordered list of named stages. Execution order, retries
//! and gating belong to CodePipeline; here the order is only declared and
//! checked for artifact consistency.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::core::action::Action;
use crate::error::{PipelineError, Result};

/// The declared pipeline shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Application pipeline with two deploy waves around the image build.
    App,
    /// Application pipeline with a single build, approve, deploy sequence.
    AppSingle,
    /// Infrastructure-as-code pipeline.
    Infra,
    /// The pipeline that deploys the pipelines.
    Cicd,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::App,
        Variant::AppSingle,
        Variant::Infra,
        Variant::Cicd,
    ];

    /// Variants synthesized when none are requested. `app-single` is an
    /// alternative to `app` and shares its resource names.
    pub const DEFAULT_SET: [Variant; 3] = [Variant::App, Variant::Infra, Variant::Cicd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::App => "app",
            Variant::AppSingle => "app-single",
            Variant::Infra => "infra",
            Variant::Cicd => "cicd",
        }
    }

    /// Prefix used in generated names (`app`, `infra`, `cicd`).
    pub fn scope(&self) -> &'static str {
        match self {
            Variant::App | Variant::AppSingle => "app",
            Variant::Infra => "infra",
            Variant::Cicd => "cicd",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = PipelineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownVariant(s.to_string()))
    }
}

/// Dedicated artifact store for a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactBucket {
    pub name: String,
    pub enforce_ssl: bool,
    pub block_public_access: bool,
    /// Delete the bucket and its objects when the stack is removed.
    pub destroy_on_removal: bool,
}

impl ArtifactBucket {
    /// Private, SSL-only, S3-managed encryption, removed with the stack.
    pub fn private(name: String) -> Self {
        Self {
            name,
            enforce_ssl: true,
            block_public_access: true,
            destroy_on_removal: true,
        }
    }
}

/// One named stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

impl Stage {
    pub fn new(name: String, action: impl Into<Action>) -> Self {
        Self {
            name,
            actions: vec![action.into()],
        }
    }
}

/// A declared CodePipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    pub name: String,
    pub variant: Variant,
    pub artifact_bucket: Option<ArtifactBucket>,
    pub key_rotation: bool,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(name: String, variant: Variant) -> Self {
        Self {
            name,
            variant,
            artifact_bucket: None,
            key_rotation: true,
            stages: Vec::new(),
        }
    }

    pub fn with_bucket(mut self, bucket: ArtifactBucket) -> Self {
        self.artifact_bucket = Some(bucket);
        self
    }

    /// Append a stage after every existing one.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// CodePipeline pipeline type.
    pub fn pipeline_type(&self) -> &'static str {
        "V1"
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.stages.iter().flat_map(|s| s.actions.iter())
    }

    /// Check the declared topology.
    ///
    /// Stage and action names are unique, no stage is empty, no artifact is
    /// produced twice, and every consumed artifact comes from an earlier
    /// stage. Actions in one stage may run in parallel, so an artifact
    /// produced in the same stage doesn't count.
    ///
    /// # Errors
    ///
    /// Returns the first `PipelineError` found.
    pub fn validate(&self) -> Result<()> {
        debug!(pipeline = %self.name, stages = self.stages.len(), "validating pipeline");

        let mut stage_names = HashSet::new();
        let mut action_names = HashSet::new();
        let mut produced: HashSet<&str> = HashSet::new();

        for stage in &self.stages {
            if !stage_names.insert(stage.name.as_str()) {
                return Err(PipelineError::DuplicateStage {
                    pipeline: self.name.clone(),
                    stage: stage.name.clone(),
                }
                .into());
            }
            if stage.actions.is_empty() {
                return Err(PipelineError::EmptyStage {
                    pipeline: self.name.clone(),
                    stage: stage.name.clone(),
                }
                .into());
            }

            let mut produced_here = Vec::new();
            for action in &stage.actions {
                if !action_names.insert(action.name()) {
                    return Err(PipelineError::DuplicateAction {
                        pipeline: self.name.clone(),
                        action: action.name().to_string(),
                    }
                    .into());
                }
                for input in action.inputs() {
                    if !produced.contains(input.name()) {
                        return Err(PipelineError::ArtifactNotProduced {
                            pipeline: self.name.clone(),
                            action: action.name().to_string(),
                            artifact: input.name().to_string(),
                        }
                        .into());
                    }
                }
                produced_here.extend(action.outputs());
            }

            for artifact in produced_here {
                if !produced.insert(artifact.name()) {
                    return Err(PipelineError::ArtifactProducedTwice {
                        pipeline: self.name.clone(),
                        artifact: artifact.name().to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}
