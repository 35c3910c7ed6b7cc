//! Pipeline stacks.
//!
//! A stack bundles what one blueprint declares for one environment: the
//! source repository, the build projects and the pipeline itself, plus the
//! tags and target account the stack deploys into.

use std::collections::BTreeMap;
use tracing::debug;

use crate::core::blueprint::{self, Parts};
use crate::core::constants;
use crate::core::environment::EnvironmentConfig;
use crate::core::naming::{NameBook, NameClaim, NameLedger, Namer};
use crate::core::pipeline::{Pipeline, Variant};
use crate::core::project::BuildProject;
use crate::error::Result;

/// A CodeCommit repository declared by a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub logical_id: String,
    pub name: String,
}

/// One synthesized pipeline stack.
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub variant: Variant,
    pub environment: String,
    pub account_id: String,
    pub region: String,
    pub tags: BTreeMap<String, String>,
    pub repository: Repository,
    pub projects: Vec<BuildProject>,
    pub pipeline: Pipeline,
    /// Every name generated while building this stack, in issue order.
    pub names: Vec<NameClaim>,
}

impl Stack {
    /// Build and validate the stack for `variant` in `env`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` if the declared topology is inconsistent, or
    /// `NamingError::Collision` if two different inputs generate one name.
    pub fn build(env: &EnvironmentConfig, variant: Variant) -> Result<Self> {
        let mut names = NameBook::new(Namer::new(env));
        let name = names.name("stack", &format!("{}-pipeline", variant.scope()));
        let Parts {
            repository_id,
            repository,
            projects,
            pipeline,
        } = blueprint::for_variant(variant).assemble(env, &mut names);

        pipeline.validate()?;

        let names = names.into_issued();
        let mut ledger = NameLedger::new();
        for claim in &names {
            ledger.claim(&claim.owner, &claim.name)?;
        }

        let mut tags = BTreeMap::new();
        tags.insert(constants::PROJECT_TAG.to_string(), env.project.clone());

        debug!(
            stack = %name,
            variant = %variant,
            projects = projects.len(),
            stages = pipeline.stages.len(),
            "stack built"
        );

        Ok(Self {
            name,
            variant,
            environment: env.environment.clone(),
            account_id: env.account_id.clone(),
            region: env.region.clone(),
            tags,
            repository: Repository {
                logical_id: repository_id.to_string(),
                name: repository,
            },
            projects,
            pipeline,
            names,
        })
    }

    /// Names of resources this stack creates, as opposed to ones it only
    /// references.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut declared = vec![self.name.as_str(), self.repository.name.as_str()];
        if let Some(bucket) = &self.pipeline.artifact_bucket {
            declared.push(bucket.name.as_str());
        }
        declared.extend(self.projects.iter().map(|p| p.name.as_str()));
        declared.push(self.pipeline.name.as_str());
        declared
    }

    /// Connection parameter names read by the stack's source actions.
    pub fn connection_parameters(&self) -> Vec<&str> {
        let mut params: Vec<&str> = self
            .pipeline
            .actions()
            .filter_map(|a| match a {
                crate::core::action::Action::Source(s) => Some(s.connection_parameter.as_str()),
                _ => None,
            })
            .collect();
        params.sort_unstable();
        params.dedup();
        params
    }

    pub fn project(&self, logical_id: &str) -> Option<&BuildProject> {
        self.projects.iter().find(|p| p.logical_id == logical_id)
    }

    pub fn description(&self) -> String {
        format!(
            "{} pipeline for {} ({})",
            self.variant,
            self.tags
                .get(constants::PROJECT_TAG)
                .map(String::as_str)
                .unwrap_or_default(),
            self.environment
        )
    }
}
