//! Pipeline blueprints.
//!
//! A blueprint knows, for one pipeline variant, which build projects exist,
//! which actions run them, how artifacts flow between those actions and in
//! which order the stages run.
//!
//! ## Adding a New Variant
//!
//! 1. Add the variant to [`Variant`]
//! 2. Implement `Blueprint` in a new file next to `app.rs`, `infra.rs`, `cicd.rs`
//! 3. Return it from [`for_variant`]
//!
//! ## Example
//!
//! ```ignore
//! struct Docs;
//!
//! impl Blueprint for Docs {
//!     fn variant(&self) -> Variant {
//!         Variant::Docs
//!     }
//!     fn assemble(&self, env: &EnvironmentConfig, names: &mut NameBook) -> Parts {
//!         // declare projects, wire actions, order stages
//!     }
//! }
//! ```

mod app;
mod cicd;
mod infra;

pub use app::{AppSingle, AppWaves};
pub use cicd::Cicd;
pub use infra::Infra;

use crate::core::action::{ApprovalAction, Artifact, BuildAction, SourceAction};
use crate::core::environment::{EnvironmentConfig, RepoRef};
use crate::core::naming::NameBook;
use crate::core::pipeline::{Pipeline, Variant};
use crate::core::project::BuildProject;

/// Everything a blueprint declares for one stack.
#[derive(Debug, Clone)]
pub struct Parts {
    /// Logical id of the CodeCommit repository.
    pub repository_id: &'static str,
    /// Generated CodeCommit repository name.
    pub repository: String,
    pub projects: Vec<BuildProject>,
    pub pipeline: Pipeline,
}

/// Declares the projects, actions and stage order of one variant.
pub trait Blueprint {
    fn variant(&self) -> Variant;

    /// Build every part of the stack for `env`, issuing names through `names`.
    fn assemble(&self, env: &EnvironmentConfig, names: &mut NameBook) -> Parts;
}

/// The blueprint for `variant`.
pub fn for_variant(variant: Variant) -> Box<dyn Blueprint> {
    match variant {
        Variant::App => Box::new(AppWaves),
        Variant::AppSingle => Box::new(AppSingle),
        Variant::Infra => Box::new(Infra),
        Variant::Cicd => Box::new(Cicd),
    }
}

/// Push-triggered checkout of `repo` through the connection whose ARN is
/// stored in the `ps/<parameter>` SSM parameter.
fn source(
    names: &mut NameBook,
    env: &EnvironmentConfig,
    repo: &RepoRef,
    action: &str,
    parameter: &str,
    artifact: &Artifact,
) -> SourceAction {
    SourceAction {
        name: names.name("codepipeline", action),
        connection_parameter: names.name("ps", parameter),
        owner: env.owner_account.clone(),
        repo: repo.repo.clone(),
        branch: repo.branch.clone(),
        trigger_on_push: true,
        output: artifact.clone(),
    }
}

/// Run `project` on `input`.
fn build(
    names: &mut NameBook,
    action: &str,
    project: &BuildProject,
    input: &Artifact,
    outputs: &[&Artifact],
) -> BuildAction {
    BuildAction {
        name: names.name("codebuild", action),
        project: project.logical_id.clone(),
        input: input.clone(),
        outputs: outputs.iter().map(|a| (*a).clone()).collect(),
    }
}

fn approval(names: &mut NameBook, action: &str, instructions: &str) -> ApprovalAction {
    ApprovalAction {
        name: names.name("codebuild", action),
        instructions: instructions.to_string(),
    }
}

fn artifact(names: &mut NameBook, functionality: &str) -> Artifact {
    Artifact::new(names.name("artifact", functionality))
}
