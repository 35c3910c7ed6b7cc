//! Pipeline actions and the artifacts that flow between them.

use serde::Serialize;

/// An opaque artifact handle, identified only by its generated name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checkout through a CodeStar connection.
///
/// The connection ARN isn't known at generation time; it is read from the
/// SSM parameter named here when the stack deploys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAction {
    pub name: String,
    pub connection_parameter: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub trigger_on_push: bool,
    pub output: Artifact,
}

/// Runs a build project against one input artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildAction {
    pub name: String,
    /// Logical id of the project this action runs.
    pub project: String,
    pub input: Artifact,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Artifact>,
}

/// Blocks the pipeline until an operator approves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalAction {
    pub name: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Source(SourceAction),
    Build(BuildAction),
    ManualApproval(ApprovalAction),
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Action::Source(a) => &a.name,
            Action::Build(a) => &a.name,
            Action::ManualApproval(a) => &a.name,
        }
    }

    /// Artifacts this action reads.
    pub fn inputs(&self) -> Vec<&Artifact> {
        match self {
            Action::Build(a) => vec![&a.input],
            Action::Source(_) | Action::ManualApproval(_) => Vec::new(),
        }
    }

    /// Artifacts this action writes.
    pub fn outputs(&self) -> Vec<&Artifact> {
        match self {
            Action::Source(a) => vec![&a.output],
            Action::Build(a) => a.outputs.iter().collect(),
            Action::ManualApproval(_) => Vec::new(),
        }
    }

    /// CodePipeline action category.
    pub fn category(&self) -> &'static str {
        match self {
            Action::Source(_) => "Source",
            Action::Build(_) => "Build",
            Action::ManualApproval(_) => "Approval",
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, Action::ManualApproval(_))
    }
}

impl From<SourceAction> for Action {
    fn from(a: SourceAction) -> Self {
        Action::Source(a)
    }
}

impl From<BuildAction> for Action {
    fn from(a: BuildAction) -> Self {
        Action::Build(a)
    }
}

impl From<ApprovalAction> for Action {
    fn from(a: ApprovalAction) -> Self {
        Action::ManualApproval(a)
    }
}
