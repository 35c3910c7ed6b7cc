//! CloudFormation-style template rendering.
//!
//! Turns a [`Stack`] into the resource document the provisioning engine
//! consumes. Only declarations are produced; nothing here talks to AWS.
//!
//! The document describes the pipeline topology and is not a deployable
//! stack on its own:
//!
//! - `Metadata.AutoDeleteObjects` marks buckets whose objects should be
//!   emptied on removal. CloudFormation ignores it; a custom resource or the
//!   CDK app has to act on it.
//! - Service roles carry a trust policy only. The extra grants a project
//!   declares (such as `sts:AssumeRole`) are rendered as policies, but the
//!   S3, KMS, CodeCommit and CodeBuild permissions the services need at run
//!   time are not.

use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::core::action::{Action, Artifact};
use crate::core::project::BuildProject;
use crate::core::stack::Stack;
use crate::error::{RenderError, Result};

const TEMPLATE_VERSION: &str = "2010-09-09";
const POLICY_VERSION: &str = "2012-10-17";
const CONNECTION_PARAMETER: &str = "ConnectionArn";
const PIPELINE_ROLE: &str = "PipelineRole";
const ARTIFACTS_BUCKET: &str = "ArtifactsBucket";
const ARTIFACTS_KEY: &str = "ArtifactsKey";

/// Output encoding of a rendered template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Serialize a rendered document.
    pub fn encode(&self, document: &Value) -> Result<String> {
        let text = match self {
            Format::Json => serde_json::to_string_pretty(document).map_err(RenderError::Json)?,
            Format::Yaml => serde_yaml::to_string(document).map_err(RenderError::Yaml)?,
        };
        Ok(text)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

/// Render `stack` as a template document.
///
/// # Errors
///
/// Returns `RenderError::Yaml` if a buildspec can't be serialized.
pub fn render(stack: &Stack) -> Result<Value> {
    let mut resources = Map::new();

    resources.insert(
        stack.repository.logical_id.clone(),
        json!({
            "Type": "AWS::CodeCommit::Repository",
            "Properties": { "RepositoryName": stack.repository.name }
        }),
    );

    render_artifact_store(stack, &mut resources);

    for project in &stack.projects {
        render_project(project, &mut resources)?;
    }

    resources.insert(
        PIPELINE_ROLE.to_string(),
        service_role("codepipeline.amazonaws.com"),
    );
    resources.insert(pipeline_id(stack), render_pipeline(stack));

    let mut parameters = Map::new();
    if let Some(param) = stack.connection_parameters().first() {
        parameters.insert(
            CONNECTION_PARAMETER.to_string(),
            json!({
                "Type": "AWS::SSM::Parameter::Value<String>",
                "Default": param,
                "Description": "CodeStar connection ARN"
            }),
        );
    }

    trace!(stack = %stack.name, resources = resources.len(), "rendered template");

    Ok(json!({
        "AWSTemplateFormatVersion": TEMPLATE_VERSION,
        "Description": stack.description(),
        "Metadata": {
            "StackName": stack.name,
            "Environment": stack.environment,
            "Account": stack.account_id,
            "Region": stack.region,
            "Tags": stack.tags,
        },
        "Parameters": parameters,
        "Resources": resources,
    }))
}

/// Logical id of the pipeline resource, e.g. `InfraPipeline`.
fn pipeline_id(stack: &Stack) -> String {
    let scope = match stack.variant.scope() {
        "app" => "App",
        "infra" => "Infra",
        _ => "CiCd",
    };
    format!("{}Pipeline", scope)
}

/// The artifact bucket (named when the pipeline asks for a dedicated one)
/// and the rotating KMS key that encrypts the pipeline's artifacts.
fn render_artifact_store(stack: &Stack, resources: &mut Map<String, Value>) {
    resources.insert(
        ARTIFACTS_KEY.to_string(),
        json!({
            "Type": "AWS::KMS::Key",
            "Properties": {
                "EnableKeyRotation": stack.pipeline.key_rotation,
                "KeyPolicy": {
                    "Version": POLICY_VERSION,
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "AWS": format!("arn:aws:iam::{}:root", stack.account_id) },
                        "Action": "kms:*",
                        "Resource": "*"
                    }]
                }
            },
            "DeletionPolicy": "Delete",
            "UpdateReplacePolicy": "Delete"
        }),
    );

    let bucket = match &stack.pipeline.artifact_bucket {
        Some(bucket) => {
            let policy = if bucket.destroy_on_removal { "Delete" } else { "Retain" };
            let mut properties = json!({
                "BucketName": bucket.name,
                "AccessControl": "Private",
                "BucketEncryption": {
                    "ServerSideEncryptionConfiguration": [{
                        "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" }
                    }]
                }
            });
            if bucket.block_public_access {
                properties["PublicAccessBlockConfiguration"] = json!({
                    "BlockPublicAcls": true,
                    "BlockPublicPolicy": true,
                    "IgnorePublicAcls": true,
                    "RestrictPublicBuckets": true
                });
            }
            if bucket.enforce_ssl {
                resources.insert(
                    format!("{}Policy", ARTIFACTS_BUCKET),
                    json!({
                        "Type": "AWS::S3::BucketPolicy",
                        "Properties": {
                            "Bucket": { "Ref": ARTIFACTS_BUCKET },
                            "PolicyDocument": {
                                "Version": POLICY_VERSION,
                                "Statement": [{
                                    "Effect": "Deny",
                                    "Principal": { "AWS": "*" },
                                    "Action": "s3:*",
                                    "Condition": { "Bool": { "aws:SecureTransport": "false" } },
                                    "Resource": [
                                        format!("arn:aws:s3:::{}", bucket.name),
                                        format!("arn:aws:s3:::{}/*", bucket.name)
                                    ]
                                }]
                            }
                        }
                    }),
                );
            }
            json!({
                "Type": "AWS::S3::Bucket",
                "Properties": properties,
                "Metadata": { "AutoDeleteObjects": bucket.destroy_on_removal },
                "DeletionPolicy": policy,
                "UpdateReplacePolicy": policy
            })
        }
        None => json!({
            "Type": "AWS::S3::Bucket",
            "Properties": {
                "PublicAccessBlockConfiguration": {
                    "BlockPublicAcls": true,
                    "BlockPublicPolicy": true,
                    "IgnorePublicAcls": true,
                    "RestrictPublicBuckets": true
                }
            },
            "DeletionPolicy": "Retain",
            "UpdateReplacePolicy": "Retain"
        }),
    };
    resources.insert(ARTIFACTS_BUCKET.to_string(), bucket);
}

fn service_role(principal: &str) -> Value {
    json!({
        "Type": "AWS::IAM::Role",
        "Properties": {
            "AssumeRolePolicyDocument": {
                "Version": POLICY_VERSION,
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": principal },
                    "Action": "sts:AssumeRole"
                }]
            }
        }
    })
}

fn render_project(project: &BuildProject, resources: &mut Map<String, Value>) -> Result<()> {
    let role = format!("{}Role", project.logical_id);
    resources.insert(role.clone(), service_role("codebuild.amazonaws.com"));

    if !project.policies.is_empty() {
        let statements: Vec<Value> = project
            .policies
            .iter()
            .map(|p| {
                json!({
                    "Effect": "Allow",
                    "Action": p.actions,
                    "Resource": p.resources
                })
            })
            .collect();
        resources.insert(
            format!("{}DefaultPolicy", role),
            json!({
                "Type": "AWS::IAM::Policy",
                "Properties": {
                    "PolicyName": format!("{}DefaultPolicy", role),
                    "PolicyDocument": { "Version": POLICY_VERSION, "Statement": statements },
                    "Roles": [{ "Ref": role }]
                }
            }),
        );
    }

    let variables: Vec<Value> = project
        .environment
        .iter()
        .map(|(name, value)| json!({ "Name": name, "Type": "PLAINTEXT", "Value": value }))
        .collect();

    resources.insert(
        project.logical_id.clone(),
        json!({
            "Type": "AWS::CodeBuild::Project",
            "Properties": {
                "Name": project.name,
                "ServiceRole": { "Fn::GetAtt": [role, "Arn"] },
                "Source": {
                    "Type": "CODEPIPELINE",
                    "BuildSpec": project.buildspec.to_yaml()?
                },
                "Artifacts": { "Type": "CODEPIPELINE" },
                "Environment": {
                    "Type": project.image.environment_type(),
                    "Image": project.image.image_id(),
                    "ComputeType": "BUILD_GENERAL1_SMALL",
                    "PrivilegedMode": project.privileged,
                    "EnvironmentVariables": variables
                },
                "TimeoutInMinutes": project.timeout_minutes,
                "EncryptionKey": { "Fn::GetAtt": [ARTIFACTS_KEY, "Arn"] }
            }
        }),
    );

    Ok(())
}

fn render_pipeline(stack: &Stack) -> Value {
    let stages: Vec<Value> = stack
        .pipeline
        .stages
        .iter()
        .map(|stage| {
            let actions: Vec<Value> = stage.actions.iter().map(render_action).collect();
            json!({ "Name": stage.name, "Actions": actions })
        })
        .collect();

    json!({
        "Type": "AWS::CodePipeline::Pipeline",
        "Properties": {
            "Name": stack.pipeline.name,
            "PipelineType": stack.pipeline.pipeline_type(),
            "RoleArn": { "Fn::GetAtt": [PIPELINE_ROLE, "Arn"] },
            "ArtifactStore": {
                "Type": "S3",
                "Location": { "Ref": ARTIFACTS_BUCKET },
                "EncryptionKey": {
                    "Type": "KMS",
                    "Id": { "Fn::GetAtt": [ARTIFACTS_KEY, "Arn"] }
                }
            },
            "Stages": stages
        }
    })
}

fn artifact_list<'a>(artifacts: impl IntoIterator<Item = &'a Artifact>) -> Vec<Value> {
    artifacts
        .into_iter()
        .map(|a| json!({ "Name": a.name() }))
        .collect()
}

fn render_action(action: &Action) -> Value {
    let (provider, configuration) = match action {
        Action::Source(s) => (
            "CodeStarSourceConnection",
            json!({
                "ConnectionArn": { "Ref": CONNECTION_PARAMETER },
                "FullRepositoryId": format!("{}/{}", s.owner, s.repo),
                "BranchName": s.branch,
                "DetectChanges": s.trigger_on_push
            }),
        ),
        Action::Build(b) => (
            "CodeBuild",
            json!({ "ProjectName": { "Ref": b.project } }),
        ),
        Action::ManualApproval(a) => ("Manual", json!({ "CustomData": a.instructions })),
    };

    let mut rendered = json!({
        "Name": action.name(),
        "ActionTypeId": {
            "Category": action.category(),
            "Owner": "AWS",
            "Provider": provider,
            "Version": "1"
        },
        "Configuration": configuration,
        "RunOrder": 1
    });

    let inputs = artifact_list(action.inputs());
    if !inputs.is_empty() {
        rendered["InputArtifacts"] = Value::Array(inputs);
    }
    let outputs = artifact_list(action.outputs());
    if !outputs.is_empty() {
        rendered["OutputArtifacts"] = Value::Array(outputs);
    }
    rendered
}
