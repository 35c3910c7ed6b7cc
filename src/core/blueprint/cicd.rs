//! CI/CD pipeline.
//!
//! Deploys this repository's own pipeline stacks whenever the pipeline repo
//! changes. The CDK app requires the environment selector as context, so
//! synth and deploy pass `-c config=<environment>`.

use super::{artifact, build, source, Blueprint, Parts};
use crate::core::buildspec::{ArtifactFiles, BuildSpec, Phase};
use crate::core::environment::EnvironmentConfig;
use crate::core::naming::NameBook;
use crate::core::pipeline::{Pipeline, Stage, Variant};
use crate::core::project::{BuildImage, BuildProject, PolicyStatement};

/// The pipeline that deploys the pipelines.
pub struct Cicd;

struct CicdProjects {
    linter: BuildProject,
    synth: BuildProject,
    deploy: BuildProject,
}

fn projects(env: &EnvironmentConfig, names: &mut NameBook) -> CicdProjects {
    let install = Phase::new().runtime("nodejs", "16").command("node -v");

    let linter = BuildProject::new(
        "CodeBuildCiCdProjectLinting",
        names.name("codebuild", "cicd-linting"),
        BuildImage::Standard6,
        BuildSpec::new()
            .install(install.clone().commands([
                "npm install -g eslint",
                "npm install eslint @typescript-eslint/parser @typescript-eslint/eslint-plugin",
            ]))
            .build(Phase::new().command("npm run eslint")),
    );

    let synth = BuildProject::new(
        "CodeBuildCiCdProjectSynth",
        names.name("codebuild", "cicd-synth"),
        BuildImage::Standard6,
        BuildSpec::new()
            .install(
                install
                    .clone()
                    .commands(["sudo npm install -g aws-cdk", "npm install"]),
            )
            .build(Phase::new().command(format!("cdk synth -c config={}", env.environment)))
            .artifacts(ArtifactFiles::workspace()),
    );

    let deploy = BuildProject::new(
        "CodeBuildCiCdProjectDeploy",
        names.name("codebuild", "cicd-deploy"),
        BuildImage::Standard6,
        BuildSpec::new().install(install).build(Phase::new().commands([
            "rm -rf node_modules".to_string(),
            "sudo npm install -g aws-cdk".to_string(),
            "npm install".to_string(),
            format!(
                "cdk deploy --all -c config={} --method=direct --require-approval never",
                env.environment
            ),
        ])),
    )
    .grant(PolicyStatement::assume_role());

    CicdProjects {
        linter,
        synth,
        deploy,
    }
}

impl Blueprint for Cicd {
    fn variant(&self) -> Variant {
        Variant::Cicd
    }

    fn assemble(&self, env: &EnvironmentConfig, names: &mut NameBook) -> Parts {
        let repository = names.name("codecommit", "cicd-repo");
        let pipeline = Pipeline::new(names.name("codepipeline", "cicd-pipeline"), self.variant());
        let p = projects(env, names);

        let source_artifact = artifact(names, "cicd-connection");
        let synth_artifact = artifact(names, "cicd-build-synth");

        let source = source(
            names,
            env,
            &env.cicd,
            "cicd-github-conn",
            "cicd-conn-arn",
            &source_artifact,
        );
        let linting = build(names, "cicd-linting-action", &p.linter, &source_artifact, &[]);
        let synth = build(
            names,
            "cicd-synth-action",
            &p.synth,
            &source_artifact,
            &[&synth_artifact],
        );
        let deploy = build(names, "cicd-deploy-action", &p.deploy, &synth_artifact, &[]);

        let pipeline = pipeline
            .stage(Stage::new(names.name("stage", "source"), source))
            .stage(Stage::new(names.name("stage", "linting"), linting))
            .stage(Stage::new(names.name("stage", "synth"), synth))
            .stage(Stage::new(names.name("stage", "deploy"), deploy));

        Parts {
            repository_id: "CiCdRepository",
            repository,
            projects: vec![p.linter, p.synth, p.deploy],
            pipeline,
        }
    }
}
