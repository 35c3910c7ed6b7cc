//! Infrastructure pipeline.
//!
//! Lints, synthesizes and scans the CDK infrastructure repo, deploys the
//! base stacks the application depends on, waits for an operator, then
//! deploys everything.

use super::{approval, artifact, build, source, Blueprint, Parts};
use crate::core::buildspec::{ArtifactFiles, BuildSpec, Phase};
use crate::core::environment::EnvironmentConfig;
use crate::core::naming::NameBook;
use crate::core::pipeline::{Pipeline, Stage, Variant};
use crate::core::project::{BuildImage, BuildProject, PolicyStatement};

/// Stacks deployed ahead of the manual approval, in deploy order.
const BASE_STACKS: [&str; 5] = ["network", "repository", "database", "email", "sandbox"];

const APPROVAL_INSTRUCTIONS: &str = "Aprueba este paso si:

1. Se ha importado los certificados en AWS ACM (N. Virginia y Ohio) y almacenado los ARN de los certificados en Parameter Store de AWS Systems Manager (manual, solo se realiza la primera vez que se construye la infraestructura, en caso contrario omitir).
2. Se ha subido una imagen al respositorio.";

/// Infrastructure-as-code pipeline.
///
/// Eight stages. The first six (source through security) are the ones the
/// earlier infra pipeline ran on its own. `predeploy` then creates the base
/// stacks, and an operator approval gates the full `cdk deploy --all`.
pub struct Infra;

struct InfraProjects {
    linter: BuildProject,
    synth: BuildProject,
    unit_test: BuildProject,
    security: BuildProject,
    pre_deploy: BuildProject,
    deploy: BuildProject,
}

fn node_install() -> Phase {
    Phase::new().runtime("nodejs", "16").command("node -v")
}

fn projects(names: &mut NameBook) -> InfraProjects {
    let linter = BuildProject::new(
        "CodeBuildInfraProjectLinting",
        names.name("codebuild", "infra-linting"),
        BuildImage::Standard6,
        BuildSpec::new()
            .install(node_install().commands([
                "npm install -g eslint",
                "npm install eslint @typescript-eslint/parser @typescript-eslint/eslint-plugin",
            ]))
            .build(Phase::new().command("npm run eslint")),
    );

    let synth = BuildProject::new(
        "CodeBuildInfraProjectSynth",
        names.name("codebuild", "infra-synth"),
        BuildImage::Standard6,
        BuildSpec::new()
            .install(node_install().commands(["sudo npm install -g aws-cdk", "npm install"]))
            .build(Phase::new().command("cdk synth"))
            .artifacts(ArtifactFiles::workspace()),
    );

    let unit_test = BuildProject::new(
        "CodeBuildInfraProjectUnitTest",
        names.name("codebuild", "infra-unit-test"),
        BuildImage::Standard6,
        BuildSpec::new().build(Phase::new().command("echo \"Aquí van los Unit Test!\"")),
    );

    let security = BuildProject::new(
        "CodeBuildInfraProjectSecurity",
        names.name("codebuild", "infra-security"),
        BuildImage::Standard6,
        BuildSpec::new()
            .install(Phase::new().runtime("ruby", "3.1").command("gem install cfn-nag"))
            .build(Phase::new().command(
                "find ./cdk.out -type f -name \"*.template.json\" | xargs -I{} cfn_nag_scan --deny-list-path cfn-nag-deny-list.yml --input-path {}",
            )),
    );

    let mut pre_deploy_commands = vec![
        "rm -rf node_modules".to_string(),
        "sudo npm install -g aws-cdk".to_string(),
        "npm install".to_string(),
    ];
    for stack in BASE_STACKS {
        pre_deploy_commands.push(format!(
            "cdk deploy {} --method=direct --require-approval never",
            names.name("stack", stack)
        ));
    }
    let pre_deploy = BuildProject::new(
        "CodeBuildInfraProjectPreDeploy",
        names.name("codebuild", "infra-predeploy"),
        BuildImage::Standard6,
        BuildSpec::new()
            .install(node_install())
            .build(Phase::new().commands(pre_deploy_commands)),
    )
    .grant(PolicyStatement::assume_role());

    let deploy = BuildProject::new(
        "CodeBuildInfraProjectDeploy",
        names.name("codebuild", "infra-deploy"),
        BuildImage::Standard6,
        BuildSpec::new().install(node_install()).build(Phase::new().commands([
            "rm -rf node_modules",
            "sudo npm install -g aws-cdk",
            "npm install",
            "cdk deploy --all --method=direct --require-approval never",
        ])),
    )
    .grant(PolicyStatement::assume_role());

    InfraProjects {
        linter,
        synth,
        unit_test,
        security,
        pre_deploy,
        deploy,
    }
}

impl Blueprint for Infra {
    fn variant(&self) -> Variant {
        Variant::Infra
    }

    fn assemble(&self, env: &EnvironmentConfig, names: &mut NameBook) -> Parts {
        let repository = names.name("codecommit", "infra-repo");
        let pipeline = Pipeline::new(names.name("codepipeline", "infra-pipeline"), self.variant());
        let p = projects(names);

        let source_artifact = artifact(names, "infra-source");
        let synth_artifact = artifact(names, "infra-build-synth");

        let source = source(
            names,
            env,
            &env.infra,
            "infra-github-conn",
            "conn-arn",
            &source_artifact,
        );
        let linting = build(names, "infra-linting-action", &p.linter, &source_artifact, &[]);
        let synth = build(
            names,
            "infra-synth-action",
            &p.synth,
            &source_artifact,
            &[&synth_artifact],
        );
        let unit_test = build(names, "infra-unit-test-action", &p.unit_test, &source_artifact, &[]);
        // cfn-nag scans the synthesized templates, not the sources.
        let security = build(names, "infra-security-action", &p.security, &synth_artifact, &[]);
        let pre_deploy = build(names, "infra-predeploy-action", &p.pre_deploy, &synth_artifact, &[]);
        let manual_approval = approval(names, "infra-manual-approval", APPROVAL_INSTRUCTIONS);
        let deploy = build(names, "infra-deploy-action", &p.deploy, &synth_artifact, &[]);

        let pipeline = pipeline
            .stage(Stage::new(names.name("stage", "source"), source))
            .stage(Stage::new(names.name("stage", "linting"), linting))
            .stage(Stage::new(names.name("stage", "synth"), synth))
            .stage(Stage::new(names.name("stage", "unit-test"), unit_test))
            .stage(Stage::new(names.name("stage", "security"), security))
            .stage(Stage::new(names.name("stage", "predeploy"), pre_deploy))
            .stage(Stage::new(names.name("stage", "manual-approval"), manual_approval))
            .stage(Stage::new(names.name("stage", "deploy"), deploy));

        Parts {
            repository_id: "InfraRepository",
            repository,
            projects: vec![
                p.linter,
                p.synth,
                p.unit_test,
                p.security,
                p.pre_deploy,
                p.deploy,
            ],
            pipeline,
        }
    }
}
