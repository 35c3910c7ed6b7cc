//! Application pipelines.
//!
//! The application repo holds a Laravel app plus the CDK code for its
//! container stack. Two shapes exist:
//!
//! - `app`: synth and a first deploy wave run before the image build, a
//!   manual approval follows the build, then the second wave rolls the new
//!   task definition out to ECS.
//! - `app-single`: approval before the build, approval after it, one deploy.

use super::{approval, artifact, build, source, Blueprint, Parts};
use crate::core::buildspec::{ArtifactFiles, BuildSpec, Phase};
use crate::core::constants;
use crate::core::environment::EnvironmentConfig;
use crate::core::naming::NameBook;
use crate::core::pipeline::{ArtifactBucket, Pipeline, Stage, Variant};
use crate::core::project::{BuildImage, BuildProject, PolicyStatement};

const LINT_IMAGE: &str = "aws/codebuild/amazonlinux2-aarch64-standard:3.0";

/// Tab depth of the register command inside the deployed buildspec. The
/// task definition JSON is passed with that layout intact.
const REGISTER_INDENT: usize = 5;

/// Suffix CloudFormation generated for the task role of the container stack.
const TASK_ROLE_SUFFIX: &str = "TaskDefinitionTaskRoleFD4-r2TzM6S8v4SA";

const PREBUILD_INSTRUCTIONS: &str = "Aprueba este paso si:

1. Se han creado los stacks: repository, database, email y sandbox (automático al iniciar el pipeline de la infraestructura).
2. Se ha configurado el .env en AWS Secrets Manager (manual, se configura una vez y en caso sea necesario).
3. Se ha ejecutado los comandos: php artisan migrate y php artisan db:seed en la sandbox (manual, solo se realiza la primera vez que se construye la app, en caso contrario omitir).";

const POSTBUILD_INSTRUCTIONS: &str = "Aprueba este paso si:

1. Se ha desplegado el stack de los contenedores.";

/// Application pipeline with two deploy waves.
pub struct AppWaves;

/// Application pipeline with a single deploy.
pub struct AppSingle;

/// Build projects shared by both application variants.
struct AppProjects {
    linter: BuildProject,
    unit_test: BuildProject,
    security: BuildProject,
    build: BuildProject,
    deploy: BuildProject,
}

/// Projects only the two-wave variant runs.
struct WaveProjects {
    synth: BuildProject,
    deploy_wave_1: BuildProject,
}

/// Join `(depth, line)` pairs, each on a new line indented with tabs.
fn indented(lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(depth, line)| format!("\n{}{}", "\t".repeat(*depth), line))
        .collect()
}

fn projects(env: &EnvironmentConfig, names: &mut NameBook) -> AppProjects {
    let linter = BuildProject::new(
        "CodeBuildAppProjectLinting",
        names.name("codebuild", "app-linting"),
        BuildImage::Custom(LINT_IMAGE.to_string()),
        BuildSpec::new()
            .install(Phase::new().runtime("php", "8.1").runtime("nodejs", "18"))
            .build(Phase::new().command("echo \"Aquí debe configurar el linter")),
    );

    let unit_test = BuildProject::new(
        "CodeBuildAppProjectUnitTest",
        names.name("codebuild", "app-unit-test"),
        BuildImage::Standard7,
        BuildSpec::new().build(Phase::new().command("echo \"Aquí van los Unit Test!\"")),
    );

    let security = BuildProject::new(
        "CodeBuildAppProjectSecurity",
        names.name("codebuild", "app-security"),
        BuildImage::Standard7,
        BuildSpec::new().build(
            Phase::new().command("echo \"Aquí debe configurar el sonarqube para su proyecto\""),
        ),
    )
    .env_var("SONAR_HOST_URL", "URL_de_tu_servidor_de_SonarQube")
    .env_var("SONAR_LOGIN", "token_de_autenticacion_de_SonarQube");

    let secret = names.name("sm", "env");
    let repository = names.name("ecr", "repository");
    let image = format!("{}/{}:latest", env.ecr_registry(), repository);
    let build = BuildProject::new(
        "CodeBuildAppProjectBuild",
        names.name("codebuild", "app-build"),
        BuildImage::Standard7,
        BuildSpec::new()
            .install(Phase::new().runtime("nodejs", "18").commands([
                "node -v",
                "sudo npm install -g aws-cdk",
                "npm install",
            ]))
            .build(Phase::new().commands([
                format!(
                    "SECRET_VALUE=$(aws secretsmanager get-secret-value --secret-id {} --query SecretString --output text)",
                    secret
                ),
                "echo \"$SECRET_VALUE\" > .env".to_string(),
                format!("docker build -t {} .", repository),
                format!("docker tag {}:latest {}", repository, image),
                format!("docker push {}", image),
            ]))
            .artifacts(ArtifactFiles::workspace()),
    )
    .privileged();

    let container = names.name("ecs", "container");
    let family = names.name("ecs", "task");
    let log_group = names.name("cw", "ecs-logs");
    let execution_role = names.name("iam", "task-execution-role");
    let cluster = names.name("ecs", "cluster");
    let service = names.name("ecs", "service");
    let task_role = names.name("stack", TASK_ROLE_SUFFIX);
    let port = constants::APP_CONTAINER_PORT;

    let task_definition = indented(&[
        (7, format!("\"family\": \"{}\",", family)),
        (7, "\"containerDefinitions\": [".to_string()),
        (8, "{".to_string()),
        (9, format!("\"name\": \"{}\",", container)),
        (9, format!("\"image\": \"{}\",", image)),
        (9, "\"cpu\": 0,".to_string()),
        (9, "\"portMappings\": [".to_string()),
        (10, "{".to_string()),
        (11, format!("\"name\": \"{}-{}-tcp\",", container, port)),
        (11, format!("\"containerPort\": {},", port)),
        (11, format!("\"hostPort\": {},", port)),
        (11, "\"protocol\": \"tcp\"".to_string()),
        (10, "}".to_string()),
        (9, "],".to_string()),
        (9, "\"essential\": true,".to_string()),
        (9, "\"environment\": [],".to_string()),
        (9, "\"environmentFiles\": [],".to_string()),
        (9, "\"mountPoints\": [],".to_string()),
        (9, "\"volumesFrom\": [],".to_string()),
        (9, "\"dockerSecurityOptions\": [],".to_string()),
        (9, "\"ulimits\": [],".to_string()),
        (9, "\"logConfiguration\": {".to_string()),
        (10, "\"logDriver\": \"awslogs\",".to_string()),
        (10, "\"options\": {".to_string()),
        (11, format!("\"awslogs-group\": \"{}\",", log_group)),
        (11, format!("\"awslogs-region\": \"{}\",", env.region)),
        (11, "\"awslogs-stream-prefix\": \"ecs\"".to_string()),
        (10, "},".to_string()),
        (10, "\"secretOptions\": []".to_string()),
        (9, "},".to_string()),
        (9, "\"systemControls\": [],".to_string()),
        (9, "\"credentialSpecs\": []".to_string()),
        (8, "}".to_string()),
        (7, "],".to_string()),
        (
            7,
            format!(
                "\"taskRoleArn\": \"arn:aws:iam::{}:role/{}\",",
                env.account_id, task_role
            ),
        ),
        (
            7,
            format!(
                "\"executionRoleArn\": \"arn:aws:iam::{}:role/{}\",",
                env.account_id, execution_role
            ),
        ),
        (7, "\"networkMode\": \"awsvpc\",".to_string()),
        (7, "\"requiresCompatibilities\": [\"FARGATE\"],".to_string()),
        (7, "\"cpu\": \"2048\",".to_string()),
        (7, "\"memory\": \"4096\",".to_string()),
        (7, "\"runtimePlatform\": {".to_string()),
        (8, "\"operatingSystemFamily\": \"LINUX\"".to_string()),
        (7, "},".to_string()),
        (7, "\"tags\": [".to_string()),
        (8, "{".to_string()),
        (9, format!("\"key\": \"{}\",", constants::PROJECT_TAG)),
        (9, format!("\"value\": \"{}\"", env.project)),
        (8, "}".to_string()),
        (7, "]".to_string()),
    ]);

    let deploy = BuildProject::new(
        "CodeBuildAppProjectDeploy",
        names.name("codebuild", "app-deploy"),
        BuildImage::Standard7,
        BuildSpec::new()
            .install(Phase::new().runtime("nodejs", "18").command("node -v"))
            .build(Phase::new().commands([
                format!(
                    "aws ecs register-task-definition --cli-input-json '{{{}\n{}}}'\n{}",
                    task_definition,
                    "\t".repeat(REGISTER_INDENT + 1),
                    "\t".repeat(REGISTER_INDENT)
                ),
                format!(
                    "aws ecs update-service --cluster {} --service {} --task-definition {}",
                    cluster, service, family
                ),
            ])),
    )
    .grant(PolicyStatement::assume_role());

    AppProjects {
        linter,
        unit_test,
        security,
        build,
        deploy,
    }
}

fn wave_projects(env: &EnvironmentConfig, names: &mut NameBook) -> WaveProjects {
    let synth = BuildProject::new(
        "CodeBuildAppProjectSynth",
        names.name("codebuild", "app-synth"),
        BuildImage::Standard7,
        BuildSpec::new()
            .install(Phase::new().runtime("nodejs", "18").commands([
                "node -v",
                "sudo npm install -g aws-cdk",
                "npm install",
            ]))
            .build(Phase::new().command(format!("cdk synth -c config={}", env.environment)))
            .artifacts(ArtifactFiles::workspace()),
    );

    let container_stack = names.name("stack", "ecs");
    let deploy_wave_1 = BuildProject::new(
        "CodeBuildAppProjectDeployWave1",
        names.name("codebuild", "app-deploy-wave-1"),
        BuildImage::Standard7,
        BuildSpec::new()
            .install(Phase::new().runtime("nodejs", "18").command("node -v"))
            .build(Phase::new().commands([
                "rm -rf node_modules".to_string(),
                "sudo npm install -g aws-cdk".to_string(),
                "npm install".to_string(),
                format!(
                    "cdk deploy {} -c config={} --method=direct --require-approval never",
                    container_stack, env.environment
                ),
            ])),
    )
    .grant(PolicyStatement::assume_role());

    WaveProjects {
        synth,
        deploy_wave_1,
    }
}

/// Repository and artifact bucket every application variant declares.
fn scaffold(names: &mut NameBook, variant: Variant) -> (String, Pipeline) {
    let repository = names.name("codecommit", "app-repo");
    let bucket = ArtifactBucket::private(names.name("s3", "app-pipeline-artifacts"));
    let pipeline =
        Pipeline::new(names.name("codepipeline", "app-pipeline"), variant).with_bucket(bucket);
    (repository, pipeline)
}

impl Blueprint for AppWaves {
    fn variant(&self) -> Variant {
        Variant::App
    }

    fn assemble(&self, env: &EnvironmentConfig, names: &mut NameBook) -> Parts {
        let (repository, pipeline) = scaffold(names, self.variant());
        let p = projects(env, names);
        let w = wave_projects(env, names);

        let source_artifact = artifact(names, "app-source");
        let synth_artifact = artifact(names, "app-build-synth");
        let build_artifact = artifact(names, "app-build");

        let source = source(
            names,
            env,
            &env.app,
            "app-github-conn",
            "conn-arn",
            &source_artifact,
        );
        let linting = build(names, "app-linting-action", &p.linter, &source_artifact, &[]);
        let synth = build(
            names,
            "app-synth-action",
            &w.synth,
            &source_artifact,
            &[&synth_artifact],
        );
        let unit_test = build(names, "app-unit-test-action", &p.unit_test, &source_artifact, &[]);
        let security = build(names, "app-security-action", &p.security, &source_artifact, &[]);
        let deploy_wave_1 = build(
            names,
            "app-deploy-wave-1-action",
            &w.deploy_wave_1,
            &synth_artifact,
            &[],
        );
        let build_action = build(
            names,
            "app-build-action",
            &p.build,
            &source_artifact,
            &[&build_artifact],
        );
        let manual_approval = approval(names, "app-manual-approval", POSTBUILD_INSTRUCTIONS);
        let deploy_wave_2 = build(
            names,
            "app-deploy-wave-2-action",
            &p.deploy,
            &build_artifact,
            &[],
        );

        let pipeline = pipeline
            .stage(Stage::new(names.name("stage", "source"), source))
            .stage(Stage::new(names.name("stage", "linting"), linting))
            .stage(Stage::new(names.name("stage", "synth"), synth))
            .stage(Stage::new(names.name("stage", "unit-test"), unit_test))
            .stage(Stage::new(names.name("stage", "security"), security))
            .stage(Stage::new(names.name("stage", "deploy-wave-1"), deploy_wave_1))
            .stage(Stage::new(names.name("stage", "build"), build_action))
            .stage(Stage::new(names.name("stage", "manual-approval"), manual_approval))
            .stage(Stage::new(names.name("stage", "deploy-wave-2"), deploy_wave_2));

        Parts {
            repository_id: "AppRepository",
            repository,
            projects: vec![
                p.linter,
                w.synth,
                p.unit_test,
                p.security,
                w.deploy_wave_1,
                p.build,
                p.deploy,
            ],
            pipeline,
        }
    }
}

impl Blueprint for AppSingle {
    fn variant(&self) -> Variant {
        Variant::AppSingle
    }

    fn assemble(&self, env: &EnvironmentConfig, names: &mut NameBook) -> Parts {
        let (repository, pipeline) = scaffold(names, self.variant());
        let p = projects(env, names);

        let source_artifact = artifact(names, "app-source");
        let build_artifact = artifact(names, "app-build");

        let source = source(
            names,
            env,
            &env.app,
            "app-github-conn",
            "conn-arn",
            &source_artifact,
        );
        let linting = build(names, "app-linting-action", &p.linter, &source_artifact, &[]);
        let unit_test = build(names, "app-unit-test-action", &p.unit_test, &source_artifact, &[]);
        let security = build(names, "app-security-action", &p.security, &source_artifact, &[]);
        let pre_build = approval(names, "app-manual-approval-prebuild", PREBUILD_INSTRUCTIONS);
        let build_action = build(
            names,
            "app-build-action",
            &p.build,
            &source_artifact,
            &[&build_artifact],
        );
        let post_build = approval(names, "app-manual-approval-postbuild", POSTBUILD_INSTRUCTIONS);
        let deploy = build(names, "app-deploy-action", &p.deploy, &build_artifact, &[]);

        let pipeline = pipeline
            .stage(Stage::new(names.name("stage", "source"), source))
            .stage(Stage::new(names.name("stage", "linting"), linting))
            .stage(Stage::new(names.name("stage", "unit-test"), unit_test))
            .stage(Stage::new(names.name("stage", "security"), security))
            .stage(Stage::new(
                names.name("stage", "manual-approval-prebuild"),
                pre_build,
            ))
            .stage(Stage::new(names.name("stage", "build"), build_action))
            .stage(Stage::new(
                names.name("stage", "manual-approval-postbuild"),
                post_build,
            ))
            .stage(Stage::new(names.name("stage", "deploy"), deploy));

        Parts {
            repository_id: "AppRepository",
            repository,
            projects: vec![p.linter, p.unit_test, p.security, p.build, p.deploy],
            pipeline,
        }
    }
}
