//! Error types for pipegen.
//!
//! Every failure happens at generation time, before any template is written.
//! Each concern has its own enum; `Error` wraps them for the public API.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Environment registry and selector errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no environment selected")]
    MissingSelector,

    #[error("unknown environment '{key}' (known: {known})")]
    UnknownEnvironment { key: String, known: String },

    #[error("failed to read registry {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("registry defines no environments")]
    Empty,

    #[error("environment '{key}': missing field '{field}'")]
    MissingField { key: String, field: &'static str },

    #[error("environment '{key}': invalid {field}: {reason}")]
    InvalidValue {
        key: String,
        field: &'static str,
        reason: String,
    },
}

/// Resource naming errors.
#[derive(Error, Debug)]
pub enum NamingError {
    #[error("name collision: '{name}' is claimed by both {first} and {second}")]
    Collision {
        name: String,
        first: String,
        second: String,
    },
}

/// Pipeline topology errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pipeline {pipeline}: stage '{stage}' has no actions")]
    EmptyStage { pipeline: String, stage: String },

    #[error("pipeline {pipeline}: duplicate stage '{stage}'")]
    DuplicateStage { pipeline: String, stage: String },

    #[error("pipeline {pipeline}: duplicate action '{action}'")]
    DuplicateAction { pipeline: String, action: String },

    #[error("pipeline {pipeline}: action '{action}' consumes artifact '{artifact}' before it is produced")]
    ArtifactNotProduced {
        pipeline: String,
        action: String,
        artifact: String,
    },

    #[error("pipeline {pipeline}: artifact '{artifact}' is produced twice")]
    ArtifactProducedTwice { pipeline: String, artifact: String },

    #[error("unknown pipeline variant '{0}'")]
    UnknownVariant(String),
}

/// Template rendering and output errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to serialize json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
