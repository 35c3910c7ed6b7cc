//! Command-line interface.

pub mod check;
pub mod completions;
pub mod envs;
pub mod names;
pub mod output;
pub mod stages;
pub mod synth;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::constants;
use crate::core::environment::{EnvironmentConfig, Registry};
use crate::core::pipeline::Variant;
use crate::core::template::Format;
use crate::error::{ConfigError, Result};

/// Pipegen - CodePipeline topologies from one environment record.
#[derive(Parser)]
#[command(
    name = "pipegen",
    about = "Generate CodePipeline/CodeBuild topologies for app, infra and CI/CD repos",
    version,
    after_help = "Same record in, same names out."
)]
pub struct Cli {
    /// Environment key to generate for (e.g. dev, prod)
    #[arg(short, long, global = true, env = constants::ENV_SELECTOR_VAR)]
    pub env: Option<String>,

    /// Registry file (defaults to ./pipegen.toml, then the built-in records)
    #[arg(long, global = true, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Options shared by every command.
    pub fn global(&self) -> Global {
        Global {
            env: self.env.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Render pipeline stack templates
    Synth {
        /// Variants to synthesize (app, app-single, infra, cicd)
        #[arg(value_name = "VARIANT")]
        variants: Vec<Variant>,
        /// Template encoding (json or yaml)
        #[arg(long, default_value = "json")]
        format: Format,
        /// Write templates and a manifest into this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// List every generated name with its owner
    Names {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the ordered stages of one variant
    Stages {
        /// Pipeline variant
        variant: Variant,
    },

    /// List registered environments
    Envs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check generated names for collisions
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Global options, detached from the parsed command.
#[derive(Debug, Clone, Default)]
pub struct Global {
    pub env: Option<String>,
    pub registry: Option<PathBuf>,
}

impl Global {
    /// Resolve the registry for this invocation.
    pub fn registry(&self) -> Result<Registry> {
        let cwd = std::env::current_dir()?;
        Registry::discover(self.registry.as_deref(), &cwd)
    }

    /// The selected environment record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSelector` when no `--env` was given.
    pub fn environment<'a>(&self, registry: &'a Registry) -> Result<&'a EnvironmentConfig> {
        let key = self
            .env
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingSelector)?;
        registry.select(key)
    }
}

/// Execute a command.
pub fn execute(command: Command, global: &Global) -> Result<()> {
    use Command::*;

    match command {
        Synth {
            variants,
            format,
            out,
        } => synth::execute(global, &variants, format, out.as_deref()),
        Names { json } => names::execute(global, json),
        Stages { variant } => stages::execute(global, variant),
        Envs { json } => envs::execute(global, json),
        Check => check::execute(global),
        Completions { shell } => completions::execute(shell),
    }
}
