//! Pipegen - CodePipeline topology generator.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pipegen::cli::output;
use pipegen::cli::{execute, Cli};
use pipegen::error::{ConfigError, Error, NamingError};

fn main() {
    // usage errors exit 1 like every other failure; help and version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_env("PIPEGEN_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("pipegen=debug")
        } else {
            EnvFilter::new("pipegen=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let global = cli.global();
    if let Err(e) = execute(cli.command, &global) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingSelector) => {
                Some("pass --env <key> or set PIPEGEN_ENV".to_string())
            }
            Error::Config(ConfigError::UnknownEnvironment { .. }) => {
                Some("run: pipegen envs".to_string())
            }
            Error::Config(ConfigError::Parse(_)) => {
                Some("check pipegen.toml against `pipegen envs --json`".to_string())
            }
            Error::Naming(NamingError::Collision { .. }) => {
                Some("run: pipegen names to see every generated name".to_string())
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
