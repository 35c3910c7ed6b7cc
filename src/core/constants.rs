//! Constants used throughout pipegen.
//!
//! Centralizes file names, tag keys and build defaults.

/// Registry file looked up in the current directory (pipegen.toml).
pub const REGISTRY_FILE: &str = "pipegen.toml";

/// Environment variable holding the environment selector.
pub const ENV_SELECTOR_VAR: &str = "PIPEGEN_ENV";

/// Default output directory for `synth --out`.
pub const OUT_DIR: &str = "cdk.out";

/// Manifest written next to the templates.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Tag key applied to every stack.
pub const PROJECT_TAG: &str = "proyecto";

/// Buildspec schema version.
pub const BUILDSPEC_VERSION: &str = "0.2";

/// Timeout applied to every build project, in minutes.
pub const BUILD_TIMEOUT_MINUTES: u32 = 100;

/// Container port exposed by the application task.
pub const APP_CONTAINER_PORT: u16 = 8000;
