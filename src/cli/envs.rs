//! Envs command - list the registry.

use crate::cli::{output, Global};
use crate::error::{RenderError, Result};

/// List registered environments.
pub fn execute(global: &Global, json: bool) -> Result<()> {
    let registry = global.registry()?;

    if json {
        let text = serde_json::to_string_pretty(&registry).map_err(RenderError::Json)?;
        output::data(&text);
        return Ok(());
    }

    let key_width = registry.keys().map(str::len).max().unwrap_or(3).max(3);

    output::data(&format!(
        "{:<width$} {:>12} {:<12} {:<10}",
        "ENV",
        "ACCOUNT",
        "REGION",
        "PROJECT",
        width = key_width
    ));
    for (key, env) in registry.iter() {
        output::data(&format!(
            "{:<width$} {:>12} {:<12} {:<10}",
            key,
            env.account_id,
            env.region,
            env.project,
            width = key_width
        ));
    }

    Ok(())
}
