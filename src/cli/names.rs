//! Names command.
//!
//! Lists every name the selected environment generates, across all
//! variants, with the `kind/functionality` pair that produced it.

use crate::cli::{output, Global};
use crate::core::synth;
use crate::error::{RenderError, Result};

/// List generated names.
pub fn execute(global: &Global, json: bool) -> Result<()> {
    let registry = global.registry()?;
    let env = global.environment(&registry)?;
    let ledger = synth::names(env)?;
    let claims = ledger.claims();

    if json {
        let result = serde_json::json!({
            "environment": env.environment,
            "names": claims,
            "count": claims.len()
        });
        output::data(&serde_json::to_string_pretty(&result).map_err(RenderError::Json)?);
        return Ok(());
    }

    let width = claims
        .iter()
        .map(|c| c.owner.len())
        .max()
        .unwrap_or(0);

    output::header(&format!("{} names for {}", claims.len(), env.environment));
    output::rule();
    for claim in &claims {
        output::data(&format!(
            "  {:<width$}  {}",
            claim.owner,
            output::name(&claim.name),
            width = width
        ));
    }

    Ok(())
}
