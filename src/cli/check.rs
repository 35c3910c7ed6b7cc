//! Check command.
//!
//! Synthesizes the default stack set for the selected environment, then
//! builds every environment in the registry and verifies no two of them
//! generate the same name.

use crate::cli::{output, Global};
use crate::core::pipeline::Variant;
use crate::core::synth;
use crate::error::Result;

/// Run the collision checks.
pub fn execute(global: &Global) -> Result<()> {
    let registry = global.registry()?;
    let env = global.environment(&registry)?;

    let synthesis = synth::synthesize(env, &Variant::DEFAULT_SET)?;
    let local = synth::names(env)?;
    output::success(&format!(
        "{}: {} stacks, {} names, no collisions",
        env.environment,
        synthesis.stacks().len(),
        local.len()
    ));

    if registry.len() < 2 {
        output::warn("only one environment registered, skipping disjointness check");
        return Ok(());
    }

    let total = synth::check_disjoint(&registry)?;
    output::success(&format!(
        "{} environments disjoint ({} names)",
        registry.len(),
        total
    ));

    Ok(())
}
