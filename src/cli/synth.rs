//! Synth command.
//!
//! Renders the selected variants either to stdout (one document keyed by
//! stack name) or into an output directory with a manifest.

use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::cli::{output, Global};
use crate::core::pipeline::Variant;
use crate::core::synth;
use crate::core::template::Format;
use crate::error::Result;

/// Synthesize `variants` (the default set when empty).
pub fn execute(
    global: &Global,
    variants: &[Variant],
    format: Format,
    out: Option<&Path>,
) -> Result<()> {
    let registry = global.registry()?;
    let env = global.environment(&registry)?;

    let variants = if variants.is_empty() {
        Variant::DEFAULT_SET.to_vec()
    } else {
        variants.to_vec()
    };
    debug!(environment = %env.environment, ?variants, "synth");

    let synthesis = synth::synthesize(env, &variants)?;

    match out {
        Some(dir) => {
            let manifest = synthesis.write_to(dir, format)?;
            output::success(&format!(
                "{} stacks for {} written to {}",
                manifest.stacks.len(),
                env.environment,
                output::path(dir)
            ));
            output::blank();
            for entry in &manifest.stacks {
                output::kv(&entry.sha256[..12], &entry.file);
            }
        }
        None => {
            let mut documents = Map::new();
            for (stack, document) in synthesis.render()? {
                documents.insert(stack.name.clone(), document);
            }
            let text = format.encode(&Value::Object(documents))?;
            output::data(text.trim_end());
        }
    }

    Ok(())
}
