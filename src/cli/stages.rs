//! Stages command.

use crate::cli::{output, Global};
use crate::core::pipeline::Variant;
use crate::core::stack::Stack;
use crate::error::Result;

/// Print the stages of `variant` in run order, with their actions.
pub fn execute(global: &Global, variant: Variant) -> Result<()> {
    let registry = global.registry()?;
    let env = global.environment(&registry)?;
    let stack = Stack::build(env, variant)?;

    output::header(&stack.pipeline.name);
    output::rule();
    for (i, stage) in stack.pipeline.stages.iter().enumerate() {
        output::data(&format!("{:>3}. {}", i + 1, output::name(&stage.name)));
        for action in &stage.actions {
            output::data(&format!(
                "       {:<8} {}",
                action.category(),
                action.name()
            ));
        }
    }

    Ok(())
}
