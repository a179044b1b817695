// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Build phase: evaluate every `example<N>` line.

use tracing::{debug, error, warn};

use doccheck_interp::Interpreter;

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::registry::Registry;
use crate::report::Reporter;
use crate::tag::Tag;

/// Evaluate all example lines of all declarations, in registry then line
/// order, storing each value in the registry. The first failure aborts.
pub fn build_examples(
    registry: &Registry,
    config: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> Result<usize, CheckError> {
    let interp = Interpreter::with_examples(registry);
    let mut built = 0;

    for (decl_id, entry) in registry.iter() {
        let declaration = &entry.declaration;
        for tagged in &entry.tags {
            let Tag::Example { id, expr } = &tagged.tag else {
                continue;
            };
            let scope = declaration.scope(&config.self_alias);
            let value = interp.eval_source(expr, &scope).map_err(|e| {
                error!(declaration = declaration.name(), id = *id, expression = %expr, "example failed to build: {}", e.detail());
                CheckError::ExampleBuild {
                    declaration: declaration.name().to_string(),
                    id: *id,
                    expression: expr.clone(),
                    error: e,
                }
            })?;
            debug!(declaration = declaration.name(), id = *id, value = %value.repr(), "built example");
            if registry.store_example(decl_id, *id, value).is_some() {
                warn!(declaration = declaration.name(), id = *id, "example id reused; keeping the later value");
            }
            reporter.example_built(declaration.name(), *id, expr);
            built += 1;
        }
    }

    Ok(built)
}
