//! Batch template build command.

use std::path::PathBuf;

use anyhow::Result;
use tessera_render::TemplateBuilder;

use crate::config::Config;

/// Run the build command.
pub fn run(config: &Config, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building templates...");

    let mut build_config = config.build();
    if let Some(output) = output {
        build_config.output_dir = output;
    }

    let result = TemplateBuilder::new(build_config).build()?;

    tracing::info!(
        "Built {} template(s) with {} component(s) in {}ms",
        result.templates,
        result.components,
        result.duration_ms
    );
    tracing::info!("Output: {}", result.output_dir.display());

    if !result.failed.is_empty() {
        anyhow::bail!(
            "{} template(s) failed: {}",
            result.failed.len(),
            result.failed.join(", ")
        );
    }

    Ok(())
}
