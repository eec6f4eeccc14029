//! Component listing command.

use anyhow::{Context, Result};
use tessera_render::Pipeline;

use crate::config::Config;

/// Print every selectable component.
pub fn run(config: &Config) -> Result<()> {
    let components = Pipeline::new(config.pipeline())
        .components()
        .context("Failed to list components")?;

    if components.is_empty() {
        tracing::warn!("No components in {}", config.paths.components.display());
        return Ok(());
    }

    let width = components.iter().map(|c| c.id.len()).max().unwrap_or(0);
    for component in &components {
        println!(
            "{:width$}  {}  ({})",
            component.id,
            component.name,
            component.file_name,
            width = width
        );
    }

    Ok(())
}
