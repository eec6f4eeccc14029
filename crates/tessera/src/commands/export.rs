//! Export command: render a selection to the export folder.

use anyhow::{Context, Result};
use tessera_render::{Canvas, Pipeline};

use crate::config::Config;

/// Render `components` in order and write the document.
pub fn run(config: &Config, components: Vec<String>, filename: Option<String>) -> Result<()> {
    let canvas: Canvas = components.into_iter().collect();
    let pipeline = Pipeline::new(config.pipeline());

    let outcome = pipeline
        .export(canvas.selection(), filename.as_deref())
        .context("Export failed")?;

    tracing::info!(
        "Exported {} component(s) to {}/{}",
        canvas.len(),
        outcome.folder,
        outcome.filename
    );
    println!("{}", outcome.path.display());

    Ok(())
}
