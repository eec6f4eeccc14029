//! End-to-end render and export of a selection.
//!
//! Every call re-reads the fragment directory (unless a cache is enabled)
//! and builds its own render context, so concurrent calls share nothing
//! mutable.

use std::path::PathBuf;

use tessera_components::{CachedStore, ComponentDescriptor, ComponentStore, StoreError};

use crate::composer::compose;
use crate::export::{ExportError, ExportOutcome, Exporter, Preview, DEFAULT_EXPORT_FILENAME};
use crate::renderer::{RenderError, Renderer, LAYOUT_TEMPLATE};

/// Paths and names the pipeline works with.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fragment directory
    pub components_dir: PathBuf,

    /// Template root; `None` uses the built-in layout
    pub templates_dir: Option<PathBuf>,

    /// Layout template name
    pub layout: String,

    /// Export folder
    pub output_dir: PathBuf,

    /// File name used when an export names none
    pub default_filename: String,

    /// Keep fragments in memory until invalidated
    pub cache: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components"),
            templates_dir: Some(PathBuf::from("src/templates")),
            layout: LAYOUT_TEMPLATE.to_string(),
            output_dir: PathBuf::from("GUI_Output"),
            default_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            cache: false,
        }
    }
}

/// Errors from any stage of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Store, composer, renderer and exporter wired together.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    store: CachedStore,
    exporter: Exporter,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let store = CachedStore::new(ComponentStore::new(&config.components_dir), config.cache);
        let exporter = Exporter::new(&config.output_dir)
            .with_default_filename(config.default_filename.clone());

        Self {
            config,
            store,
            exporter,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &CachedStore {
        &self.store
    }

    /// Selectable components; fails if the fragment directory is missing.
    pub fn components(&self) -> Result<Vec<ComponentDescriptor>, PipelineError> {
        Ok(self.store.discover()?)
    }

    /// Render `selection` into the layout.
    pub fn render<S: AsRef<str>>(&self, selection: &[S]) -> Result<String, PipelineError> {
        let all = self.store.load_context()?;
        let ctx = compose(selection, &all);
        Ok(self.renderer().render_layout(&ctx)?)
    }

    /// Render `selection` for in-memory display.
    pub fn preview<S: AsRef<str>>(&self, selection: &[S]) -> Result<Preview, PipelineError> {
        self.render(selection).map(Preview::new)
    }

    /// Render `selection` and write it to the export folder.
    pub fn export<S: AsRef<str>>(
        &self,
        selection: &[S],
        filename: Option<&str>,
    ) -> Result<ExportOutcome, PipelineError> {
        let html = self.render(selection)?;
        Ok(self.exporter.export(&html, filename)?)
    }

    /// A fresh renderer, so template edits on disk show up on the next call.
    fn renderer(&self) -> Renderer {
        match &self.config.templates_dir {
            Some(dir) => Renderer::from_dir(dir, self.config.layout.clone()),
            None => Renderer::builtin(),
        }
    }
}
