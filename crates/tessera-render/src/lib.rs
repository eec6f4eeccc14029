//! Composition, rendering and export of tessera documents.
//!
//! Takes the render context produced by `tessera-components`, assembles a
//! selection into it, renders the layout template with minijinja, and hands
//! the result to an export or preview sink.

pub mod builder;
pub mod canvas;
pub mod composer;
pub mod export;
pub mod lint;
pub mod pipeline;
pub mod renderer;

pub use builder::{BuildConfig, BuildError, BuildResult, TemplateBuilder};
pub use canvas::{Canvas, Viewport};
pub use composer::{compose, ASSEMBLED_KEY};
pub use export::{ExportError, ExportOutcome, Exporter, Preview, DEFAULT_EXPORT_FILENAME};
pub use lint::{lint_dir, lint_document, Check, Finding, LintError, LintReport, Severity};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError};
pub use renderer::{RenderError, Renderer, DEFAULT_LAYOUT, LAYOUT_TEMPLATE};
